use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::CmlError;
use crate::model::Model;
use crate::molecule::Molecule;
use crate::textual_property::TextualProperty;

const CML_NAMESPACE: &str = "http://www.xml-cml.org/schema";

/// Serialise a model whose ids are already unique.
pub(super) fn write_model(model: &Model, compressed: bool) -> Result<String, CmlError> {
    let mut writer = if compressed {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    let mut root = BytesStart::new("cml:cml");
    root.push_attribute(("xmlns:cml", CML_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    for molecule in model.molecules() {
        write_molecule(&mut writer, molecule)?;
    }
    writer.write_event(Event::End(BytesEnd::new("cml:cml")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_molecule(writer: &mut Writer<Vec<u8>>, molecule: &Molecule) -> Result<(), CmlError> {
    let mut start = BytesStart::new("cml:molecule");
    start.push_attribute(("id", molecule.id.as_str()));
    writer.write_event(Event::Start(start))?;

    for name in &molecule.names {
        write_name(writer, name)?;
    }
    for formula in &molecule.formulas {
        write_formula(writer, formula)?;
    }

    if molecule.atom_count() > 0 {
        writer.write_event(Event::Start(BytesStart::new("cml:atomArray")))?;
        for atom in molecule.atoms() {
            let mut e = BytesStart::new("cml:atom");
            e.push_attribute(("id", atom.id.as_str()));
            e.push_attribute(("elementType", atom.element.symbol()));
            e.push_attribute(("x2", atom.position[0].to_string().as_str()));
            e.push_attribute(("y2", atom.position[1].to_string().as_str()));
            if let Some(charge) = atom.formal_charge.filter(|&c| c != 0) {
                e.push_attribute(("formalCharge", charge.to_string().as_str()));
            }
            if let Some(isotope) = atom.isotope {
                e.push_attribute(("isotopeNumber", isotope.to_string().as_str()));
            }
            writer.write_event(Event::Empty(e))?;
        }
        writer.write_event(Event::End(BytesEnd::new("cml:atomArray")))?;
    }

    if molecule.bond_count() > 0 {
        writer.write_event(Event::Start(BytesStart::new("cml:bondArray")))?;
        for edge in molecule.mol.bonds() {
            let Some((start, end)) = molecule.mol.bond_endpoints(edge) else {
                continue;
            };
            let bond = molecule.mol.bond(edge);
            let refs = format!(
                "{} {}",
                molecule.mol.atom(start).id,
                molecule.mol.atom(end).id
            );
            let mut e = BytesStart::new("cml:bond");
            e.push_attribute(("id", bond.id.as_str()));
            e.push_attribute(("atomRefs2", refs.as_str()));
            e.push_attribute(("order", bond.order.cml_token()));
            match bond.stereo.cml_token() {
                Some(token) => {
                    writer.write_event(Event::Start(e))?;
                    writer.write_event(Event::Start(BytesStart::new("cml:bondStereo")))?;
                    writer.write_event(Event::Text(BytesText::new(token)))?;
                    writer.write_event(Event::End(BytesEnd::new("cml:bondStereo")))?;
                    writer.write_event(Event::End(BytesEnd::new("cml:bond")))?;
                }
                None => writer.write_event(Event::Empty(e))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new("cml:bondArray")))?;
    }

    for child in molecule.children() {
        write_molecule(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new("cml:molecule")))?;
    Ok(())
}

fn write_name(writer: &mut Writer<Vec<u8>>, name: &TextualProperty) -> Result<(), CmlError> {
    let mut e = BytesStart::new("cml:name");
    if !name.id.is_empty() {
        e.push_attribute(("id", name.id.as_str()));
    }
    e.push_attribute(("dictRef", name.type_tag.as_str()));
    writer.write_event(Event::Start(e))?;
    writer.write_event(Event::Text(BytesText::new(&name.value)))?;
    writer.write_event(Event::End(BytesEnd::new("cml:name")))?;
    Ok(())
}

fn write_formula(writer: &mut Writer<Vec<u8>>, formula: &TextualProperty) -> Result<(), CmlError> {
    let mut e = BytesStart::new("cml:formula");
    if !formula.id.is_empty() {
        e.push_attribute(("id", formula.id.as_str()));
    }
    if formula.is_concise_formula() {
        e.push_attribute(("concise", formula.value.as_str()));
    } else {
        e.push_attribute(("inline", formula.value.as_str()));
        e.push_attribute(("convention", formula.type_tag.as_str()));
    }
    writer.write_event(Event::Empty(e))?;
    Ok(())
}
