use std::collections::HashMap;
use std::str::FromStr;

use petgraph::graph::NodeIndex;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::CmlError;
use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, BondStereo};
use crate::element::ElementBase;
use crate::functional_group::FunctionalGroupRegistry;
use crate::model::Model;
use crate::molecule::Molecule;
use crate::textual_property::{
    TextualProperty, CONCISE_FORMULA_TAG, DEFAULT_FORMULA_TAG, DEFAULT_NAME_TAG,
};

/// CML elements that carry nothing the model keeps. Their whole subtree is
/// skipped.
const SKIPPED: &[&str] = &[
    "label",
    "atomParity",
    "scalar",
    "property",
    "propertyList",
    "metadata",
    "metadataList",
    "identifier",
    "electron",
];

/// Elements the reader builds the model from. Anything else below the root
/// is skipped with its subtree.
fn is_read(name: &str) -> bool {
    matches!(
        name,
        "cml"
            | "molecule"
            | "atomArray"
            | "atom"
            | "bondArray"
            | "bond"
            | "bondStereo"
            | "name"
            | "formula"
    )
}

fn skipped_below_root(name: &str) -> bool {
    if is_read(name) {
        return false;
    }
    if !SKIPPED.contains(&name) {
        log::debug!("skipping unrecognised element <{name}>");
    }
    true
}

/// Attributes keyed by local name, values unescaped.
struct AttrMap {
    attrs: HashMap<String, String>,
}

impl AttrMap {
    fn from_event(e: &BytesStart<'_>) -> Result<Self, CmlError> {
        let mut attrs = HashMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.insert(key, value);
        }
        Ok(Self { attrs })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn parse<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, CmlError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| CmlError::InvalidAttribute {
                    attribute: key,
                    value: value.to_string(),
                }),
        }
    }

    /// 2D coordinate, falling back to the 3D one.
    fn coordinate(&self, key_2d: &'static str, key_3d: &'static str) -> Result<f64, CmlError> {
        match self.parse(key_2d)? {
            Some(v) => Ok(v),
            None => Ok(self.parse(key_3d)?.unwrap_or(0.0)),
        }
    }
}

struct PendingBond {
    id: String,
    start: String,
    end: String,
    bond: Bond,
}

/// A `<molecule>` being read. Bonds are resolved when it closes, so they
/// may name atoms listed after them.
struct MoleculeBuilder {
    molecule: Molecule,
    atom_ids: HashMap<String, NodeIndex>,
    bonds: Vec<PendingBond>,
}

impl MoleculeBuilder {
    fn new(id: &str) -> Self {
        Self {
            molecule: Molecule::new().with_id(id),
            atom_ids: HashMap::new(),
            bonds: Vec::new(),
        }
    }

    fn finish(self) -> Result<Molecule, CmlError> {
        let MoleculeBuilder {
            mut molecule,
            atom_ids,
            bonds,
        } = self;
        for pending in bonds {
            let find = |atom: &str| {
                atom_ids
                    .get(atom)
                    .copied()
                    .ok_or_else(|| CmlError::DanglingAtomRef {
                        bond: pending.id.clone(),
                        atom: atom.to_string(),
                    })
            };
            let start = find(&pending.start)?;
            let end = find(&pending.end)?;
            if start == end {
                return Err(CmlError::SelfBond {
                    bond: pending.id,
                    atom: pending.start,
                });
            }
            molecule.add_bond(start, end, pending.bond);
        }
        Ok(molecule)
    }
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    Name,
    BondStereo,
}

struct CmlReader<'r> {
    registry: &'r FunctionalGroupRegistry,
    model: Model,
    stack: Vec<MoleculeBuilder>,
    text_target: Option<TextTarget>,
}

impl<'r> CmlReader<'r> {
    fn current(&mut self, element: &str) -> Result<&mut MoleculeBuilder, CmlError> {
        self.stack
            .last_mut()
            .ok_or_else(|| CmlError::OutsideMolecule(element.to_string()))
    }

    fn start(&mut self, name: &str, e: &BytesStart<'_>) -> Result<(), CmlError> {
        let attrs = AttrMap::from_event(e)?;
        match name {
            "cml" | "atomArray" | "bondArray" => {}
            "molecule" => self
                .stack
                .push(MoleculeBuilder::new(attrs.get("id").unwrap_or_default())),
            "atom" => {
                let atom = self.parse_atom(&attrs)?;
                let builder = self.current(name)?;
                let id = atom.id.clone();
                let idx = builder.molecule.add_atom(atom);
                if !id.is_empty() {
                    builder.atom_ids.insert(id, idx);
                }
            }
            "bond" => {
                let pending = parse_bond(&attrs)?;
                self.current(name)?.bonds.push(pending);
            }
            "bondStereo" => self.text_target = Some(TextTarget::BondStereo),
            "name" => {
                let tag = attrs.get("dictRef").unwrap_or(DEFAULT_NAME_TAG);
                let property =
                    TextualProperty::new(tag, "").with_id(attrs.get("id").unwrap_or_default());
                self.current(name)?.molecule.add_name(property);
                self.text_target = Some(TextTarget::Name);
            }
            "formula" => {
                let formula = if let Some(concise) = attrs.get("concise") {
                    Some(TextualProperty::new(CONCISE_FORMULA_TAG, concise))
                } else {
                    attrs.get("inline").map(|inline| {
                        TextualProperty::new(
                            attrs.get("convention").unwrap_or(DEFAULT_FORMULA_TAG),
                            inline,
                        )
                    })
                };
                let builder = self.current(name)?;
                match formula {
                    Some(f) => builder
                        .molecule
                        .add_formula(f.with_id(attrs.get("id").unwrap_or_default())),
                    None => log::debug!("skipping <formula> with neither concise nor inline"),
                }
            }
            other => return Err(CmlError::UnknownRoot(other.to_string())),
        }
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), CmlError> {
        match name {
            "molecule" => {
                let Some(builder) = self.stack.pop() else {
                    return Err(CmlError::OutsideMolecule(name.to_string()));
                };
                let molecule = builder.finish()?;
                match self.stack.last_mut() {
                    Some(parent) => parent.molecule.add_child(molecule),
                    None => {
                        self.model.add_molecule(molecule);
                    }
                }
            }
            "name" | "bondStereo" => self.text_target = None,
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let Some(target) = self.text_target else {
            return;
        };
        let Some(builder) = self.stack.last_mut() else {
            return;
        };
        match target {
            TextTarget::Name => {
                if let Some(name) = builder.molecule.names.last_mut() {
                    name.value.push_str(text);
                }
            }
            TextTarget::BondStereo => {
                if let Some(pending) = builder.bonds.last_mut() {
                    pending.bond.stereo = BondStereo::from_cml_token(text);
                }
            }
        }
    }

    fn parse_atom(&self, attrs: &AttrMap) -> Result<Atom, CmlError> {
        let element = match attrs.get("elementType").map(str::trim) {
            Some(symbol) => self
                .registry
                .resolve(symbol)
                .ok_or_else(|| CmlError::UnknownElementType(symbol.to_string()))?,
            None => ElementBase::default(),
        };
        let position = [attrs.coordinate("x2", "x3")?, attrs.coordinate("y2", "y3")?];
        let mut atom = Atom::new(element, position).with_id(attrs.get("id").unwrap_or_default());
        atom.formal_charge = attrs.parse("formalCharge")?;
        atom.isotope = attrs.parse("isotopeNumber")?;
        Ok(atom)
    }
}

fn parse_bond(attrs: &AttrMap) -> Result<PendingBond, CmlError> {
    let id = attrs.get("id").unwrap_or_default().to_string();
    let refs = attrs.get("atomRefs2").unwrap_or_default();
    let atoms: Vec<&str> = refs.split_whitespace().collect();
    let [start, end] = atoms.as_slice() else {
        return Err(CmlError::InvalidAttribute {
            attribute: "atomRefs2",
            value: refs.to_string(),
        });
    };
    let order = match attrs.get("order") {
        None => BondOrder::Single,
        Some(token) => BondOrder::from_cml_token(token).ok_or_else(|| CmlError::InvalidAttribute {
            attribute: "order",
            value: token.to_string(),
        })?,
    };
    Ok(PendingBond {
        bond: Bond::new(order).with_id(id.clone()),
        id,
        start: start.to_string(),
        end: end.to_string(),
    })
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Parse a CML document into a model. Ids are taken as written; the caller
/// relabels.
pub(super) fn read_model(xml: &str, registry: &FunctionalGroupRegistry) -> Result<Model, CmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut state = CmlReader {
        registry,
        model: Model::new(),
        stack: Vec::new(),
        text_target: None,
    };
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if !open.is_empty() && skipped_below_root(&name) {
                    reader.read_to_end(e.name())?;
                    continue;
                }
                seen_root = true;
                state.start(&name, &e)?;
                open.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                if !open.is_empty() && skipped_below_root(&name) {
                    continue;
                }
                seen_root = true;
                state.start(&name, &e)?;
                state.end(&name)?;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                open.pop();
                state.end(&name)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if open.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(CmlError::StrayText(text.chars().take(40).collect()));
                    }
                } else {
                    state.text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = open.pop() {
        return Err(CmlError::Truncated(name));
    }
    if !seen_root {
        return Err(CmlError::NoRoot);
    }
    Ok(state.model)
}
