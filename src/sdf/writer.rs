use std::fmt::Write;

use super::ctab::charge_code;
use super::error::SdfError;
use super::lines::is_record_end;
use super::property_types::PropertyTypes;
use crate::atom::Atom;
use crate::molecule::Molecule;
use crate::textual_property::DEFAULT_NAME_TAG;

const MAX_V2000_ENTRIES: usize = 999;
const ENTRIES_PER_PROPERTY_LINE: usize = 8;

/// Write one flat molecule as a V2000 record, `$$$$` included.
pub(super) fn write_record(
    out: &mut String,
    molecule: &Molecule,
    property_types: &PropertyTypes,
) -> Result<(), SdfError> {
    let atom_count = molecule.atom_count();
    let bond_count = molecule.bond_count();
    if atom_count > MAX_V2000_ENTRIES || bond_count > MAX_V2000_ENTRIES {
        return Err(SdfError::TooLarge {
            id: molecule.id.clone(),
            atoms: atom_count,
            bonds: bond_count,
        });
    }
    if !molecule.mdl_compatible() {
        log::warn!(
            "molecule '{}' has bond orders MDL cannot express; they are written as type 0",
            molecule.id
        );
    }

    let title = molecule
        .names
        .iter()
        .find(|n| n.type_tag == DEFAULT_NAME_TAG)
        .map_or("", |n| n.value.as_str());
    writeln!(out, "{}", title.lines().next().unwrap_or_default())?;
    writeln!(out, "  {:<8}{:10}2D", "chemconv", "")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        atom_count, bond_count
    )?;

    let atoms: Vec<&Atom> = molecule.atoms().collect();
    for atom in &atoms {
        let symbol = match atom.element.as_functional_group() {
            Some(_) => "R",
            None => atom.element.symbol(),
        };
        writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            0.0 - atom.position[1],
            0.0,
            symbol,
            charge_code(atom.charge()),
        )?;
    }

    for edge in molecule.mol.bonds() {
        let Some((start, end)) = molecule.mol.bond_endpoints(edge) else {
            continue;
        };
        let bond = molecule.mol.bond(edge);
        writeln!(
            out,
            "{:>3}{:>3}{:>3}{:>3}  0  0  0",
            start.index() + 1,
            end.index() + 1,
            bond.order.mdl_code(),
            bond.stereo.mdl_code(),
        )?;
    }

    let charges: Vec<(usize, i32)> = atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.charge() != 0)
        .map(|(i, a)| (i + 1, a.charge()))
        .collect();
    write_property_lines(out, "CHG", &charges)?;

    let isotopes: Vec<(usize, i32)> = atoms
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.isotope.map(|m| (i + 1, m as i32)))
        .collect();
    write_property_lines(out, "ISO", &isotopes)?;

    for (i, atom) in atoms.iter().enumerate() {
        if let Some(group) = atom.element.as_functional_group() {
            writeln!(out, "A  {:>3}", i + 1)?;
            writeln!(out, "{}", group.name())?;
        }
    }
    writeln!(out, "M  END")?;

    for property in molecule.names.iter().chain(&molecule.formulas) {
        match property_types.by_internal(&property.type_tag) {
            Some(pt) => write_data_item(out, &pt.external_name, &property.value)?,
            None => log::debug!(
                "dropping property '{}' with no SDF tag",
                property.type_tag
            ),
        }
    }
    writeln!(out, "$$$$")?;
    Ok(())
}

/// A blank line ends a data value, so blank and `$$$$` lines are left out.
fn write_data_item(out: &mut String, tag: &str, value: &str) -> Result<(), SdfError> {
    let lines: Vec<&str> = value
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !is_record_end(line))
        .collect();
    if lines.is_empty() {
        log::debug!("dropping empty value for <{tag}>");
        return Ok(());
    }
    if lines.len() != value.lines().count() {
        log::warn!("value for <{tag}> loses its blank lines in SDF");
    }
    writeln!(out, ">  <{tag}>")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_property_lines(out: &mut String, kind: &str, entries: &[(usize, i32)]) -> Result<(), SdfError> {
    for chunk in entries.chunks(ENTRIES_PER_PROPERTY_LINE) {
        write!(out, "M  {kind}{:>3}", chunk.len())?;
        for (atom, value) in chunk {
            write!(out, " {atom:>3} {value:>3}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
