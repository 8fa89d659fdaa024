use petgraph::graph::NodeIndex;

use super::lines::{column, is_record_end, LineReader};
use super::SdfState;
use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, BondStereo};
use crate::element::ElementBase;
use crate::functional_group::FunctionalGroupRegistry;
use crate::molecule::Molecule;
use crate::textual_property::{TextualProperty, DEFAULT_NAME_TAG};

/// Reads one connection table: header, counts line, atom and bond blocks
/// and the property lines up to `M  END`.
pub struct CtabProcessor<'r> {
    registry: &'r FunctionalGroupRegistry,
}

struct CtabError(String);

impl CtabError {
    fn at(reader: &LineReader<'_>, details: impl std::fmt::Display) -> Self {
        CtabError(format!("line {}: {details}", reader.line_number()))
    }
}

impl<'r> CtabProcessor<'r> {
    pub fn new(registry: &'r FunctionalGroupRegistry) -> Self {
        Self { registry }
    }

    /// Fill `molecule` from the next table in `reader`.
    ///
    /// Returns `EndOfCtab` on success, `Null` when the stream held nothing
    /// more, `Unsupported` for a V3000 counts line and `Error` with a
    /// line-numbered message for anything malformed.
    pub fn import(
        &self,
        reader: &mut LineReader<'_>,
        molecule: &mut Molecule,
    ) -> (SdfState, Option<String>) {
        if reader.at_end() {
            return (SdfState::Null, None);
        }
        match self.read_table(reader, molecule) {
            Ok(state) => (state, None),
            Err(CtabError(message)) => (SdfState::Error, Some(message)),
        }
    }

    fn read_table(
        &self,
        reader: &mut LineReader<'_>,
        molecule: &mut Molecule,
    ) -> Result<SdfState, CtabError> {
        let title = reader.read_line().unwrap_or_default().trim();
        for _ in 0..2 {
            if reader.read_line().is_none() {
                return Err(CtabError::at(reader, "header ended early"));
            }
        }
        let counts = reader
            .read_line()
            .ok_or_else(|| CtabError::at(reader, "missing counts line"))?;
        if counts.contains("V3000") || counts.contains("v3000") {
            return Ok(SdfState::Unsupported);
        }
        let (atom_count, bond_count) = parse_counts(counts).ok_or_else(|| {
            CtabError::at(reader, format!("invalid counts line {counts:?}"))
        })?;

        if !title.is_empty() {
            molecule.add_name(TextualProperty::new(DEFAULT_NAME_TAG, title));
        }

        let mut atoms = Vec::with_capacity(atom_count);
        for _ in 0..atom_count {
            let line = reader
                .read_line()
                .ok_or_else(|| CtabError::at(reader, "atom block ended early"))?;
            let atom = self.parse_atom(line).map_err(|e| CtabError::at(reader, e))?;
            atoms.push(molecule.add_atom(atom));
        }

        for _ in 0..bond_count {
            let line = reader
                .read_line()
                .ok_or_else(|| CtabError::at(reader, "bond block ended early"))?;
            let (a1, a2, bond) = parse_bond(line).map_err(|e| CtabError::at(reader, e))?;
            let (start, end) = match (resolve(&atoms, a1), resolve(&atoms, a2)) {
                (Some(s), Some(e)) if s != e => (s, e),
                _ => {
                    return Err(CtabError::at(
                        reader,
                        format!("bond {a1}-{a2} refers to an atom outside 1..={atom_count}"),
                    ))
                }
            };
            molecule.add_bond(start, end, bond);
        }

        self.read_properties(reader, molecule, &atoms)?;
        Ok(SdfState::EndOfCtab)
    }

    fn parse_atom(&self, line: &str) -> Result<Atom, String> {
        let fixed = (|| {
            let x = column(line, 0, 10)?.parse::<f64>().ok()?;
            let y = column(line, 10, 20)?.parse::<f64>().ok()?;
            let symbol = column(line, 31, 34)?;
            let charge_code = match column(line, 36, 39) {
                Some("") | None => 0,
                Some(code) => code.parse::<i32>().ok()?,
            };
            Some((x, y, symbol, charge_code))
        })();
        let (x, y, symbol, charge_code) = match fixed {
            Some(parsed) if !parsed.2.is_empty() => parsed,
            _ => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() < 4 {
                    return Err(format!("invalid atom line {line:?}"));
                }
                let x = tokens[0].parse::<f64>().map_err(|_| "invalid x coordinate".to_string())?;
                let y = tokens[1].parse::<f64>().map_err(|_| "invalid y coordinate".to_string())?;
                let code = tokens.get(5).and_then(|t| t.parse().ok()).unwrap_or(0);
                (x, y, tokens[3], code)
            }
        };

        let element = match self.registry.resolve(symbol) {
            Some(element) => element,
            // R groups are placeholders until an alias line names them
            None if symbol.starts_with('R') || symbol == "*" => ElementBase::default(),
            None => return Err(format!("unknown element symbol {symbol:?}")),
        };
        let mut atom = Atom::new(element, [x, 0.0 - y]);
        if let Some(charge) = charge_from_code(charge_code) {
            atom.formal_charge = Some(charge);
        }
        Ok(atom)
    }

    fn read_properties(
        &self,
        reader: &mut LineReader<'_>,
        molecule: &mut Molecule,
        atoms: &[NodeIndex],
    ) -> Result<(), CtabError> {
        let mut charges_reset = false;
        let mut isotopes_reset = false;
        while let Some(line) = reader.peek() {
            if line.starts_with('>') || is_record_end(line) {
                // a table without M  END; the data block starts here
                return Ok(());
            }
            reader.read_line();
            if line.starts_with("M  END") {
                return Ok(());
            } else if let Some(rest) = line.strip_prefix("M  CHG") {
                if !charges_reset {
                    for &idx in atoms {
                        molecule.mol.atom_mut(idx).formal_charge = None;
                    }
                    charges_reset = true;
                }
                for (atom, value) in parse_pairs(rest).map_err(|e| CtabError::at(reader, e))? {
                    let idx = resolve(atoms, atom)
                        .ok_or_else(|| CtabError::at(reader, format!("M  CHG names atom {atom}")))?;
                    molecule.mol.atom_mut(idx).formal_charge = Some(value);
                }
            } else if let Some(rest) = line.strip_prefix("M  ISO") {
                if !isotopes_reset {
                    for &idx in atoms {
                        molecule.mol.atom_mut(idx).isotope = None;
                    }
                    isotopes_reset = true;
                }
                for (atom, value) in parse_pairs(rest).map_err(|e| CtabError::at(reader, e))? {
                    let idx = resolve(atoms, atom)
                        .ok_or_else(|| CtabError::at(reader, format!("M  ISO names atom {atom}")))?;
                    let mass = u16::try_from(value)
                        .map_err(|_| CtabError::at(reader, format!("invalid mass number {value}")))?;
                    molecule.mol.atom_mut(idx).isotope = Some(mass);
                }
            } else if let Some(rest) = line.strip_prefix("A  ") {
                let atom = rest
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| CtabError::at(reader, "invalid alias atom number"))?;
                let idx = resolve(atoms, atom)
                    .ok_or_else(|| CtabError::at(reader, format!("alias names atom {atom}")))?;
                let alias = reader
                    .read_line()
                    .ok_or_else(|| CtabError::at(reader, "alias text missing"))?
                    .trim();
                match self.registry.resolve(alias) {
                    Some(element) => molecule.mol.atom_mut(idx).element = element,
                    None => log::debug!("ignoring unknown atom alias {alias:?}"),
                }
            }
        }
        Ok(())
    }
}

fn parse_counts(line: &str) -> Option<(usize, usize)> {
    let fixed = column(line, 0, 3)
        .and_then(|a| a.parse().ok())
        .zip(column(line, 3, 6).and_then(|b| b.parse().ok()));
    fixed.or_else(|| {
        let mut tokens = line.split_whitespace();
        let atoms = tokens.next()?.parse().ok()?;
        let bonds = tokens.next()?.parse().ok()?;
        Some((atoms, bonds))
    })
}

fn parse_bond(line: &str) -> Result<(usize, usize, Bond), String> {
    let fixed = (|| {
        let a1 = column(line, 0, 3)?.parse::<usize>().ok()?;
        let a2 = column(line, 3, 6)?.parse::<usize>().ok()?;
        let kind = column(line, 6, 9)?.parse::<i32>().ok()?;
        let stereo = match column(line, 9, 12) {
            Some("") | None => 0,
            Some(code) => code.parse::<i32>().ok()?,
        };
        Some((a1, a2, kind, stereo))
    })();
    let (a1, a2, kind, stereo) = match fixed {
        Some(parsed) => parsed,
        None => {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let field = |i: usize| tokens.get(i).and_then(|t| t.parse::<i64>().ok());
            match (field(0), field(1), field(2)) {
                (Some(a1), Some(a2), Some(kind)) if a1 > 0 && a2 > 0 => (
                    a1 as usize,
                    a2 as usize,
                    kind as i32,
                    field(3).unwrap_or(0) as i32,
                ),
                _ => return Err(format!("invalid bond line {line:?}")),
            }
        }
    };
    let order = BondOrder::from_mdl_code(kind).ok_or_else(|| format!("unsupported bond type {kind}"))?;
    let bond = Bond::new(order).with_stereo(BondStereo::from_mdl_code(stereo));
    Ok((a1, a2, bond))
}

/// `M  CHG`/`M  ISO` payload: an entry count followed by atom/value pairs.
fn parse_pairs(rest: &str) -> Result<Vec<(usize, i32)>, String> {
    let mut tokens = rest.split_whitespace();
    let count: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| "missing entry count".to_string())?;
    let values: Vec<i32> = tokens
        .map(|t| t.parse::<i32>().map_err(|_| format!("invalid number {t:?}")))
        .collect::<Result<_, _>>()?;
    if values.len() < count * 2 {
        return Err(format!("expected {count} entries, found {}", values.len() / 2));
    }
    values
        .chunks_exact(2)
        .take(count)
        .map(|pair| match usize::try_from(pair[0]) {
            Ok(atom) => Ok((atom, pair[1])),
            Err(_) => Err(format!("invalid atom number {}", pair[0])),
        })
        .collect()
}

fn resolve(atoms: &[NodeIndex], number: usize) -> Option<NodeIndex> {
    number.checked_sub(1).and_then(|i| atoms.get(i)).copied()
}

/// Atom-block charge column. Code 4 marks a doublet radical, not a charge.
fn charge_from_code(code: i32) -> Option<i32> {
    match code {
        1 => Some(3),
        2 => Some(2),
        3 => Some(1),
        5 => Some(-1),
        6 => Some(-2),
        7 => Some(-3),
        _ => None,
    }
}

pub(crate) fn charge_code(charge: i32) -> i32 {
    match charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}
