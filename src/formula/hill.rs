use std::collections::BTreeMap;

use super::parts::{FormulaPartKind, MoleculeFormulaPart};
use crate::element::Element;

/// Formula parts in Hill order.
///
/// The Hill system lists C first, then H, then the remaining elements
/// alphabetically. Without carbon every element, hydrogen included, is
/// alphabetical. A non-zero net charge is appended as one charge part.
/// Part indices are offsets into the compact text (`C6H6`) the parts spell.
pub fn hill_formula_parts(
    counts: impl IntoIterator<Item = (Element, u32)>,
    charge: i32,
) -> Vec<MoleculeFormulaPart> {
    let mut by_symbol: BTreeMap<&'static str, u32> = BTreeMap::new();
    for (element, count) in counts {
        if count > 0 {
            *by_symbol.entry(element.symbol()).or_default() += count;
        }
    }

    let mut ordered: Vec<(&'static str, u32)> = Vec::with_capacity(by_symbol.len());
    if let Some(c) = by_symbol.remove("C") {
        ordered.push(("C", c));
        if let Some(h) = by_symbol.remove("H") {
            ordered.push(("H", h));
        }
    }
    ordered.extend(by_symbol);

    let mut parts = Vec::with_capacity(ordered.len() + 1);
    let mut offset = 0;
    for (symbol, count) in ordered {
        parts.push(MoleculeFormulaPart::new(
            FormulaPartKind::Element,
            symbol,
            offset,
            count as i32,
        ));
        offset += symbol.len();
        if count > 1 {
            offset += count.to_string().len();
        }
    }
    if charge != 0 && !parts.is_empty() {
        let sign = if charge > 0 { "+" } else { "-" };
        parts.push(MoleculeFormulaPart::new(
            FormulaPartKind::Charge,
            sign,
            offset,
            charge,
        ));
    }
    parts
}
