//! Chemical formula strings.
//!
//! [`parse_formula_into_parts`] tokenizes free-form formula text such as
//! `CuC32H16N8.4H2O` or the spaced CML form `C 6 H 6 - 1` into typed
//! [`MoleculeFormulaPart`]s; [`formula_parts_as_string`] and
//! [`formula_parts_as_unicode`] render parts back for storage and display.
//! [`hill_formula_parts`] builds parts from element counts in Hill order.

mod hill;
mod parts;
mod render;

pub use hill::hill_formula_parts;
pub use parts::{parse_formula_into_parts, FormulaPartKind, MoleculeFormulaPart};
pub use render::{formula_parts_as_string, formula_parts_as_unicode};
