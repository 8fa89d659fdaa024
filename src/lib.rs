//! Chemical structure model with CML, SDF/MDL and JSON converters.
//!
//! Every converter reads text into a [`Model`] and writes a [`Model`] back
//! out. A model holds a tree of [`Molecule`]s, each owning an atom/bond
//! graph, names and formulas. The [`formula`] module tokenizes and renders
//! formula text independently of any molecule.

pub mod atom;
pub mod bond;
pub mod cml;
pub mod convert;
pub mod element;
pub mod formula;
pub mod functional_group;
pub mod geometry;
pub mod graph_ops;
pub mod json;
pub mod model;
pub mod mol;
pub mod molecule;
pub mod rings;
pub mod sdf;
pub mod textual_property;
pub mod traits;
pub mod valence;

pub use atom::Atom;
pub use bond::{Bond, BondOrder, BondStereo};
pub use cml::{CmlConverter, CmlError};
pub use convert::{
    import_with_fallback, try_import_cml, try_import_sdf, Converter, FallbackError, Format,
    ImportAttempt,
};
pub use element::{Element, ElementBase};
pub use functional_group::{FunctionalGroup, FunctionalGroupRegistry};
pub use json::{JsonConverter, JsonError};
pub use model::{Model, Relabel};
pub use mol::Mol;
pub use molecule::Molecule;
pub use rings::{Ring, RingInfo};
pub use sdf::{SdFileConverter, SdfError};
pub use textual_property::TextualProperty;
pub use traits::{HasBondOrder, HasFormalCharge, HasPosition2D};

#[cfg(test)]
mod tests;
