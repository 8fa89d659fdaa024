//! Chemical Markup Language converter.
//!
//! Elements are matched by local name, so documents with a `cml:` prefix,
//! a default namespace or no namespace at all read the same way. Export
//! always writes the `cml:` prefix.

pub mod error;
mod reader;
mod writer;

use std::sync::Arc;

pub use error::CmlError;

use crate::functional_group::FunctionalGroupRegistry;
use crate::model::{Model, Relabel};

#[derive(Debug, Clone)]
pub struct CmlConverter {
    compressed: bool,
    registry: Arc<FunctionalGroupRegistry>,
}

impl Default for CmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CmlConverter {
    pub fn new() -> Self {
        Self {
            compressed: false,
            registry: FunctionalGroupRegistry::global(),
        }
    }

    /// Write without indentation or line breaks.
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn with_registry(mut self, registry: Arc<FunctionalGroupRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Parse a CML document.
    ///
    /// Malformed XML, unknown elements and bonds naming absent atoms are
    /// errors; nothing partial is returned. Ids from the document are kept
    /// where they are unique.
    pub fn import(&self, xml: &str) -> Result<Model, CmlError> {
        let mut model = reader::read_model(xml, &self.registry)?;
        model.relabel(Relabel::EnsureUnique);
        model.refresh();
        log::debug!(
            "cml import: {} molecules, {} atoms, {} bonds",
            model.total_molecule_count(),
            model.total_atom_count(),
            model.total_bond_count()
        );
        Ok(model)
    }

    pub fn export(&self, model: &Model) -> Result<String, CmlError> {
        let mut model = model.clone();
        model.relabel(Relabel::EnsureUnique);
        writer::write_model(&model, self.compressed)
    }
}
