//! SDF / MDL V2000 converter.
//!
//! Import is a small state machine. [`CtabProcessor`] reads a connection
//! table and [`DataProcessor`] the data items behind it; the
//! [`SdfState`] each returns tells [`SdFileConverter::import`] whether to
//! start the next record, record an error, or stop.

mod ctab;
mod data;
pub mod error;
mod lines;
mod property_types;
mod writer;

use std::sync::Arc;

pub use ctab::CtabProcessor;
pub use data::DataProcessor;
pub use error::SdfError;
pub use lines::LineReader;
pub use property_types::{PropertyType, PropertyTypes};

use crate::functional_group::FunctionalGroupRegistry;
use crate::graph_ops::num_components;
use crate::model::{Model, Relabel};
use crate::molecule::Molecule;

/// Records read from one file before the rest is discarded.
pub const MAX_MOLECULES: usize = 16;

/// Mean bond lengths inside this window are written unscaled.
pub const BOND_LENGTH_WINDOW: (f64, f64) = (1.53, 1.55);

/// Mean bond length a model is scaled to when it falls outside the window.
pub const TARGET_BOND_LENGTH: f64 = 1.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdfState {
    Null,
    EndOfCtab,
    Error,
    Unsupported,
    EndOfData,
}

#[derive(Debug, Clone)]
pub struct SdFileConverter {
    property_types: Arc<PropertyTypes>,
    registry: Arc<FunctionalGroupRegistry>,
}

impl SdFileConverter {
    /// Converter using the bundled property type table and the global
    /// functional group registry.
    pub fn new() -> Result<Self, SdfError> {
        Ok(Self {
            property_types: Arc::new(PropertyTypes::bundled()?),
            registry: FunctionalGroupRegistry::global(),
        })
    }

    pub fn with_property_types(mut self, property_types: PropertyTypes) -> Self {
        self.property_types = Arc::new(property_types);
        self
    }

    pub fn with_registry(mut self, registry: Arc<FunctionalGroupRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn property_types(&self) -> &PropertyTypes {
        &self.property_types
    }

    /// Read every record of an SD file.
    ///
    /// Malformed records are skipped and reported through
    /// [`Model::general_errors`]; only V3000 input fails outright.
    pub fn import(&self, text: &str) -> Result<Model, SdfError> {
        if text.contains("V3000") || text.contains("v3000") {
            return Err(SdfError::UnsupportedV3000);
        }

        let mut reader = LineReader::new(text);
        let ctab = CtabProcessor::new(&self.registry);
        let data = DataProcessor::new(&self.property_types);
        let mut model = Model::new();
        let mut read = 0;

        while !reader.remaining_is_blank() {
            if read == MAX_MOLECULES {
                model.add_general_error(format!(
                    "file holds more than {MAX_MOLECULES} molecules; the rest were not read"
                ));
                reader.read_to_end();
                break;
            }

            let record_start = reader.line_number() + 1;
            let mut molecule = Molecule::new();
            let (state, message) = ctab.import(&mut reader, &mut molecule);
            match state {
                SdfState::EndOfCtab => {
                    let after_data = data.import(&mut reader, &mut molecule);
                    if num_components(&molecule.mol) > 1 {
                        log::debug!("record at line {record_start} split into components");
                        molecule = molecule.split();
                    }
                    model.add_molecule(molecule);
                    read += 1;
                    if after_data == SdfState::Null {
                        break;
                    }
                }
                SdfState::Error => {
                    model.add_general_error(format!(
                        "record starting at line {record_start}: {}",
                        message.unwrap_or_else(|| "unreadable connection table".to_string())
                    ));
                    reader.skip_record();
                }
                SdfState::Unsupported => {
                    reader.read_to_end();
                    return Err(SdfError::UnsupportedV3000);
                }
                SdfState::Null | SdfState::EndOfData => break,
            }
        }

        model.relabel(Relabel::Fresh);
        model.refresh();
        log::debug!(
            "sdf import: {} molecules, {} atoms, {} errors",
            model.molecule_count(),
            model.total_atom_count(),
            model.general_errors().len()
        );
        Ok(model)
    }

    /// Write every top-level molecule, flattened, as one record.
    ///
    /// A model whose mean bond length lies outside [`BOND_LENGTH_WINDOW`]
    /// is written from a copy scaled to [`TARGET_BOND_LENGTH`].
    pub fn export(&self, model: &Model) -> Result<String, SdfError> {
        let mean = model.mean_bond_length();
        let (low, high) = BOND_LENGTH_WINDOW;
        let scaled;
        let model = if mean > 0.0 && !(low..=high).contains(&mean) {
            let mut copy = model.clone();
            copy.scale_to_average_bond_length(TARGET_BOND_LENGTH);
            log::debug!("sdf export: mean bond length {mean:.4} scaled to {TARGET_BOND_LENGTH}");
            scaled = copy;
            &scaled
        } else {
            model
        };

        let mut out = String::new();
        for molecule in model.molecules() {
            writer::write_record(&mut out, &molecule.flattened(), &self.property_types)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::{Bond, BondOrder};
    use crate::element::Element;
    use crate::textual_property::TextualProperty;

    fn converter() -> SdFileConverter {
        SdFileConverter::new().unwrap()
    }

    fn record(title: &str) -> String {
        format!(
            "{title}
  test

  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5400    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  2  0
M  END
$$$$
"
        )
    }

    #[test]
    fn reads_several_records() {
        let text = format!("{}{}", record("one"), record("two"));
        let model = converter().import(&text).unwrap();
        assert_eq!(model.molecule_count(), 2);
        assert_eq!(model.total_atom_count(), 4);
        assert!(!model.has_errors());
        let ids: Vec<_> = model.molecules().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn bad_record_is_skipped_and_reported() {
        let broken = record("bad").replace("  1  2  2  0", "  1  7  2  0");
        let text = format!("{}{}{}", record("one"), broken, record("three"));
        let model = converter().import(&text).unwrap();
        assert_eq!(model.molecule_count(), 2);
        assert_eq!(model.general_errors().len(), 1);
        assert!(model.general_errors()[0].starts_with("record starting at line 10: line 16:"));
    }

    #[test]
    fn v3000_anywhere_fails() {
        let text = format!("{}V3000\n", record("one"));
        assert!(matches!(
            converter().import(&text),
            Err(SdfError::UnsupportedV3000)
        ));
    }

    #[test]
    fn cap_at_sixteen() {
        let text: String = (0..17).map(|i| record(&format!("mol{i}"))).collect();
        let model = converter().import(&text).unwrap();
        assert_eq!(model.molecule_count(), MAX_MOLECULES);
        assert_eq!(model.general_errors().len(), 1);
    }

    #[test]
    fn disconnected_record_is_split() {
        let text = "salt
  test

  2  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 Na  0  3  0  0  0  0  0  0  0  0  0  0
    3.0000    0.0000    0.0000 Cl  0  5  0  0  0  0  0  0  0  0  0  0
M  END
$$$$
";
        let model = converter().import(text).unwrap();
        let salt = model.molecules().next().unwrap();
        assert!(salt.is_group());
        assert_eq!(salt.children().len(), 2);
        assert_eq!(salt.names.len(), 1);
        assert_eq!(model.total_molecule_count(), 3);
    }

    #[test]
    fn export_scales_out_of_window_models() {
        let mut m = Molecule::new();
        let a = m.add_atom(Atom::new(Element::C, [0.0, 0.0]));
        let b = m.add_atom(Atom::new(Element::C, [10.0, 0.0]));
        m.add_bond(a, b, Bond::new(BondOrder::Single));
        let mut model = Model::new();
        model.add_molecule(m);

        let sdf = converter();
        let text = sdf.export(&model).unwrap();
        assert!(text.contains("    1.5400    0.0000    0.0000 C"));
        // the caller's model is untouched
        assert!((model.mean_bond_length() - 10.0).abs() < 1e-12);

        let reread = sdf.import(&text).unwrap();
        assert!((reread.mean_bond_length() - 1.54).abs() < 1e-4);
        assert_eq!(sdf.export(&reread).unwrap(), text);
    }

    #[test]
    fn export_writes_tagged_properties_only() {
        let mut m = Molecule::new();
        m.add_atom(Atom::new(Element::O, [0.0, 0.0]).with_charge(-2).with_isotope(18));
        m.add_name(TextualProperty::new("iupac:Name", "oxide"));
        m.add_name(TextualProperty::new("private:Note", "dropped"));
        m.add_formula(TextualProperty::new("molecular:Formula", "O2-"));
        let mut model = Model::new();
        model.add_molecule(m);

        let text = converter().export(&model).unwrap();
        assert!(text.contains("M  CHG  1   1  -2"));
        assert!(text.contains("M  ISO  1   1  18"));
        assert!(text.contains(">  <IUPAC_NAME>\noxide\n"));
        assert!(text.contains(">  <MOLECULAR_FORMULA>\nO2-\n"));
        assert!(!text.contains("dropped"));
        assert!(text.ends_with("$$$$\n"));
    }

    #[test]
    fn blank_lines_in_values_are_collapsed() {
        let mut m = Molecule::new();
        m.add_atom(Atom::new(Element::C, [0.0, 0.0]));
        m.add_name(TextualProperty::new("iupac:Name", "first\n\nsecond\n$$$$\nthird"));
        let mut model = Model::new();
        model.add_molecule(m);

        let sdf = converter();
        let text = sdf.export(&model).unwrap();
        assert!(text.contains(">  <IUPAC_NAME>\nfirst\nsecond\nthird\n\n$$$$\n"));

        let reread = sdf.import(&text).unwrap();
        assert_eq!(reread.molecule_count(), 1);
        let names = &reread.molecules().next().unwrap().names;
        assert!(names
            .iter()
            .any(|n| n.type_tag == "iupac:Name" && n.value == "first\nsecond\nthird"));
    }

    #[test]
    fn functional_groups_round_trip_as_aliases() {
        let registry = FunctionalGroupRegistry::global();
        let mut m = Molecule::new();
        let c = m.add_atom(Atom::new(Element::C, [0.0, 0.0]));
        let ph = m.add_atom(Atom::new(registry.resolve("Ph").unwrap(), [1.54, 0.0]));
        m.add_bond(c, ph, Bond::default());
        let mut model = Model::new();
        model.add_molecule(m);

        let sdf = converter();
        let text = sdf.export(&model).unwrap();
        assert!(text.contains("A    2\nPh\n"));
        let reread = sdf.import(&text).unwrap();
        let symbols: Vec<_> = reread
            .molecules()
            .flat_map(|m| m.atoms().map(|a| a.element.symbol().to_string()))
            .collect();
        assert_eq!(symbols, vec!["C", "Ph"]);
    }
}
