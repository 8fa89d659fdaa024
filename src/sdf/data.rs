use super::lines::{is_record_end, LineReader};
use super::property_types::PropertyTypes;
use super::SdfState;
use crate::molecule::Molecule;
use crate::textual_property::TextualProperty;

/// Reads the `>  <TAG>` data items that follow a connection table.
pub struct DataProcessor<'p> {
    property_types: &'p PropertyTypes,
}

impl<'p> DataProcessor<'p> {
    pub fn new(property_types: &'p PropertyTypes) -> Self {
        Self { property_types }
    }

    /// Route each data item into `molecule.formulas` or `molecule.names`.
    ///
    /// Returns `EndOfData` after `$$$$` and `Null` when the stream ends
    /// first. Tags missing from the table are kept as names typed with the
    /// raw tag.
    pub fn import(&self, reader: &mut LineReader<'_>, molecule: &mut Molecule) -> SdfState {
        while let Some(line) = reader.read_line() {
            if is_record_end(line) {
                return SdfState::EndOfData;
            }
            if !line.starts_with('>') {
                continue;
            }
            let Some(tag) = data_tag(line) else {
                log::debug!("line {}: data header without a tag", reader.line_number());
                continue;
            };

            let mut value_lines = Vec::new();
            while let Some(next) = reader.peek() {
                if is_record_end(next) {
                    break;
                }
                reader.read_line();
                if next.trim().is_empty() {
                    break;
                }
                value_lines.push(next.trim_end());
            }
            if value_lines.is_empty() {
                continue;
            }
            let value = value_lines.join("\n");

            match self.property_types.by_external(tag) {
                Some(pt) if pt.is_formula => molecule
                    .formulas
                    .push(TextualProperty::new(pt.internal_name.clone(), value)),
                Some(pt) => molecule
                    .names
                    .push(TextualProperty::new(pt.internal_name.clone(), value)),
                None => molecule.names.push(TextualProperty::new(tag, value)),
            }
        }
        SdfState::Null
    }
}

/// The text between the first `<` and the following `>`.
fn data_tag(line: &str) -> Option<&str> {
    let start = line.find('<')? + 1;
    let len = line[start..].find('>')?;
    let tag = line[start..start + len].trim();
    (!tag.is_empty()).then_some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(text: &str) -> (SdfState, Molecule) {
        let table = PropertyTypes::bundled().unwrap();
        let mut reader = LineReader::new(text);
        let mut molecule = Molecule::new();
        let state = DataProcessor::new(&table).import(&mut reader, &mut molecule);
        (state, molecule)
    }

    #[test]
    fn routes_names_and_formulas() {
        let (state, m) = import(
            ">  <PUBCHEM_IUPAC_NAME>\nbenzene\n\n>  <PUBCHEM_MOLECULAR_FORMULA>\nC6H6\n\n$$$$\n",
        );
        assert_eq!(state, SdfState::EndOfData);
        assert_eq!(m.names.len(), 1);
        assert_eq!(m.names[0].type_tag, "iupac:Name");
        assert_eq!(m.formulas.len(), 1);
        assert_eq!(m.formulas[0].type_tag, "molecular:Formula");
        assert_eq!(m.formulas[0].value, "C6H6");
    }

    #[test]
    fn unknown_tags_become_names() {
        let (_, m) = import("> 1 <VENDOR_ID> (MFCD0001)\nABC-123\n\n$$$$\n");
        assert_eq!(m.names[0].type_tag, "VENDOR_ID");
        assert_eq!(m.names[0].value, "ABC-123");
    }

    #[test]
    fn multi_line_values_and_end_of_stream() {
        let (state, m) = import(">  <SYNONYM>\nfirst\nsecond\n");
        assert_eq!(state, SdfState::Null);
        assert_eq!(m.names[0].value, "first\nsecond");
    }

    #[test]
    fn empty_values_are_skipped() {
        let (state, m) = import(">  <NAME>\n\n$$$$\n");
        assert_eq!(state, SdfState::EndOfData);
        assert!(m.names.is_empty());
    }

    #[test]
    fn tag_extraction() {
        assert_eq!(data_tag(">  <CAS>"), Some("CAS"));
        assert_eq!(data_tag("> <>"), None);
        assert_eq!(data_tag("> no tag"), None);
    }
}
