//! Compact JSON converter used by lightweight editors.
//!
//! A molecule is `{"a": [atoms], "b": [bonds]}` and bonds point at atoms by
//! their position in `a`. A model with exactly one molecule is written as a
//! bare molecule object, any other model as `{"m": [molecules]}`; import
//! accepts either shape.

pub mod error;
pub mod schema;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use serde_json::Value;

pub use error::JsonError;
pub use schema::{JsonAtom, JsonBond, JsonModel, JsonMolecule};

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder, BondStereo};
use crate::functional_group::FunctionalGroupRegistry;
use crate::model::{Model, Relabel};
use crate::molecule::Molecule;

#[derive(Debug, Clone)]
pub struct JsonConverter {
    compact: bool,
    registry: Arc<FunctionalGroupRegistry>,
}

impl Default for JsonConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonConverter {
    pub fn new() -> Self {
        Self {
            compact: false,
            registry: FunctionalGroupRegistry::global(),
        }
    }

    /// Write on a single line instead of pretty-printing.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn with_registry(mut self, registry: Arc<FunctionalGroupRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Read either shape. Single-quoted input is accepted. Ids in the text
    /// are ignored: the model is relabelled from scratch.
    pub fn import(&self, text: &str) -> Result<Model, JsonError> {
        let text = normalise_quotes(text);
        let value: Value = serde_json::from_str(&text)?;
        let wrapped = match &value {
            Value::Object(map) => map.contains_key("m"),
            _ => return Err(JsonError::NotAnObject),
        };
        let molecules = if wrapped {
            serde_json::from_value::<JsonModel>(value)?.m
        } else {
            vec![serde_json::from_value::<JsonMolecule>(value)?]
        };

        let mut model = Model::new();
        for (index, json) in molecules.into_iter().enumerate() {
            if json.a.is_empty() {
                log::debug!("json import: molecule {index} has no atoms, skipped");
                continue;
            }
            model.add_molecule(self.build_molecule(index, json)?);
        }
        model.relabel(Relabel::Fresh);
        model.refresh();
        log::debug!(
            "json import ({} shape): {} molecules, {} atoms",
            if wrapped { "wrapped" } else { "bare" },
            model.molecule_count(),
            model.total_atom_count()
        );
        Ok(model)
    }

    fn build_molecule(&self, index: usize, json: JsonMolecule) -> Result<Molecule, JsonError> {
        let mut molecule = Molecule::new();
        let atom_count = json.a.len();
        let mut lookup: Vec<NodeIndex> = Vec::with_capacity(atom_count);
        for atom in json.a {
            let element = match atom.l.as_deref() {
                None => Default::default(),
                Some(label) => self
                    .registry
                    .resolve(label.trim())
                    .ok_or_else(|| JsonError::UnknownLabel(label.to_string()))?,
            };
            let mut built = Atom::new(element, [atom.x, atom.y]);
            built.formal_charge = atom.c;
            lookup.push(molecule.add_atom(built));
        }

        for (k, bond) in json.b.into_iter().enumerate() {
            let find = |i: usize| {
                lookup.get(i).copied().ok_or(JsonError::AtomIndex {
                    molecule: index,
                    bond: k,
                    index: i,
                    atoms: atom_count,
                })
            };
            let start = find(bond.b)?;
            let end = find(bond.e)?;
            if start == end {
                return Err(JsonError::SelfBond {
                    molecule: index,
                    bond: k,
                    index: bond.b,
                });
            }
            let order = match bond.o {
                None => BondOrder::Single,
                Some(o) => BondOrder::from_numeric(o).ok_or(JsonError::InvalidOrder(o))?,
            };
            let stereo = match bond.s.as_deref() {
                None => BondStereo::None,
                Some(tag) => BondStereo::from_json_tag(tag)
                    .ok_or_else(|| JsonError::UnknownStereo(tag.to_string()))?,
            };
            molecule.add_bond(start, end, Bond::new(order).with_stereo(stereo));
        }
        Ok(molecule)
    }

    /// Nested molecules are flattened into their top-level ancestor.
    pub fn export(&self, model: &Model) -> Result<String, JsonError> {
        let mut molecules: Vec<JsonMolecule> = model
            .molecules()
            .map(|m| to_json(&m.flattened()))
            .collect();
        // One molecule goes out bare; readers of this format expect that.
        if molecules.len() == 1 {
            if let Some(only) = molecules.pop() {
                return self.write(&only);
            }
        }
        self.write(&JsonModel { m: molecules })
    }

    fn write<T: Serialize>(&self, value: &T) -> Result<String, JsonError> {
        let text = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(text)
    }
}

fn to_json(molecule: &Molecule) -> JsonMolecule {
    let positions: HashMap<NodeIndex, usize> = molecule
        .mol
        .atoms()
        .enumerate()
        .map(|(k, idx)| (idx, k))
        .collect();

    let a = molecule
        .atoms()
        .map(|atom| JsonAtom {
            i: non_empty(&atom.id),
            x: atom.position[0],
            y: atom.position[1],
            l: (!atom.is_carbon()).then(|| atom.element.symbol().to_string()),
            c: atom.formal_charge.filter(|&c| c != 0),
        })
        .collect();

    let b = molecule
        .mol
        .bonds()
        .filter_map(|edge| {
            let (start, end) = molecule.mol.bond_endpoints(edge)?;
            let bond = molecule.mol.bond(edge);
            Some(JsonBond {
                i: non_empty(&bond.id),
                b: *positions.get(&start)?,
                e: *positions.get(&end)?,
                o: (bond.order != BondOrder::Single).then(|| bond.order.numeric()),
                s: bond.stereo.json_tag().map(str::to_string),
            })
        })
        .collect();

    JsonMolecule { a, b }
}

fn non_empty(id: &str) -> Option<String> {
    (!id.is_empty()).then(|| id.to_string())
}

/// Rewrite single-quoted strings as double-quoted ones. Apostrophes inside
/// double-quoted strings are left alone.
fn normalise_quotes(text: &str) -> Cow<'_, str> {
    if !text.contains('\'') {
        return Cow::Borrowed(text);
    }

    #[derive(PartialEq)]
    enum State {
        Outside,
        Double,
        Single,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Outside;
    let mut escaped = false;
    for c in text.chars() {
        match state {
            State::Outside => {
                match c {
                    '"' => state = State::Double,
                    '\'' => {
                        out.push('"');
                        state = State::Single;
                        continue;
                    }
                    _ => {}
                }
                out.push(c);
            }
            State::Double => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    state = State::Outside;
                }
                out.push(c);
            }
            State::Single => {
                if escaped {
                    escaped = false;
                    if c != '\'' {
                        out.push('\\');
                    }
                    out.push(c);
                } else if c == '\\' {
                    escaped = true;
                } else if c == '\'' {
                    out.push('"');
                    state = State::Outside;
                } else if c == '"' {
                    out.push_str("\\\"");
                } else {
                    out.push(c);
                }
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn single_quoted_bare_molecule() {
        let model = JsonConverter::new()
            .import("{'a':[{'l':'N','x':0,'y':0}]}")
            .unwrap();
        assert_eq!(model.molecule_count(), 1);
        let m = model.molecules().next().unwrap();
        assert_eq!(m.id, "m1");
        assert_eq!(m.atom_count(), 1);
        assert_eq!(m.bond_count(), 0);
        let n = m.atoms().next().unwrap();
        assert!(n.element.is_element(Element::N));
        assert_eq!(n.id, "a1");
        assert_eq!(n.implicit_hydrogens, 3);
    }

    #[test]
    fn wrapper_with_bonds() {
        let text = r#"{"m": [
            {"a": [{"x": 0, "y": 0}, {"x": 1.3, "y": 0, "l": "O", "c": -1}],
             "b": [{"b": 0, "e": 1, "o": 2, "s": "protruding"}]},
            {"a": [{"x": 5, "y": 5, "l": "Na", "c": 1}]}
        ]}"#;
        let model = JsonConverter::new().import(text).unwrap();
        assert_eq!(model.molecule_count(), 2);
        assert_eq!(model.total_atom_count(), 3);
        let first = model.molecule("m1").unwrap();
        let bond = first.bonds().next().unwrap();
        assert_eq!(bond.order, BondOrder::Double);
        assert_eq!(bond.stereo, BondStereo::Wedge);
        assert_eq!(bond.id, "b1");
        let ids: Vec<_> = model.molecules().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn export_shape_depends_on_molecule_count() {
        let json = JsonConverter::new().compact(true);
        let one = json.import("{'a':[{'x':0,'y':0}]}").unwrap();
        let text = json.export(&one).unwrap();
        assert_eq!(text, r#"{"a":[{"i":"a1","x":0.0,"y":0.0}]}"#);

        let two = json.import(r#"{"m":[{"a":[{"x":0,"y":0}]},{"a":[{"x":1,"y":1}]}]}"#).unwrap();
        let text = json.export(&two).unwrap();
        assert!(text.starts_with(r#"{"m":["#));

        let empty = json.export(&Model::new()).unwrap();
        assert_eq!(empty, r#"{"m":[]}"#);
        assert_eq!(json.import(&empty).unwrap().molecule_count(), 0);
    }

    #[test]
    fn export_omits_defaults_and_round_trips() {
        let json = JsonConverter::new();
        let text = r#"{"m": [
            {"a": [{"x": 0, "y": 0}, {"x": 1.5, "y": 0, "l": "N"}, {"x": 3, "y": 0, "l": "Ph"}],
             "b": [{"b": 0, "e": 1}, {"b": 1, "e": 2, "o": 1.5, "s": "recessed"}]},
            {"a": [{"x": 9, "y": 9, "l": "Cl", "c": -1}]}
        ]}"#;
        let model = json.import(text).unwrap();
        let out = json.export(&model).unwrap();
        assert!(out.contains('\n'));
        assert!(!out.contains("\"o\": 1.0"));
        assert!(out.contains("\"o\": 1.5"));
        assert!(out.contains("\"s\": \"recessed\""));
        assert!(out.contains("\"l\": \"Ph\""));
        assert_eq!(json.import(&out).unwrap(), model);
    }

    #[test]
    fn nested_molecules_are_flattened() {
        let mut parent = Molecule::new();
        let mut child = Molecule::new();
        child.add_atom(Atom::new(Element::O, [0.0, 0.0]));
        parent.add_child(child.clone());
        parent.add_child(child);
        let mut model = Model::new();
        model.add_molecule(parent);

        let out = JsonConverter::new().export(&model).unwrap();
        let back = JsonConverter::new().import(&out).unwrap();
        assert_eq!(back.molecule_count(), 1);
        assert_eq!(back.molecules().next().unwrap().atom_count(), 2);
    }

    #[test]
    fn errors() {
        let json = JsonConverter::new();
        assert!(matches!(json.import("[1, 2]"), Err(JsonError::NotAnObject)));
        assert!(matches!(json.import("{'a': ["), Err(JsonError::Json(_))));
        assert!(matches!(
            json.import(r#"{"a":[{"x":0,"y":0}],"b":[{"b":0,"e":3}]}"#),
            Err(JsonError::AtomIndex { index: 3, atoms: 1, .. })
        ));
        assert!(matches!(
            json.import(r#"{"a":[{"x":0,"y":0}],"b":[{"b":0,"e":0}]}"#),
            Err(JsonError::SelfBond { bond: 0, index: 0, .. })
        ));
        assert!(matches!(
            json.import(r#"{"a":[{"x":0,"y":0,"l":"Qq"}]}"#),
            Err(JsonError::UnknownLabel(l)) if l == "Qq"
        ));
        assert!(matches!(
            json.import(r#"{"a":[{"x":0,"y":0},{"x":1,"y":0}],"b":[{"b":0,"e":1,"o":1.7}]}"#),
            Err(JsonError::InvalidOrder(_))
        ));
        assert!(matches!(
            json.import(r#"{"a":[{"x":0,"y":0},{"x":1,"y":0}],"b":[{"b":0,"e":1,"s":"up"}]}"#),
            Err(JsonError::UnknownStereo(_))
        ));
    }

    #[test]
    fn quote_normalisation() {
        assert_eq!(normalise_quotes(r#"{"a":1}"#), r#"{"a":1}"#);
        assert_eq!(normalise_quotes("{'l':'N'}"), r#"{"l":"N"}"#);
        assert_eq!(normalise_quotes(r#"{"n":"it's"}"#), r#"{"n":"it's"}"#);
        assert_eq!(normalise_quotes(r#"{'n':'say "hi"'}"#), r#"{"n":"say \"hi\""}"#);
        assert_eq!(normalise_quotes(r"{'n':'it\'s'}"), r#"{"n":"it's"}"#);
    }
}
