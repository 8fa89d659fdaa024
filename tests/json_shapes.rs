use chemconv::json::{JsonModel, JsonMolecule};
use chemconv::{BondStereo, Element, JsonConverter, JsonError};

#[test]
fn single_quoted_nitrogen() {
    let model = JsonConverter::new()
        .import("{'a':[{'l':'N','x':0,'y':0}]}")
        .unwrap();
    assert_eq!(model.molecule_count(), 1);
    let m = model.molecules().next().unwrap();
    assert_eq!(m.atom_count(), 1);
    assert_eq!(m.bond_count(), 0);
    assert!(m.atoms().next().unwrap().element.is_element(Element::N));
}

#[test]
fn bare_and_wrapped_shapes_read_alike() {
    let json = JsonConverter::new();
    let bare = r#"{"a":[{"x":0,"y":0},{"x":1.54,"y":0,"l":"O"}],"b":[{"b":0,"e":1,"s":"ambiguous"}]}"#;
    let wrapped = format!(r#"{{"m":[{bare}]}}"#);
    let from_bare = json.import(bare).unwrap();
    let from_wrapped = json.import(&wrapped).unwrap();
    assert_eq!(from_bare, from_wrapped);
    let bond = from_bare.molecules().next().unwrap().bonds().next().unwrap().clone();
    assert_eq!(bond.stereo, BondStereo::Indeterminate);
}

#[test]
fn exported_shape_follows_molecule_count() {
    let json = JsonConverter::new().compact(true);

    let one = json.import(r#"{"a":[{"x":0,"y":0}]}"#).unwrap();
    let text = json.export(&one).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.get("m").is_none());
    let parsed: JsonMolecule = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.a.len(), 1);

    let two = json
        .import(r#"{"m":[{"a":[{"x":0,"y":0}]},{"a":[{"x":3,"y":0,"l":"S"}]}]}"#)
        .unwrap();
    let text = json.export(&two).unwrap();
    let parsed: JsonModel = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.m.len(), 2);
    assert_eq!(parsed.m[1].a[0].l.as_deref(), Some("S"));
    assert_eq!(json.import(&text).unwrap(), two);
}

#[test]
fn bond_indices_are_positions_in_the_atom_array() {
    let json = JsonConverter::new().compact(true);
    let model = json
        .import(r#"{"a":[{"x":0,"y":0},{"x":1,"y":0},{"x":2,"y":0,"l":"Cl"}],"b":[{"b":2,"e":1},{"b":1,"e":0,"o":3}]}"#)
        .unwrap();
    let text = json.export(&model).unwrap();
    let parsed: JsonMolecule = serde_json::from_str(&text).unwrap();
    assert_eq!((parsed.b[0].b, parsed.b[0].e), (2, 1));
    assert_eq!((parsed.b[1].b, parsed.b[1].e, parsed.b[1].o), (1, 0, Some(3.0)));
}

#[test]
fn malformed_input_is_a_hard_error() {
    let json = JsonConverter::new();
    assert!(matches!(json.import("not json"), Err(JsonError::Json(_))));
    assert!(matches!(json.import("\"a string\""), Err(JsonError::NotAnObject)));
    assert!(matches!(
        json.import(r#"{"a":[{"x":"left","y":0}]}"#),
        Err(JsonError::Json(_))
    ));
}
