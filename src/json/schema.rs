//! Wire types of the compact JSON format. Field names are single letters
//! to keep clipboard payloads small.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonAtom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Element symbol or group name; absent means carbon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonBond {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,
    /// Start atom, as a position in the molecule's atom array.
    pub b: usize,
    /// End atom, as a position in the molecule's atom array.
    pub e: usize,
    /// Numeric order; absent means single.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonMolecule {
    #[serde(default)]
    pub a: Vec<JsonAtom>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub b: Vec<JsonBond>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonModel {
    #[serde(default)]
    pub m: Vec<JsonMolecule>,
}
