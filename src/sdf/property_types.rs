use serde::{Deserialize, Serialize};

const BUNDLED_PROPERTY_TYPES: &str = include_str!("../../resources/property_types.json");

/// Translation between an SDF data tag and the type tag a name or formula
/// carries in the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    #[serde(rename = "ExternalName")]
    pub external_name: String,
    #[serde(rename = "InternalName")]
    pub internal_name: String,
    #[serde(rename = "IsFormula", default)]
    pub is_formula: bool,
}

impl PropertyType {
    pub fn new(
        external_name: impl Into<String>,
        internal_name: impl Into<String>,
        is_formula: bool,
    ) -> Self {
        Self {
            external_name: external_name.into(),
            internal_name: internal_name.into(),
            is_formula,
        }
    }
}

/// Ordered property type table. Several external tags may share one
/// internal name; export uses the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTypes {
    types: Vec<PropertyType>,
}

impl PropertyTypes {
    pub fn new(types: Vec<PropertyType>) -> Self {
        Self { types }
    }

    /// The table compiled into the crate.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_PROPERTY_TYPES)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Case-insensitive lookup by SDF tag.
    pub fn by_external(&self, tag: &str) -> Option<&PropertyType> {
        let tag = tag.trim();
        self.types
            .iter()
            .find(|t| t.external_name.eq_ignore_ascii_case(tag))
    }

    pub fn by_internal(&self, name: &str) -> Option<&PropertyType> {
        self.types.iter().find(|t| t.internal_name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyType> + '_ {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
