use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("V3000 connection tables are not supported")]
    UnsupportedV3000,

    #[error("failed to read the property type table: {0}")]
    PropertyTypes(#[from] serde_json::Error),

    #[error("molecule '{id}' has {atoms} atoms and {bonds} bonds; a V2000 table holds at most 999 of each")]
    TooLarge {
        id: String,
        atoms: usize,
        bonds: usize,
    },

    #[error("failed to format SDF output")]
    Format(#[from] std::fmt::Error),
}
