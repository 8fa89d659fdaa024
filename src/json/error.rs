use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a molecule object or an {{\"m\": [...]}} wrapper")]
    NotAnObject,

    #[error("molecule {molecule}, bond {bond}: atom index {index} is out of range ({atoms} atoms)")]
    AtomIndex {
        molecule: usize,
        bond: usize,
        index: usize,
        atoms: usize,
    },

    #[error("molecule {molecule}, bond {bond}: both ends are atom {index}")]
    SelfBond {
        molecule: usize,
        bond: usize,
        index: usize,
    },

    #[error("unknown atom label {0:?}")]
    UnknownLabel(String),

    #[error("bond order {0} has no drawing")]
    InvalidOrder(f64),

    #[error("unknown bond stereo tag {0:?}")]
    UnknownStereo(String),
}
