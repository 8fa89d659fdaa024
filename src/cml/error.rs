use quick_xml::events::attributes::AttrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmlError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("document has no CML root element")]
    NoRoot,

    #[error("document ended inside <{0}>")]
    Truncated(String),

    #[error("text outside the root element: {0:?}")]
    StrayText(String),

    #[error("document root <{0}> is neither <cml> nor <molecule>")]
    UnknownRoot(String),

    #[error("<{0}> appears outside a molecule")]
    OutsideMolecule(String),

    #[error("unknown element type {0:?}")]
    UnknownElementType(String),

    #[error("attribute {attribute} has invalid value {value:?}")]
    InvalidAttribute { attribute: &'static str, value: String },

    #[error("bond {bond:?} refers to atom {atom:?}, which its molecule does not contain")]
    DanglingAtomRef { bond: String, atom: String },

    #[error("bond {bond:?} joins atom {atom:?} to itself")]
    SelfBond { bond: String, atom: String },
}
