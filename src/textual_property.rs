/// Type tag under which the concise (space separated) formula is stored.
pub const CONCISE_FORMULA_TAG: &str = "cml:concise";

/// Type tag given to names whose source did not classify them.
pub const DEFAULT_NAME_TAG: &str = "chem:Name";

/// Type tag given to inline formulas that name no convention.
pub const DEFAULT_FORMULA_TAG: &str = "chem:Formula";

/// A typed string attached to a molecule: a name or a formula.
///
/// Several properties may share a type tag; a molecule can carry two
/// synonyms or the same formula in two conventions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextualProperty {
    pub id: String,
    pub type_tag: String,
    pub value: String,
}

impl TextualProperty {
    pub fn new(type_tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_concise_formula(&self) -> bool {
        self.type_tag == CONCISE_FORMULA_TAG
    }
}
