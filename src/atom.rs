use crate::element::{Element, ElementBase};

/// A node of a molecule graph.
///
/// `Atom` stores what the file formats carry: identity, 2D position,
/// element (or functional group), charge and isotope. The implicit
/// hydrogen count is derived data; importers leave it at zero and
/// [`Model::refresh`](crate::Model::refresh) fills it in.
///
/// Positions use screen orientation: y grows downward, as in CML written
/// by word-processor sketchers. The SDF converter flips y on the way in and
/// out.
///
/// # Examples
///
/// ```
/// use chemconv::{Atom, Element};
///
/// let oxygen = Atom::new(Element::O, [1.2, -0.4]).with_charge(-1);
/// assert_eq!(oxygen.element.symbol(), "O");
/// assert_eq!(oxygen.formal_charge, Some(-1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Identifier, unique within a [`Model`](crate::Model) after relabelling.
    pub id: String,
    pub element: ElementBase,
    pub position: [f64; 2],
    /// `None` when the source said nothing; `Some(0)` when it said zero.
    pub formal_charge: Option<i32>,
    /// Mass number; `None` means natural abundance.
    pub isotope: Option<u16>,
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(element: impl Into<ElementBase>, position: [f64; 2]) -> Self {
        Self {
            element: element.into(),
            position,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.formal_charge = Some(charge);
        self
    }

    pub fn with_isotope(mut self, mass_number: u16) -> Self {
        self.isotope = Some(mass_number);
        self
    }

    pub fn is_carbon(&self) -> bool {
        self.element.is_element(Element::C)
    }

    pub fn charge(&self) -> i32 {
        self.formal_charge.unwrap_or(0)
    }
}

impl crate::traits::HasPosition2D for Atom {
    fn position_2d(&self) -> [f64; 2] {
        self.position
    }

    fn set_position_2d(&mut self, pos: [f64; 2]) {
        self.position = pos;
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i32 {
        self.charge()
    }
}
