//! Periodic table reference data and the element kinds an atom can carry.
//!
//! [`Element`] is the closed set of real elements. [`ElementBase`] is what an
//! [`Atom`](crate::Atom) actually holds: either a plain element or a named
//! [`FunctionalGroup`] standing in for a whole fragment.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::functional_group::FunctionalGroup;

/// Periodic table data for elements 1–118.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ar = 18,
    K = 19,
    Ca = 20,
    Sc = 21,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Kr = 36,
    Rb = 37,
    Sr = 38,
    Y = 39,
    Zr = 40,
    Nb = 41,
    Mo = 42,
    Tc = 43,
    Ru = 44,
    Rh = 45,
    Pd = 46,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Sb = 51,
    Te = 52,
    I = 53,
    Xe = 54,
    Cs = 55,
    Ba = 56,
    La = 57,
    Ce = 58,
    Pr = 59,
    Nd = 60,
    Pm = 61,
    Sm = 62,
    Eu = 63,
    Gd = 64,
    Tb = 65,
    Dy = 66,
    Ho = 67,
    Er = 68,
    Tm = 69,
    Yb = 70,
    Lu = 71,
    Hf = 72,
    Ta = 73,
    W = 74,
    Re = 75,
    Os = 76,
    Ir = 77,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
    Po = 84,
    At = 85,
    Rn = 86,
    Fr = 87,
    Ra = 88,
    Ac = 89,
    Th = 90,
    Pa = 91,
    U = 92,
    Np = 93,
    Pu = 94,
    Am = 95,
    Cm = 96,
    Bk = 97,
    Cf = 98,
    Es = 99,
    Fm = 100,
    Md = 101,
    No = 102,
    Lr = 103,
    Rf = 104,
    Db = 105,
    Sg = 106,
    Bh = 107,
    Hs = 108,
    Mt = 109,
    Ds = 110,
    Rg = 111,
    Cn = 112,
    Nh = 113,
    Fl = 114,
    Mc = 115,
    Lv = 116,
    Ts = 117,
    Og = 118,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        if (1..=118).contains(&n) {
            Some(ELEMENT_DATA[n as usize - 1].0)
        } else {
            None
        }
    }

    /// Case-sensitive symbol lookup: `"Cl"` is chlorine, `"CL"` is nothing.
    pub fn from_symbol(s: &str) -> Option<Element> {
        ELEMENT_DATA
            .iter()
            .find(|(_, sym, _, _)| *sym == s)
            .map(|(e, _, _, _)| *e)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        ELEMENT_DATA[self as usize - 1].1
    }

    pub fn name(self) -> &'static str {
        ELEMENT_DATA[self as usize - 1].2
    }

    /// Standard atomic weight in daltons.
    pub fn atomic_weight(self) -> f64 {
        ELEMENT_DATA[self as usize - 1].3
    }

    /// Valences used when deriving implicit hydrogens. Empty for elements
    /// (mostly metals) that never receive implicit hydrogens.
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C | Element::Si | Element::Ge => &[4],
            Element::N | Element::P | Element::As => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::At => &[1],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Valence-shell electron count for the elements that carry default
    /// valences; `None` otherwise.
    pub fn outer_shell_electrons(self) -> Option<u8> {
        match self {
            Element::H => Some(1),
            Element::B => Some(3),
            Element::C | Element::Si | Element::Ge => Some(4),
            Element::N | Element::P | Element::As => Some(5),
            Element::O | Element::S | Element::Se | Element::Te => Some(6),
            Element::F | Element::Cl | Element::Br | Element::I | Element::At => Some(7),
            _ => None,
        }
    }

    pub fn iter() -> impl Iterator<Item = Element> {
        ELEMENT_DATA.iter().map(|(e, _, _, _)| *e)
    }

    /// Every element symbol, two-letter symbols first.
    ///
    /// A scanner that tries symbols in this order never mistakes the `C` of
    /// `Cl` for carbon.
    pub fn symbols_longest_first() -> &'static [&'static str] {
        &SYMBOLS_LONGEST_FIRST
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

static SYMBOLS_LONGEST_FIRST: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut symbols: Vec<&'static str> = ELEMENT_DATA.iter().map(|(_, s, _, _)| *s).collect();
    // stable sort keeps periodic order within a length
    symbols.sort_by(|a, b| b.len().cmp(&a.len()));
    symbols
});

/// What an atom is: a real element, or a functional group abbreviation
/// (`Ph`, `CO2H`, ...) that stands for several atoms at once.
#[derive(Debug, Clone)]
pub enum ElementBase {
    Element(Element),
    FunctionalGroup(Arc<FunctionalGroup>),
}

impl ElementBase {
    /// Text written to files: the element symbol or the group name.
    pub fn symbol(&self) -> &str {
        match self {
            ElementBase::Element(e) => e.symbol(),
            ElementBase::FunctionalGroup(g) => g.name(),
        }
    }

    pub fn as_element(&self) -> Option<Element> {
        match self {
            ElementBase::Element(e) => Some(*e),
            ElementBase::FunctionalGroup(_) => None,
        }
    }

    pub fn as_functional_group(&self) -> Option<&FunctionalGroup> {
        match self {
            ElementBase::Element(_) => None,
            ElementBase::FunctionalGroup(g) => Some(g),
        }
    }

    pub fn is_element(&self, element: Element) -> bool {
        matches!(self, ElementBase::Element(e) if *e == element)
    }

    pub fn atomic_weight(&self) -> f64 {
        match self {
            ElementBase::Element(e) => e.atomic_weight(),
            ElementBase::FunctionalGroup(g) => g.atomic_weight(),
        }
    }

    /// Element counts this atom contributes to a formula. A group expands
    /// to its components.
    pub fn element_counts(&self) -> Vec<(Element, u32)> {
        match self {
            ElementBase::Element(e) => vec![(*e, 1)],
            ElementBase::FunctionalGroup(g) => g.components().to_vec(),
        }
    }
}

impl Default for ElementBase {
    fn default() -> Self {
        ElementBase::Element(Element::C)
    }
}

impl PartialEq for ElementBase {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementBase::Element(a), ElementBase::Element(b)) => a == b,
            (ElementBase::FunctionalGroup(a), ElementBase::FunctionalGroup(b)) => {
                a.name() == b.name()
            }
            _ => false,
        }
    }
}

impl From<Element> for ElementBase {
    fn from(e: Element) -> Self {
        ElementBase::Element(e)
    }
}

impl fmt::Display for ElementBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// (element, symbol, name, standard atomic weight); IUPAC CIAAW 2021, with the
// longest-lived isotope's mass number for elements without stable isotopes.
static ELEMENT_DATA: [(Element, &str, &str, f64); 118] = [
    (Element::H, "H", "Hydrogen", 1.008),
    (Element::He, "He", "Helium", 4.002602),
    (Element::Li, "Li", "Lithium", 6.941),
    (Element::Be, "Be", "Beryllium", 9.0121831),
    (Element::B, "B", "Boron", 10.81),
    (Element::C, "C", "Carbon", 12.011),
    (Element::N, "N", "Nitrogen", 14.007),
    (Element::O, "O", "Oxygen", 15.999),
    (Element::F, "F", "Fluorine", 18.998403163),
    (Element::Ne, "Ne", "Neon", 20.1797),
    (Element::Na, "Na", "Sodium", 22.98976928),
    (Element::Mg, "Mg", "Magnesium", 24.305),
    (Element::Al, "Al", "Aluminium", 26.9815384),
    (Element::Si, "Si", "Silicon", 28.085),
    (Element::P, "P", "Phosphorus", 30.973761998),
    (Element::S, "S", "Sulfur", 32.06),
    (Element::Cl, "Cl", "Chlorine", 35.45),
    (Element::Ar, "Ar", "Argon", 39.948),
    (Element::K, "K", "Potassium", 39.0983),
    (Element::Ca, "Ca", "Calcium", 40.078),
    (Element::Sc, "Sc", "Scandium", 44.955908),
    (Element::Ti, "Ti", "Titanium", 47.867),
    (Element::V, "V", "Vanadium", 50.9415),
    (Element::Cr, "Cr", "Chromium", 51.9961),
    (Element::Mn, "Mn", "Manganese", 54.938043),
    (Element::Fe, "Fe", "Iron", 55.845),
    (Element::Co, "Co", "Cobalt", 58.933194),
    (Element::Ni, "Ni", "Nickel", 58.6934),
    (Element::Cu, "Cu", "Copper", 63.546),
    (Element::Zn, "Zn", "Zinc", 65.38),
    (Element::Ga, "Ga", "Gallium", 69.723),
    (Element::Ge, "Ge", "Germanium", 72.630),
    (Element::As, "As", "Arsenic", 74.921595),
    (Element::Se, "Se", "Selenium", 78.971),
    (Element::Br, "Br", "Bromine", 79.904),
    (Element::Kr, "Kr", "Krypton", 83.798),
    (Element::Rb, "Rb", "Rubidium", 85.4678),
    (Element::Sr, "Sr", "Strontium", 87.62),
    (Element::Y, "Y", "Yttrium", 88.90584),
    (Element::Zr, "Zr", "Zirconium", 91.224),
    (Element::Nb, "Nb", "Niobium", 92.90637),
    (Element::Mo, "Mo", "Molybdenum", 95.95),
    (Element::Tc, "Tc", "Technetium", 97.0),
    (Element::Ru, "Ru", "Ruthenium", 101.07),
    (Element::Rh, "Rh", "Rhodium", 102.90549),
    (Element::Pd, "Pd", "Palladium", 106.42),
    (Element::Ag, "Ag", "Silver", 107.8682),
    (Element::Cd, "Cd", "Cadmium", 112.414),
    (Element::In, "In", "Indium", 114.818),
    (Element::Sn, "Sn", "Tin", 118.710),
    (Element::Sb, "Sb", "Antimony", 121.760),
    (Element::Te, "Te", "Tellurium", 127.60),
    (Element::I, "I", "Iodine", 126.90447),
    (Element::Xe, "Xe", "Xenon", 131.293),
    (Element::Cs, "Cs", "Caesium", 132.90545196),
    (Element::Ba, "Ba", "Barium", 137.327),
    (Element::La, "La", "Lanthanum", 138.90547),
    (Element::Ce, "Ce", "Cerium", 140.116),
    (Element::Pr, "Pr", "Praseodymium", 140.90766),
    (Element::Nd, "Nd", "Neodymium", 144.242),
    (Element::Pm, "Pm", "Promethium", 145.0),
    (Element::Sm, "Sm", "Samarium", 150.36),
    (Element::Eu, "Eu", "Europium", 151.964),
    (Element::Gd, "Gd", "Gadolinium", 157.25),
    (Element::Tb, "Tb", "Terbium", 158.925354),
    (Element::Dy, "Dy", "Dysprosium", 162.500),
    (Element::Ho, "Ho", "Holmium", 164.930328),
    (Element::Er, "Er", "Erbium", 167.259),
    (Element::Tm, "Tm", "Thulium", 168.934218),
    (Element::Yb, "Yb", "Ytterbium", 173.045),
    (Element::Lu, "Lu", "Lutetium", 174.9668),
    (Element::Hf, "Hf", "Hafnium", 178.486),
    (Element::Ta, "Ta", "Tantalum", 180.94788),
    (Element::W, "W", "Tungsten", 183.84),
    (Element::Re, "Re", "Rhenium", 186.207),
    (Element::Os, "Os", "Osmium", 190.23),
    (Element::Ir, "Ir", "Iridium", 192.217),
    (Element::Pt, "Pt", "Platinum", 195.084),
    (Element::Au, "Au", "Gold", 196.966570),
    (Element::Hg, "Hg", "Mercury", 200.592),
    (Element::Tl, "Tl", "Thallium", 204.38),
    (Element::Pb, "Pb", "Lead", 207.2),
    (Element::Bi, "Bi", "Bismuth", 208.98040),
    (Element::Po, "Po", "Polonium", 209.0),
    (Element::At, "At", "Astatine", 210.0),
    (Element::Rn, "Rn", "Radon", 222.0),
    (Element::Fr, "Fr", "Francium", 223.0),
    (Element::Ra, "Ra", "Radium", 226.0),
    (Element::Ac, "Ac", "Actinium", 227.0),
    (Element::Th, "Th", "Thorium", 232.0377),
    (Element::Pa, "Pa", "Protactinium", 231.03588),
    (Element::U, "U", "Uranium", 238.02891),
    (Element::Np, "Np", "Neptunium", 237.0),
    (Element::Pu, "Pu", "Plutonium", 244.0),
    (Element::Am, "Am", "Americium", 243.0),
    (Element::Cm, "Cm", "Curium", 247.0),
    (Element::Bk, "Bk", "Berkelium", 247.0),
    (Element::Cf, "Cf", "Californium", 251.0),
    (Element::Es, "Es", "Einsteinium", 252.0),
    (Element::Fm, "Fm", "Fermium", 257.0),
    (Element::Md, "Md", "Mendelevium", 258.0),
    (Element::No, "No", "Nobelium", 259.0),
    (Element::Lr, "Lr", "Lawrencium", 266.0),
    (Element::Rf, "Rf", "Rutherfordium", 267.0),
    (Element::Db, "Db", "Dubnium", 268.0),
    (Element::Sg, "Sg", "Seaborgium", 269.0),
    (Element::Bh, "Bh", "Bohrium", 270.0),
    (Element::Hs, "Hs", "Hassium", 277.0),
    (Element::Mt, "Mt", "Meitnerium", 278.0),
    (Element::Ds, "Ds", "Darmstadtium", 281.0),
    (Element::Rg, "Rg", "Roentgenium", 282.0),
    (Element::Cn, "Cn", "Copernicium", 285.0),
    (Element::Nh, "Nh", "Nihonium", 286.0),
    (Element::Fl, "Fl", "Flerovium", 289.0),
    (Element::Mc, "Mc", "Moscovium", 290.0),
    (Element::Lv, "Lv", "Livermorium", 293.0),
    (Element::Ts, "Ts", "Tennessine", 294.0),
    (Element::Og, "Og", "Oganesson", 294.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_atomic_num_round_trip() {
        for n in 1u8..=118 {
            let e = Element::from_atomic_num(n).unwrap();
            assert_eq!(e.atomic_num(), n);
        }
        assert!(Element::from_atomic_num(0).is_none());
        assert!(Element::from_atomic_num(119).is_none());
    }

    #[test]
    fn discriminants_are_atomic_numbers() {
        assert_eq!(Element::H as u8, 1);
        assert_eq!(Element::Fe as u8, 26);
        assert_eq!(Element::Og as u8, 118);
        for n in 1u8..=118 {
            assert_eq!(Element::from_atomic_num(n).unwrap() as u8, n);
        }
    }

    #[test]
    fn from_symbol_is_case_sensitive() {
        assert_eq!(Element::from_symbol("Cl"), Some(Element::Cl));
        assert_eq!(Element::from_symbol("CL"), None);
        assert_eq!(Element::from_symbol("cl"), None);
        assert_eq!(Element::from_symbol("Og"), Some(Element::Og));
    }

    #[test]
    fn symbol_and_name_spot_check() {
        assert_eq!(Element::Fe.symbol(), "Fe");
        assert_eq!(Element::Fe.name(), "Iron");
        assert_eq!(Element::W.name(), "Tungsten");
        assert_eq!(format!("{}", Element::Na), "Na");
    }

    #[test]
    fn weights_positive_and_ordered_table() {
        for (i, e) in Element::iter().enumerate() {
            assert_eq!(e.atomic_num() as usize, i + 1);
            assert!(e.atomic_weight() > 0.0, "{e:?}");
        }
        assert!((Element::C.atomic_weight() - 12.011).abs() < 1e-9);
    }

    #[test]
    fn longest_symbols_come_first() {
        let symbols = Element::symbols_longest_first();
        assert_eq!(symbols.len(), 118);
        let first_single = symbols.iter().position(|s| s.len() == 1).unwrap();
        assert!(symbols[first_single..].iter().all(|s| s.len() == 1));
        assert!(symbols[..first_single].contains(&"Cl"));
    }

    #[test]
    fn default_valences_for_organic_elements() {
        assert_eq!(Element::C.default_valences(), &[4]);
        assert_eq!(Element::N.default_valences(), &[3, 5]);
        assert!(Element::Fe.default_valences().is_empty());
        assert_eq!(Element::O.outer_shell_electrons(), Some(6));
        assert_eq!(Element::Fe.outer_shell_electrons(), None);
    }

    #[test]
    fn element_base_symbol_and_equality() {
        let c: ElementBase = Element::C.into();
        assert_eq!(c.symbol(), "C");
        assert!(c.is_element(Element::C));
        assert_eq!(c, ElementBase::default());
        assert_ne!(c, ElementBase::Element(Element::N));
        assert_eq!(c.element_counts(), vec![(Element::C, 1)]);
    }
}
