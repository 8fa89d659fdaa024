/// Bond order as drawn.
///
/// Partial orders exist because sketchers draw half bonds (dashed +
/// solid). `OneAndHalf` and `Aromatic` share a numeric value but are
/// different drawings, so the enum is closed rather than a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    Zero,
    Half,
    #[default]
    Single,
    OneAndHalf,
    Aromatic,
    Double,
    TwoAndHalf,
    Triple,
}

impl BondOrder {
    pub fn numeric(self) -> f64 {
        match self {
            BondOrder::Zero => 0.0,
            BondOrder::Half => 0.5,
            BondOrder::Single => 1.0,
            BondOrder::OneAndHalf | BondOrder::Aromatic => 1.5,
            BondOrder::Double => 2.0,
            BondOrder::TwoAndHalf => 2.5,
            BondOrder::Triple => 3.0,
        }
    }

    /// Inverse of [`numeric`](Self::numeric). `1.5` reads back as
    /// `Aromatic`.
    pub fn from_numeric(value: f64) -> Option<BondOrder> {
        const ORDERS: [BondOrder; 7] = [
            BondOrder::Zero,
            BondOrder::Half,
            BondOrder::Single,
            BondOrder::Aromatic,
            BondOrder::Double,
            BondOrder::TwoAndHalf,
            BondOrder::Triple,
        ];
        ORDERS
            .into_iter()
            .find(|o| (o.numeric() - value).abs() < 1e-6)
    }

    /// MDL bond type code. Orders the connection table cannot express map
    /// to 0, which lies outside the valid 1..=4 range.
    pub fn mdl_code(self) -> i32 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic | BondOrder::OneAndHalf => 4,
            BondOrder::Zero | BondOrder::Half | BondOrder::TwoAndHalf => 0,
        }
    }

    pub fn from_mdl_code(code: i32) -> Option<BondOrder> {
        match code {
            0 => Some(BondOrder::Zero),
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            4 => Some(BondOrder::Aromatic),
            _ => None,
        }
    }

    pub fn is_mdl_compatible(self) -> bool {
        (1..=4).contains(&self.mdl_code())
    }

    pub fn cml_token(self) -> &'static str {
        match self {
            BondOrder::Zero => "hbond",
            BondOrder::Half => "partial01",
            BondOrder::Single => "S",
            BondOrder::OneAndHalf => "partial12",
            BondOrder::Aromatic => "A",
            BondOrder::Double => "D",
            BondOrder::TwoAndHalf => "partial23",
            BondOrder::Triple => "T",
        }
    }

    /// Accepts the letter tokens, the `partialNN` tokens and plain numbers.
    pub fn from_cml_token(token: &str) -> Option<BondOrder> {
        let token = token.trim();
        let by_name = [
            ("hbond", BondOrder::Zero),
            ("partial01", BondOrder::Half),
            ("S", BondOrder::Single),
            ("partial12", BondOrder::OneAndHalf),
            ("A", BondOrder::Aromatic),
            ("D", BondOrder::Double),
            ("partial23", BondOrder::TwoAndHalf),
            ("T", BondOrder::Triple),
        ];
        by_name
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, order)| order)
            .or_else(|| token.parse::<f64>().ok().and_then(BondOrder::from_numeric))
    }
}

/// Wedge/hatch annotation. Start/end of the owning bond decide which end
/// is narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Wedge,
    Hatch,
    Indeterminate,
}

impl BondStereo {
    pub fn json_tag(self) -> Option<&'static str> {
        match self {
            BondStereo::None => None,
            BondStereo::Wedge => Some("protruding"),
            BondStereo::Hatch => Some("recessed"),
            BondStereo::Indeterminate => Some("ambiguous"),
        }
    }

    pub fn from_json_tag(tag: &str) -> Option<BondStereo> {
        match tag {
            "protruding" => Some(BondStereo::Wedge),
            "recessed" => Some(BondStereo::Hatch),
            "ambiguous" => Some(BondStereo::Indeterminate),
            _ => None,
        }
    }

    pub fn cml_token(self) -> Option<&'static str> {
        match self {
            BondStereo::None => None,
            BondStereo::Wedge => Some("W"),
            BondStereo::Hatch => Some("H"),
            BondStereo::Indeterminate => Some("S"),
        }
    }

    pub fn from_cml_token(token: &str) -> BondStereo {
        match token.trim() {
            "W" => BondStereo::Wedge,
            "H" => BondStereo::Hatch,
            "S" | "C" | "T" => BondStereo::Indeterminate,
            _ => BondStereo::None,
        }
    }

    pub fn mdl_code(self) -> i32 {
        match self {
            BondStereo::None => 0,
            BondStereo::Wedge => 1,
            BondStereo::Hatch => 6,
            BondStereo::Indeterminate => 4,
        }
    }

    /// Code 3 is the "either" marker on double bonds.
    pub fn from_mdl_code(code: i32) -> BondStereo {
        match code {
            1 => BondStereo::Wedge,
            6 => BondStereo::Hatch,
            3 | 4 => BondStereo::Indeterminate,
            _ => BondStereo::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bond {
    pub id: String,
    pub order: BondOrder,
    pub stereo: BondStereo,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_stereo(mut self, stereo: BondStereo) -> Self {
        self.stereo = stereo;
        self
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mdl_codes_cover_classic_orders() {
        assert_eq!(BondOrder::Single.mdl_code(), 1);
        assert_eq!(BondOrder::Double.mdl_code(), 2);
        assert_eq!(BondOrder::Triple.mdl_code(), 3);
        assert_eq!(BondOrder::Aromatic.mdl_code(), 4);
        assert!(!BondOrder::Zero.is_mdl_compatible());
        assert!(!BondOrder::TwoAndHalf.is_mdl_compatible());
        assert_eq!(BondOrder::from_mdl_code(4), Some(BondOrder::Aromatic));
        assert_eq!(BondOrder::from_mdl_code(8), None);
    }

    #[test]
    fn cml_tokens_accept_numbers_and_letters() {
        assert_eq!(BondOrder::from_cml_token("D"), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_cml_token("d"), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_cml_token("2"), Some(BondOrder::Double));
        assert_eq!(BondOrder::from_cml_token("partial12"), Some(BondOrder::OneAndHalf));
        assert_eq!(BondOrder::from_cml_token("1.5"), Some(BondOrder::Aromatic));
        assert_eq!(BondOrder::from_cml_token("quadruple"), None);
        for order in [BondOrder::Zero, BondOrder::Half, BondOrder::TwoAndHalf, BondOrder::Triple] {
            assert_eq!(BondOrder::from_cml_token(order.cml_token()), Some(order));
        }
    }

    #[test]
    fn numeric_values() {
        assert_eq!(BondOrder::OneAndHalf.numeric(), BondOrder::Aromatic.numeric());
        assert_eq!(BondOrder::from_numeric(2.5), Some(BondOrder::TwoAndHalf));
        assert_eq!(BondOrder::from_numeric(1.25), None);
    }

    #[test]
    fn stereo_tags() {
        assert_eq!(BondStereo::Wedge.json_tag(), Some("protruding"));
        assert_eq!(BondStereo::from_json_tag("recessed"), Some(BondStereo::Hatch));
        assert_eq!(BondStereo::from_json_tag("sideways"), None);
        assert_eq!(BondStereo::None.json_tag(), None);
        assert_eq!(BondStereo::from_mdl_code(6), BondStereo::Hatch);
        assert_eq!(BondStereo::from_mdl_code(3), BondStereo::Indeterminate);
        assert_eq!(BondStereo::from_cml_token("W"), BondStereo::Wedge);
        assert_eq!(BondStereo::from_cml_token("?"), BondStereo::None);
    }
}
