use crate::bond::BondOrder;

pub trait HasPosition2D {
    fn position_2d(&self) -> [f64; 2];
    fn set_position_2d(&mut self, pos: [f64; 2]);
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i32;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}
