//! 2D coordinate helpers shared by the converters.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;
use crate::traits::HasPosition2D;

pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

pub fn bond_length<A: HasPosition2D, B>(mol: &Mol<A, B>, edge: EdgeIndex) -> Option<f64> {
    let (a, b) = mol.bond_endpoints(edge)?;
    Some(distance(
        mol.atom(a).position_2d(),
        mol.atom(b).position_2d(),
    ))
}

/// Sum of bond lengths and number of bonds, so callers can pool several
/// graphs before dividing.
pub fn bond_length_totals<A: HasPosition2D, B>(mol: &Mol<A, B>) -> (f64, usize) {
    mol.bonds()
        .filter_map(|e| bond_length(mol, e))
        .fold((0.0, 0), |(sum, n), len| (sum + len, n + 1))
}

/// Mean bond length; 0 for a graph without bonds.
pub fn mean_bond_length<A: HasPosition2D, B>(mol: &Mol<A, B>) -> f64 {
    match bond_length_totals(mol) {
        (_, 0) => 0.0,
        (sum, n) => sum / n as f64,
    }
}

/// Arithmetic mean of the given atoms' positions; origin for an empty set.
pub fn centroid<A: HasPosition2D, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> [f64; 2] {
    if atoms.is_empty() {
        return [0.0, 0.0];
    }
    let (sx, sy) = atoms.iter().fold((0.0, 0.0), |(sx, sy), &idx| {
        let p = mol.atom(idx).position_2d();
        (sx + p[0], sy + p[1])
    });
    let n = atoms.len() as f64;
    [sx / n, sy / n]
}

/// Multiply every coordinate by `factor` (scaling about the origin).
pub fn scale_positions<A: HasPosition2D, B>(mol: &mut Mol<A, B>, factor: f64) {
    for atom in mol.atom_weights_mut() {
        let p = atom.position_2d();
        atom.set_position_2d([p[0] * factor, p[1] * factor]);
    }
}
