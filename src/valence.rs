use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::mol::Mol;
use crate::traits::HasBondOrder;

/// Sum of numeric bond orders around `atom`, rounded up so that an atom
/// shared by three aromatic bonds counts as fully bonded.
pub fn bond_order_sum<A, B: HasBondOrder>(mol: &Mol<A, B>, atom: NodeIndex) -> u32 {
    let sum: f64 = mol
        .bonds_of(atom)
        .map(|e| mol.bond(e).bond_order().numeric())
        .sum();
    sum.ceil() as u32
}

/// Implicit hydrogens for one atom.
///
/// Picks the smallest default valence that the charge-adjusted bond sum
/// fits under. Electron-rich atoms (five or more valence electrons) gain
/// valence with positive charge, as in ammonium; the others lose one per
/// unit of charge either way, as in carbocations and carbanions.
pub fn implicit_hydrogens<B: HasBondOrder>(mol: &Mol<Atom, B>, atom: NodeIndex) -> u8 {
    let a = mol.atom(atom);
    let element = match a.element.as_element() {
        Some(e) => e,
        None => return 0,
    };
    let outer = match element.outer_shell_electrons() {
        Some(n) => n,
        None => return 0,
    };
    let charge = a.charge();
    let bonded = bond_order_sum(mol, atom) as i32;

    element
        .default_valences()
        .iter()
        .map(|&v| {
            if outer >= 5 {
                v as i32 + charge
            } else {
                v as i32 - charge.abs()
            }
        })
        .find(|&target| target >= bonded)
        .map(|target| (target - bonded).clamp(0, u8::MAX as i32) as u8)
        .unwrap_or(0)
}

/// Recompute the derived hydrogen count of every atom in `mol`.
pub fn assign_implicit_hydrogens<B: HasBondOrder>(mol: &mut Mol<Atom, B>) {
    let counts: Vec<(NodeIndex, u8)> = mol
        .atoms()
        .map(|idx| (idx, implicit_hydrogens(mol, idx)))
        .collect();
    for (idx, count) in counts {
        mol.atom_mut(idx).implicit_hydrogens = count;
    }
}
