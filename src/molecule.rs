//! A node of the molecule tree.
//!
//! A [`Molecule`] owns its own atoms and bonds (a [`Mol`] graph) plus any
//! number of child molecules. A molecule with children and no atoms is a
//! pure grouping, such as a salt split into cation and anion. Children hold
//! no link back to their parent; [`Model::parent_of`](crate::Model::parent_of)
//! answers that question by searching from the top.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::element::Element;
use crate::formula::{
    formula_parts_as_string, formula_parts_as_unicode, hill_formula_parts, MoleculeFormulaPart,
};
use crate::geometry;
use crate::graph_ops::{connected_components, fragment};
use crate::mol::Mol;
use crate::rings::{sort_rings_for_db_placement, Ring, RingInfo};
use crate::textual_property::TextualProperty;
use crate::traits::HasPosition2D;
use crate::valence;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub id: String,
    pub mol: Mol<Atom, Bond>,
    pub names: Vec<TextualProperty>,
    pub formulas: Vec<TextualProperty>,
    children: Vec<Molecule>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.mol.add_atom(atom)
    }

    pub fn add_bond(&mut self, start: NodeIndex, end: NodeIndex, bond: Bond) -> EdgeIndex {
        self.mol.add_bond(start, end, bond)
    }

    /// Index of the atom with the given id, among this molecule's own atoms.
    pub fn atom_index(&self, id: &str) -> Option<NodeIndex> {
        self.mol.atoms().find(|&idx| self.mol.atom(idx).id == id)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.mol.atoms().map(|idx| self.mol.atom(idx))
    }

    pub fn bonds(&self) -> impl Iterator<Item = &Bond> + '_ {
        self.mol.bonds().map(|idx| self.mol.bond(idx))
    }

    pub fn atom_count(&self) -> usize {
        self.mol.atom_count()
    }

    pub fn bond_count(&self) -> usize {
        self.mol.bond_count()
    }

    pub fn add_name(&mut self, name: TextualProperty) {
        self.names.push(name);
    }

    pub fn add_formula(&mut self, formula: TextualProperty) {
        self.formulas.push(formula);
    }

    pub fn children(&self) -> &[Molecule] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Molecule> {
        &mut self.children
    }

    pub fn add_child(&mut self, child: Molecule) {
        self.children.push(child);
    }

    /// Children but no atoms of its own.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty() && self.mol.atom_count() == 0
    }

    /// Number of levels in this subtree; 1 for a molecule without children.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Molecule::depth).max().unwrap_or(0)
    }

    /// This molecule and every descendant, parents before children.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Search this subtree (self included) by id.
    pub fn find(&self, id: &str) -> Option<&Molecule> {
        self.walk().find(|m| m.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Molecule> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Visit every molecule of the subtree mutably, parents first.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Molecule)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    pub fn total_atom_count(&self) -> usize {
        self.walk().map(Molecule::atom_count).sum()
    }

    pub fn total_bond_count(&self) -> usize {
        self.walk().map(Molecule::bond_count).sum()
    }

    /// Molecules in the subtree, self included.
    pub fn total_molecule_count(&self) -> usize {
        self.walk().count()
    }

    pub fn total_name_count(&self) -> usize {
        self.walk().map(|m| m.names.len()).sum()
    }

    pub fn total_formula_count(&self) -> usize {
        self.walk().map(|m| m.formulas.len()).sum()
    }

    pub fn ring_count(&self) -> usize {
        RingInfo::sssr(&self.mol).num_rings()
    }

    pub fn total_ring_count(&self) -> usize {
        self.walk().map(Molecule::ring_count).sum()
    }

    /// Append `other`'s own atoms and bonds (not its children, names or
    /// formulas) to this molecule's graph.
    pub fn absorb(&mut self, other: &Molecule) {
        let offset: Vec<NodeIndex> = other
            .mol
            .atoms()
            .map(|idx| self.mol.add_atom(other.mol.atom(idx).clone()))
            .collect();
        for edge in other.mol.bonds() {
            if let Some((a, b)) = other.mol.bond_endpoints(edge) {
                self.mol
                    .add_bond(offset[a.index()], offset[b.index()], other.mol.bond(edge).clone());
            }
        }
    }

    /// One flat molecule holding every atom, bond, name and formula of the
    /// subtree. The id is kept.
    pub fn flattened(&self) -> Molecule {
        let mut flat = Molecule::new().with_id(self.id.clone());
        for m in self.walk() {
            flat.absorb(m);
            flat.names.extend(m.names.iter().cloned());
            flat.formulas.extend(m.formulas.iter().cloned());
        }
        flat
    }

    /// Structural copy in which disconnected pieces of this molecule's own
    /// graph become child molecules. A connected molecule comes back as a
    /// plain copy.
    pub fn split(&self) -> Molecule {
        let mut copy = self.clone();
        let components = connected_components(&self.mol);
        if components.len() <= 1 {
            return copy;
        }
        copy.mol = Mol::new();
        let existing = std::mem::take(&mut copy.children);
        copy.children = components
            .iter()
            .map(|component| Molecule {
                mol: fragment(&self.mol, component),
                ..Molecule::default()
            })
            .collect();
        copy.children.extend(existing);
        copy
    }

    pub fn rings(&self) -> Vec<Ring> {
        RingInfo::sssr(&self.mol)
            .into_rings()
            .into_iter()
            .map(|atoms| Ring::new(&self.mol, atoms))
            .collect()
    }

    /// This molecule's rings in the order double bonds are placed.
    pub fn sort_rings_for_db_placement(&self) -> Vec<Ring> {
        let mut rings = self.rings();
        sort_rings_for_db_placement(&mut rings);
        rings
    }

    /// Recompute implicit hydrogens throughout the subtree.
    pub fn refresh(&mut self) {
        self.for_each_mut(&mut |m| valence::assign_implicit_hydrogens(&mut m.mol));
    }

    fn element_totals(&self) -> (Vec<(Element, u32)>, i32) {
        let mut counts = Vec::new();
        let mut charge = 0;
        for m in self.walk() {
            for idx in m.mol.atoms() {
                let atom = m.mol.atom(idx);
                counts.extend(atom.element.element_counts());
                let hydrogens = valence::implicit_hydrogens(&m.mol, idx);
                if hydrogens > 0 {
                    counts.push((Element::H, hydrogens as u32));
                }
                charge += atom.charge();
            }
        }
        (counts, charge)
    }

    /// Hill-ordered formula of the whole subtree, implicit hydrogens and
    /// functional group expansions included, net charge last.
    pub fn calculated_formula_parts(&self) -> Vec<MoleculeFormulaPart> {
        let (counts, charge) = self.element_totals();
        hill_formula_parts(counts, charge)
    }

    pub fn concise_formula(&self) -> String {
        formula_parts_as_string(&self.calculated_formula_parts())
    }

    pub fn unicode_formula(&self) -> String {
        formula_parts_as_unicode(&self.calculated_formula_parts())
    }

    pub fn molecular_weight(&self) -> f64 {
        let (counts, _) = self.element_totals();
        counts
            .iter()
            .map(|(e, n)| e.atomic_weight() * *n as f64)
            .sum()
    }

    /// Mean bond length over the subtree; 0 without bonds.
    pub fn mean_bond_length(&self) -> f64 {
        let (sum, n) = self
            .walk()
            .map(|m| geometry::bond_length_totals(&m.mol))
            .fold((0.0, 0), |(s, c), (ms, mc)| (s + ms, c + mc));
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    /// Mean position of every atom in the subtree; origin when empty.
    pub fn centroid(&self) -> [f64; 2] {
        let (sx, sy, n) = self
            .walk()
            .flat_map(|m| m.atoms())
            .fold((0.0, 0.0, 0usize), |(sx, sy, n), a| {
                let p = a.position_2d();
                (sx + p[0], sy + p[1], n + 1)
            });
        if n == 0 {
            [0.0, 0.0]
        } else {
            [sx / n as f64, sy / n as f64]
        }
    }

    pub fn scale_positions(&mut self, factor: f64) {
        self.for_each_mut(&mut |m| geometry::scale_positions(&mut m.mol, factor));
    }

    /// Every bond in the subtree has an MDL bond type in 1..=4.
    pub fn mdl_compatible(&self) -> bool {
        self.walk()
            .flat_map(|m| m.bonds())
            .all(|b| b.order.is_mdl_compatible())
    }
}

/// Pre-order iterator returned by [`Molecule::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Molecule>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Molecule;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondOrder;
    use crate::functional_group::FunctionalGroupRegistry;

    fn ring(size: usize, element: Element) -> Molecule {
        let mut m = Molecule::new();
        let atoms: Vec<_> = (0..size)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / size as f64;
                m.add_atom(Atom::new(element, [angle.cos(), angle.sin()]))
            })
            .collect();
        for i in 0..size {
            let order = if i % 2 == 0 { BondOrder::Double } else { BondOrder::Single };
            m.add_bond(atoms[i], atoms[(i + 1) % size], Bond::new(order));
        }
        m
    }

    fn sodium_chloride() -> Molecule {
        let mut m = Molecule::new().with_id("salt");
        m.add_atom(Atom::new(Element::Na, [0.0, 0.0]).with_charge(1));
        m.add_atom(Atom::new(Element::Cl, [2.0, 0.0]).with_charge(-1));
        m
    }

    #[test]
    fn benzene_derived_data() {
        let benzene = ring(6, Element::C);
        assert_eq!(benzene.ring_count(), 1);
        assert_eq!(benzene.unicode_formula(), "C₆H₆");
        assert_eq!(benzene.concise_formula(), "C 6 H 6");
        assert!((benzene.molecular_weight() - 78.114).abs() < 0.01);
        assert!(benzene.mdl_compatible());
        let c = benzene.centroid();
        assert!(c[0].abs() < 1e-9 && c[1].abs() < 1e-9);
    }

    #[test]
    fn split_salt_into_group() {
        let salt = sodium_chloride();
        let split = salt.split();
        assert!(split.is_group());
        assert_eq!(split.children().len(), 2);
        assert_eq!(split.id, "salt");
        assert_eq!(split.total_atom_count(), 2);
        assert_eq!(split.depth(), 2);
        assert_eq!(split.unicode_formula(), "ClNa");
    }

    #[test]
    fn split_connected_is_plain_copy() {
        let benzene = ring(6, Element::C);
        assert_eq!(benzene.split(), benzene);
    }

    #[test]
    fn flatten_folds_children() {
        let mut parent = Molecule::new().with_id("p");
        parent.add_name(TextualProperty::new("common:Name", "pair"));
        let mut child = ring(6, Element::C);
        child.add_formula(TextualProperty::new("cml:concise", "C 6 H 6"));
        parent.add_child(child);
        parent.add_child(ring(5, Element::C));

        assert_eq!(parent.total_molecule_count(), 3);
        assert_eq!(parent.total_ring_count(), 2);

        let flat = parent.flattened();
        assert!(flat.children().is_empty());
        assert_eq!(flat.atom_count(), 11);
        assert_eq!(flat.bond_count(), 11);
        assert_eq!(flat.names.len(), 1);
        assert_eq!(flat.formulas.len(), 1);
        assert_eq!(flat.id, "p");
    }

    #[test]
    fn walk_is_pre_order() {
        let mut root = Molecule::new().with_id("r");
        let mut a = Molecule::new().with_id("a");
        a.add_child(Molecule::new().with_id("a1"));
        root.add_child(a);
        root.add_child(Molecule::new().with_id("b"));
        let ids: Vec<_> = root.walk().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["r", "a", "a1", "b"]);
        assert!(root.find("a1").is_some());
        assert!(root.find_mut("b").is_some());
        assert!(root.find("zz").is_none());
    }

    #[test]
    fn functional_groups_expand_in_formula() {
        let registry = FunctionalGroupRegistry::global();
        let mut m = Molecule::new();
        let c = m.add_atom(Atom::new(Element::C, [0.0, 0.0]));
        let oh = m.add_atom(Atom::new(registry.resolve("OH").unwrap(), [1.0, 0.0]));
        m.add_bond(c, oh, Bond::default());
        // CH3 on the carbon plus the OH group
        assert_eq!(m.unicode_formula(), "CH₄O");
    }

    #[test]
    fn charge_in_formula() {
        let mut m = Molecule::new();
        m.add_atom(Atom::new(Element::N, [0.0, 0.0]).with_charge(1));
        assert_eq!(m.unicode_formula(), "H₄N⁺");
    }

    #[test]
    fn partial_bonds_are_not_mdl_compatible() {
        let mut m = ring(3, Element::C);
        let first = m.mol.bonds().next().unwrap();
        m.mol.bond_mut(first).order = BondOrder::Half;
        assert!(!m.mdl_compatible());
    }

    #[test]
    fn refresh_fills_hydrogens_at_every_depth() {
        let mut parent = Molecule::new();
        parent.add_child(ring(6, Element::C));
        parent.refresh();
        let child = &parent.children()[0];
        assert!(child.atoms().all(|a| a.implicit_hydrogens == 1));
    }

    #[test]
    fn placement_order_prefers_six_rings() {
        let mut m = ring(5, Element::C);
        m.absorb(&ring(6, Element::C));
        let rings = m.sort_rings_for_db_placement();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].size(), 6);
        assert_eq!(rings[1].size(), 5);
    }

    #[test]
    fn mean_bond_length_and_scaling() {
        let mut m = Molecule::new();
        m.add_child(ring(6, Element::C));
        let before = m.mean_bond_length();
        assert!((before - 1.0).abs() < 1e-9);
        m.scale_positions(1.54);
        assert!((m.mean_bond_length() - 1.54).abs() < 1e-9);
        assert_eq!(Molecule::new().mean_bond_length(), 0.0);
    }
}
