//! The root of an imported or edited document: top-level molecules plus the
//! diagnostics gathered while reading them.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::molecule::Molecule;

/// How [`Model::relabel`] treats existing identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relabel {
    /// Renumber everything in pre-order: `m1`, `a1`, `b1`, `m1.n1`, `m1.f1`.
    Fresh,
    /// Keep every id that is non-empty and not already used; rename the rest.
    EnsureUnique,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    molecules: IndexMap<String, Molecule>,
    general_errors: Vec<String>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level molecule and return the key it was stored under.
    /// An empty or already-used id is replaced by a provisional `m{n}`.
    pub fn add_molecule(&mut self, mut molecule: Molecule) -> String {
        if molecule.id.is_empty() || self.molecules.contains_key(&molecule.id) {
            let mut n = self.molecules.len() + 1;
            while self.molecules.contains_key(&format!("m{n}")) {
                n += 1;
            }
            molecule.id = format!("m{n}");
        }
        let id = molecule.id.clone();
        self.molecules.insert(id.clone(), molecule);
        id
    }

    pub fn remove_molecule(&mut self, id: &str) -> Option<Molecule> {
        self.molecules.shift_remove(id)
    }

    /// Top-level molecule by id.
    pub fn molecule(&self, id: &str) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    pub fn molecule_mut(&mut self, id: &str) -> Option<&mut Molecule> {
        self.molecules.get_mut(id)
    }

    /// Top-level molecules in insertion order.
    pub fn molecules(&self) -> impl Iterator<Item = &Molecule> + '_ {
        self.molecules.values()
    }

    pub fn molecules_mut(&mut self) -> impl Iterator<Item = &mut Molecule> + '_ {
        self.molecules.values_mut()
    }

    /// Every molecule at every depth, parents before children.
    pub fn all_molecules(&self) -> impl Iterator<Item = &Molecule> + '_ {
        self.molecules.values().flat_map(Molecule::walk)
    }

    /// Molecule with the given id at any depth.
    pub fn find_molecule(&self, id: &str) -> Option<&Molecule> {
        self.all_molecules().find(|m| m.id == id)
    }

    pub fn find_molecule_mut(&mut self, id: &str) -> Option<&mut Molecule> {
        self.molecules.values_mut().find_map(|m| m.find_mut(id))
    }

    /// The molecule that directly contains `id`; `None` for top-level
    /// molecules and unknown ids.
    pub fn parent_of(&self, id: &str) -> Option<&Molecule> {
        self.all_molecules()
            .find(|m| m.children().iter().any(|c| c.id == id))
    }

    /// 0 for a top-level molecule, 1 for its children, and so on.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        fn search(m: &Molecule, id: &str, depth: usize) -> Option<usize> {
            if m.id == id {
                return Some(depth);
            }
            m.children()
                .iter()
                .find_map(|c| search(c, id, depth + 1))
        }
        self.molecules.values().find_map(|m| search(m, id, 0))
    }

    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    pub fn total_molecule_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_molecule_count).sum()
    }

    pub fn total_atom_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_atom_count).sum()
    }

    pub fn total_bond_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_bond_count).sum()
    }

    pub fn total_ring_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_ring_count).sum()
    }

    pub fn total_name_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_name_count).sum()
    }

    pub fn total_formula_count(&self) -> usize {
        self.molecules.values().map(Molecule::total_formula_count).sum()
    }

    pub fn general_errors(&self) -> &[String] {
        &self.general_errors
    }

    pub fn has_errors(&self) -> bool {
        !self.general_errors.is_empty()
    }

    pub fn add_general_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.general_errors.push(message);
    }

    /// Rewrite molecule, atom, bond, name and formula ids so that they are
    /// unique across the model, then rebuild the top-level keys.
    pub fn relabel(&mut self, mode: Relabel) {
        match mode {
            Relabel::Fresh => {
                let mut counters = FreshCounters::default();
                for m in self.molecules.values_mut() {
                    m.for_each_mut(&mut |m| counters.label(m));
                }
            }
            Relabel::EnsureUnique => {
                let mut ids = UniqueIds::default();
                for m in self.molecules.values() {
                    ids.reserve_all(m);
                }
                for m in self.molecules.values_mut() {
                    m.for_each_mut(&mut |m| ids.label(m));
                }
            }
        }
        self.molecules = std::mem::take(&mut self.molecules)
            .into_values()
            .map(|m| (m.id.clone(), m))
            .collect();
    }

    /// Recompute derived atom data (implicit hydrogens) at every depth.
    pub fn refresh(&mut self) {
        for m in self.molecules.values_mut() {
            m.refresh();
        }
    }

    /// Move `other`'s molecules and errors into this model and make the
    /// combined ids unique.
    pub fn merge(&mut self, other: Model) {
        for m in other.molecules.into_values() {
            self.add_molecule(m);
        }
        self.general_errors.extend(other.general_errors);
        self.relabel(Relabel::EnsureUnique);
    }

    /// Mean bond length over every bond at every depth; 0 without bonds.
    pub fn mean_bond_length(&self) -> f64 {
        let (sum, n) = self
            .all_molecules()
            .map(|m| crate::geometry::bond_length_totals(&m.mol))
            .fold((0.0, 0), |(s, c), (ms, mc)| (s + ms, c + mc));
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    /// Scale every coordinate so the mean bond length becomes `target`.
    /// A model without bonds is left alone.
    pub fn scale_to_average_bond_length(&mut self, target: f64) {
        let mean = self.mean_bond_length();
        if mean == 0.0 {
            return;
        }
        let factor = target / mean;
        for m in self.molecules.values_mut() {
            m.scale_positions(factor);
        }
    }

    /// Calculated formulas of the top-level molecules joined with ` . `.
    pub fn concise_formula(&self) -> String {
        self.molecules
            .values()
            .map(Molecule::concise_formula)
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" . ")
    }
}

#[derive(Default)]
struct FreshCounters {
    molecules: usize,
    atoms: usize,
    bonds: usize,
}

impl FreshCounters {
    fn label(&mut self, m: &mut Molecule) {
        self.molecules += 1;
        m.id = format!("m{}", self.molecules);
        for atom in m.mol.atom_weights_mut() {
            self.atoms += 1;
            atom.id = format!("a{}", self.atoms);
        }
        let edges: Vec<_> = m.mol.bonds().collect();
        for edge in edges {
            self.bonds += 1;
            m.mol.bond_mut(edge).id = format!("b{}", self.bonds);
        }
        for (k, name) in m.names.iter_mut().enumerate() {
            name.id = format!("{}.n{}", m.id, k + 1);
        }
        for (k, formula) in m.formulas.iter_mut().enumerate() {
            formula.id = format!("{}.f{}", m.id, k + 1);
        }
    }
}

/// Id bookkeeping for [`Relabel::EnsureUnique`]: `taken` holds every id
/// present before relabelling plus every id handed out since; `kept` holds
/// the ids already claimed during this pass.
#[derive(Default)]
struct UniqueIds {
    taken: HashSet<String>,
    kept: HashSet<String>,
    next: HashMap<String, usize>,
}

impl UniqueIds {
    fn reserve_all(&mut self, root: &Molecule) {
        for m in root.walk() {
            self.taken.insert(m.id.clone());
            self.taken.extend(m.atoms().map(|a| a.id.clone()));
            self.taken.extend(m.bonds().map(|b| b.id.clone()));
            self.taken.extend(m.names.iter().map(|n| n.id.clone()));
            self.taken.extend(m.formulas.iter().map(|f| f.id.clone()));
        }
        self.taken.remove("");
    }

    fn ensure(&mut self, id: &mut String, prefix: &str) {
        if !id.is_empty() && self.kept.insert(id.clone()) {
            return;
        }
        let n = self.next.entry(prefix.to_string()).or_insert(0);
        let fresh = loop {
            *n += 1;
            let candidate = format!("{prefix}{n}");
            if !self.taken.contains(&candidate) {
                break candidate;
            }
        };
        self.taken.insert(fresh.clone());
        self.kept.insert(fresh.clone());
        *id = fresh;
    }

    fn label(&mut self, m: &mut Molecule) {
        self.ensure(&mut m.id, "m");
        for atom in m.mol.atom_weights_mut() {
            self.ensure(&mut atom.id, "a");
        }
        let edges: Vec<_> = m.mol.bonds().collect();
        for edge in edges {
            self.ensure(&mut m.mol.bond_mut(edge).id, "b");
        }
        let name_prefix = format!("{}.n", m.id);
        for name in &mut m.names {
            self.ensure(&mut name.id, &name_prefix);
        }
        let formula_prefix = format!("{}.f", m.id);
        for formula in &mut m.formulas {
            self.ensure(&mut formula.id, &formula_prefix);
        }
    }
}
