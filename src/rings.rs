//! Ring perception for diagram placement.
//!
//! [`RingInfo::sssr`] finds a smallest set of smallest rings: Horton
//! candidate cycles (shortest path pairs closed by one bond) sorted by size,
//! kept while they are linearly independent over GF(2) as bond sets.
//! [`Ring`] adds what placement needs on top: the centroid (where a double
//! bond's inner line is pushed towards) and a priority order.

use std::cmp::Reverse;
use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::geometry;
use crate::mol::Mol;

#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let needed = Self::expected_ring_count(mol);
        if needed == 0 {
            return Self::default();
        }

        let paths = ShortestPaths::new(mol);
        let mut basis = CycleBasis::default();
        let mut rings = Vec::with_capacity(needed);
        for cycle in horton_cycles(mol, &paths) {
            if rings.len() == needed {
                break;
            }
            let edges = edge_set(mol, &cycle);
            if basis.insert(edges) {
                rings.push(rotate_to_smallest(&cycle));
            }
        }
        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        Self { rings }
    }

    /// Cyclomatic number: bonds - atoms + components.
    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let components = connected_components(mol.graph());
        (mol.bond_count() + components).saturating_sub(mol.atom_count())
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn into_rings(self) -> Vec<Vec<NodeIndex>> {
        self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }

    pub fn is_ring_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.rings.iter().any(|ring| {
            let n = ring.len();
            (0..n).any(|i| {
                let (x, y) = (ring[i], ring[(i + 1) % n]);
                (x == a && y == b) || (x == b && y == a)
            })
        })
    }

    pub fn smallest_ring_size(&self, atom: NodeIndex) -> Option<usize> {
        self.rings
            .iter()
            .filter(|ring| ring.contains(&atom))
            .map(Vec::len)
            .min()
    }
}

/// BFS distances and parents from every atom.
struct ShortestPaths {
    dist: Vec<Vec<u32>>,
    parent: Vec<Vec<Option<NodeIndex>>>,
}

impl ShortestPaths {
    fn new<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let mut dist = vec![vec![u32::MAX; n]; n];
        let mut parent = vec![vec![None; n]; n];
        for src in mol.atoms() {
            let s = src.index();
            dist[s][s] = 0;
            let mut queue = VecDeque::from([src]);
            while let Some(cur) = queue.pop_front() {
                let d = dist[s][cur.index()];
                for nb in mol.neighbors(cur) {
                    if dist[s][nb.index()] == u32::MAX {
                        dist[s][nb.index()] = d + 1;
                        parent[s][nb.index()] = Some(cur);
                        queue.push_back(nb);
                    }
                }
            }
        }
        Self { dist, parent }
    }

    fn reachable(&self, from: NodeIndex, to: NodeIndex) -> Option<u32> {
        match self.dist[from.index()][to.index()] {
            u32::MAX => None,
            d => Some(d),
        }
    }

    /// Shortest path `from ..= to`.
    fn path(&self, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![to];
        let mut cur = to;
        while cur != from {
            match self.parent[from.index()][cur.index()] {
                Some(p) => {
                    path.push(p);
                    cur = p;
                }
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }
}

/// For every bond (u, v) and every atom w, the cycle w..u + v..w when the
/// two shortest paths only meet at w. Sorted by size, deduplicated.
fn horton_cycles<A, B>(mol: &Mol<A, B>, paths: &ShortestPaths) -> Vec<Vec<NodeIndex>> {
    let mut cycles = Vec::new();
    for edge in mol.bonds() {
        let Some((u, v)) = mol.bond_endpoints(edge) else {
            continue;
        };
        for w in mol.atoms() {
            let (Some(du), Some(dv)) = (paths.reachable(w, u), paths.reachable(w, v)) else {
                continue;
            };
            if du + dv + 1 < 3 {
                continue;
            }
            let to_u = paths.path(w, u);
            let to_v = paths.path(w, v);
            if to_u.len() < 2 && to_v.len() < 2 {
                continue;
            }
            if to_u[1..].iter().any(|x| to_v[1..].contains(x)) {
                continue;
            }
            let mut cycle = to_u;
            cycle.extend(to_v[1..].iter().rev());
            cycles.push(rotate_to_smallest(&cycle));
        }
    }
    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    cycles.dedup();
    cycles
}

fn edge_set<A, B>(mol: &Mol<A, B>, cycle: &[NodeIndex]) -> Vec<u64> {
    let mut bits = vec![0u64; mol.bond_count().div_ceil(64)];
    let n = cycle.len();
    for i in 0..n {
        if let Some(edge) = mol.bond_between(cycle[i], cycle[(i + 1) % n]) {
            let idx = edge.index();
            bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }
    bits
}

/// Rows kept in reduced form: each row is zero at every earlier row's pivot.
#[derive(Default)]
struct CycleBasis {
    rows: Vec<(usize, Vec<u64>)>,
}

impl CycleBasis {
    /// Adds `bits` if it is independent of the rows already held.
    fn insert(&mut self, mut bits: Vec<u64>) -> bool {
        for (pivot, row) in &self.rows {
            if bits[pivot / 64] & (1u64 << (pivot % 64)) != 0 {
                for (b, r) in bits.iter_mut().zip(row) {
                    *b ^= *r;
                }
            }
        }
        let pivot = bits
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize);
        match pivot {
            Some(p) => {
                self.rows.push((p, bits));
                true
            }
            None => false,
        }
    }
}

/// Start at the lowest atom and walk towards its lower neighbour, so the
/// same ring always reads the same way.
fn rotate_to_smallest(cycle: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(start) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, idx)| **idx)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let n = cycle.len();
    let mut ring: Vec<NodeIndex> = (0..n).map(|i| cycle[(start + i) % n]).collect();
    if n > 2 && ring[1] > ring[n - 1] {
        ring[1..].reverse();
    }
    ring
}

/// A perceived ring with the data used to place double bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    centroid: [f64; 2],
    carbon_count: usize,
}

impl Ring {
    pub fn new(mol: &Mol<Atom, Bond>, atoms: Vec<NodeIndex>) -> Self {
        let centroid = geometry::centroid(mol, &atoms);
        let carbon_count = atoms.iter().filter(|&&a| mol.atom(a).is_carbon()).count();
        Self {
            atoms,
            centroid,
            carbon_count,
        }
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn centroid(&self) -> [f64; 2] {
        self.centroid
    }

    pub fn carbon_count(&self) -> usize {
        self.carbon_count
    }

    pub fn heteroatom_count(&self) -> usize {
        self.size() - self.carbon_count
    }

    /// Preferred sizes first: 6, 5, 7, 4, 3, then larger rings by size.
    fn size_rank(&self) -> usize {
        match self.size() {
            6 => 0,
            5 => 1,
            7 => 2,
            4 => 3,
            3 => 4,
            n => n,
        }
    }
}

/// Order rings for double-bond placement: preferred size, then more
/// carbons, then atom order.
pub fn sort_rings_for_db_placement(rings: &mut [Ring]) {
    rings.sort_by(|a, b| {
        a.size_rank()
            .cmp(&b.size_rank())
            .then_with(|| Reverse(a.carbon_count).cmp(&Reverse(b.carbon_count)))
            .then_with(|| a.atoms.cmp(&b.atoms))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    /// Build a carbon skeleton from an edge list.
    fn skeleton(atoms: usize, edges: &[(usize, usize)]) -> Mol<Atom, Bond> {
        let mut mol = Mol::new();
        for i in 0..atoms {
            let angle = i as f64;
            mol.add_atom(Atom::new(Element::C, [angle.cos(), angle.sin()]));
        }
        for &(a, b) in edges {
            mol.add_bond(n(a), n(b), Bond::default());
        }
        mol
    }

    fn cycle(len: usize) -> Vec<(usize, usize)> {
        (0..len).map(|i| (i, (i + 1) % len)).collect()
    }

    #[test]
    fn cyclohexane() {
        let mol = skeleton(6, &cycle(6));
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 1);
        assert_eq!(ri.rings()[0].len(), 6);
        assert_eq!(ri.rings()[0][0], n(0));
    }

    #[test]
    fn acyclic_chain() {
        let mol = skeleton(4, &[(0, 1), (1, 2), (2, 3)]);
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 0);
        assert_eq!(ri.smallest_ring_size(n(0)), None);
    }

    #[test]
    fn naphthalene_skeleton() {
        let mut edges = cycle(6);
        edges.extend([(0, 6), (6, 7), (7, 8), (8, 9), (9, 1)]);
        let mol = skeleton(10, &edges);
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 2);
        assert!(ri.rings().iter().all(|r| r.len() == 6));
        assert!(ri.is_ring_bond(n(0), n(1)));
        let shared = mol
            .atoms()
            .filter(|&a| ri.rings().iter().filter(|r| r.contains(&a)).count() == 2)
            .count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn cubane_needs_five_rings() {
        let edges = [
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let mol = skeleton(8, &edges);
        assert_eq!(RingInfo::expected_ring_count(&mol), 5);
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 5);
        assert!(ri.rings().iter().all(|r| r.len() == 4));
    }

    #[test]
    fn spiro_rings() {
        let mut edges = cycle(6);
        edges.extend([(0, 6), (6, 7), (7, 8), (8, 0)]);
        let mol = skeleton(9, &edges);
        let ri = RingInfo::sssr(&mol);
        assert_eq!(ri.num_rings(), 2);
        assert_eq!(ri.smallest_ring_size(n(0)), Some(4));
        assert_eq!(ri.smallest_ring_size(n(3)), Some(6));
    }

    #[test]
    fn pendant_atom_not_in_ring() {
        let mut edges = cycle(6);
        edges.push((0, 6));
        let mol = skeleton(7, &edges);
        let ri = RingInfo::sssr(&mol);
        assert!(!ri.is_ring_atom(n(6)));
        assert!(ri.is_ring_atom(n(5)));
    }

    #[test]
    fn placement_prefers_six_then_carbon_rich() {
        // a 5-ring, a 6-ring with one nitrogen and an all-carbon 6-ring
        let mut mol = skeleton(17, &[]);
        mol.atom_mut(n(5)).element = Element::N.into();
        let five: Vec<_> = (11..16).map(n).collect();
        let hetero_six: Vec<_> = (0..6).map(n).collect();
        let carbon_six: Vec<_> = (6..11).chain([16]).map(n).collect();
        let mut rings = vec![
            Ring::new(&mol, five),
            Ring::new(&mol, hetero_six),
            Ring::new(&mol, carbon_six),
        ];
        sort_rings_for_db_placement(&mut rings);
        let sizes: Vec<_> = rings.iter().map(|r| (r.size(), r.carbon_count())).collect();
        assert_eq!(sizes, vec![(6, 6), (6, 5), (5, 5)]);
        assert_eq!(rings[1].heteroatom_count(), 1);
    }
}
