use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Connected components, each sorted by node index, in order of their
/// lowest atom.
pub fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for node in mol.atoms() {
        if visited[node.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(current);
            stack.extend(mol.neighbors(current).filter(|nb| !visited[nb.index()]));
        }
        component.sort();
        components.push(component);
    }
    components
}

pub fn num_components<A, B>(mol: &Mol<A, B>) -> usize {
    connected_components(mol).len()
}

/// Copy one component (as returned by [`connected_components`]) into a new
/// graph, preserving atom order, bond order and each bond's start/end.
pub fn fragment<A: Clone, B: Clone>(mol: &Mol<A, B>, component: &[NodeIndex]) -> Mol<A, B> {
    let mut frag = Mol::new();
    let mut index_map: Vec<Option<NodeIndex>> = vec![None; mol.atom_count()];
    for &old in component {
        index_map[old.index()] = Some(frag.add_atom(mol.atom(old).clone()));
    }
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        if let (Some(na), Some(nb)) = (index_map[a.index()], index_map[b.index()]) {
            frag.add_bond(na, nb, mol.bond(edge).clone());
        }
    }
    frag
}
