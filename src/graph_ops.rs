use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::options::PerceptionOptions;
use crate::IdCodeEncoder;

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
            for neighbor in mol.neighbors(current) {
                if !visited[neighbor.index()] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenumberError {
    #[error("new_order length {got} != atom count {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("new_order is not a valid permutation")]
    InvalidPermutation,
}

fn validate_permutation(new_order: &[usize], n: usize) -> Result<(), RenumberError> {
    if new_order.len() != n {
        return Err(RenumberError::LengthMismatch {
            expected: n,
            got: new_order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &idx in new_order {
        if idx >= n || seen[idx] {
            return Err(RenumberError::InvalidPermutation);
        }
        seen[idx] = true;
    }
    Ok(())
}

/// Copies `mol` with atom `new_order[i]` moved to index `i`.
///
/// Bonds keep their relative order; their endpoints are remapped and
/// written lower new index first, so both the atom and the bond
/// adjacency order seen by perception change with the permutation.
pub fn renumber_atoms<A: Clone, B: Clone>(mol: &Mol<A, B>, new_order: &[usize]) -> Result<Mol<A, B>, RenumberError> {
    let n = mol.atom_count();
    validate_permutation(new_order, n)?;

    let mut new_mol = Mol::with_capacity(n, mol.bond_count());
    new_mol.set_fragment(mol.is_fragment());

    // new_order[new_idx] = old_idx
    for &old_idx in new_order {
        new_mol.add_atom(mol.atom(NodeIndex::new(old_idx)).clone());
    }

    // old_to_new[old_idx] = new_idx
    let mut old_to_new = vec![0usize; n];
    for (new_idx, &old_idx) in new_order.iter().enumerate() {
        old_to_new[old_idx] = new_idx;
    }

    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let (new_a, new_b) = (old_to_new[a.index()], old_to_new[b.index()]);
        new_mol.add_bond(
            NodeIndex::new(new_a.min(new_b)),
            NodeIndex::new(new_a.max(new_b)),
            mol.bond(edge).clone(),
        );
    }

    Ok(new_mol)
}

/// Renumbers atoms into idcode traversal order; simple hydrogens follow
/// in their original order.
pub fn renumber_atoms_canonical(mol: &Mol<Atom, Bond>) -> Mol<Atom, Bond> {
    let encoder = IdCodeEncoder::new(mol, &PerceptionOptions::default());
    let mut new_order: Vec<usize> = encoder.graph().atoms().iter().map(|a| a.index()).collect();
    new_order.extend(
        mol.atoms()
            .filter(|&a| encoder.graph().position(a).is_none())
            .map(|a| a.index()),
    );
    renumber_atoms(mol, &new_order).expect("traversal order is a valid permutation")
}
