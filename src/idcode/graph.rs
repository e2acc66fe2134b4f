//! Canonical spanning-tree linearization.

use std::collections::VecDeque;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::helpers::Neighbours;

/// Ranked atoms in canonical traversal order, with the spanning forest and
/// the ring closures that complete the bond list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearGraph {
    atoms: Vec<NodeIndex>,
    position: Vec<Option<usize>>,
    parents: Vec<Option<usize>>,
    tree_bonds: Vec<Option<EdgeIndex>>,
    closures: Vec<(usize, usize, EdgeIndex)>,
}

impl LinearGraph {
    /// Breadth-first traversal starting from the highest-ranked atom and
    /// taking neighbours by descending rank. A new tree is started at the
    /// highest-ranked unvisited atom whenever the queue runs dry.
    pub fn new(neighbours: &Neighbours, ranks: &[u32]) -> Self {
        let n = neighbours.atom_count();
        let mut by_rank: Vec<usize> = (0..n)
            .filter(|&a| !neighbours.is_simple_hydrogen(NodeIndex::new(a)))
            .collect();
        by_rank.sort_by(|&a, &b| ranks[b].cmp(&ranks[a]).then(a.cmp(&b)));

        let mut atoms = Vec::with_capacity(by_rank.len());
        let mut position = vec![None; n];
        let mut parents = Vec::with_capacity(by_rank.len());
        let mut tree_bonds = Vec::with_capacity(by_rank.len());
        let mut queue = VecDeque::new();

        for &root in &by_rank {
            if position[root].is_some() {
                continue;
            }
            position[root] = Some(atoms.len());
            atoms.push(NodeIndex::new(root));
            parents.push(None);
            tree_bonds.push(None);
            queue.push_back(NodeIndex::new(root));

            while let Some(current) = queue.pop_front() {
                let parent_pos = position[current.index()];
                let mut next: Vec<(NodeIndex, EdgeIndex)> = neighbours
                    .conn_atoms(current)
                    .iter()
                    .copied()
                    .zip(neighbours.conn_bonds(current).iter().copied())
                    .filter(|(nb, _)| position[nb.index()].is_none())
                    .collect();
                next.sort_by(|x, y| ranks[y.0.index()].cmp(&ranks[x.0.index()]).then(x.0.cmp(&y.0)));
                for (nb, bond) in next {
                    if position[nb.index()].is_some() {
                        continue;
                    }
                    position[nb.index()] = Some(atoms.len());
                    atoms.push(nb);
                    parents.push(parent_pos);
                    tree_bonds.push(Some(bond));
                    queue.push_back(nb);
                }
            }
        }

        let mut closures: Vec<(usize, usize, EdgeIndex)> = (0..neighbours.bond_count())
            .map(EdgeIndex::new)
            .filter(|&e| !neighbours.is_hydrogen_bond(e))
            .filter(|e| !tree_bonds.contains(&Some(*e)))
            .filter_map(|e| {
                let (a, b) = neighbours.bond_atoms(e);
                let (pa, pb) = (position[a.index()]?, position[b.index()]?);
                Some((pa.min(pb), pa.max(pb), e))
            })
            .collect();
        closures.sort();

        Self {
            atoms,
            position,
            parents,
            tree_bonds,
            closures,
        }
    }

    /// Atoms in traversal order.
    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Traversal position of an atom; `None` for simple hydrogens.
    pub fn position(&self, atom: NodeIndex) -> Option<usize> {
        self.position[atom.index()]
    }

    /// Traversal position of the parent; `None` for tree roots.
    pub fn parent(&self, position: usize) -> Option<usize> {
        self.parents[position]
    }

    /// Number of disconnected fragments.
    pub fn fragment_count(&self) -> usize {
        self.parents.iter().filter(|p| p.is_none()).count()
    }

    /// Ring closures as `(lower position, higher position, bond)`, sorted.
    pub fn closures(&self) -> &[(usize, usize, EdgeIndex)] {
        &self.closures
    }

    /// All encoded bonds: tree bonds in child order, then closures.
    pub fn bonds(&self) -> Vec<EdgeIndex> {
        self.tree_bonds
            .iter()
            .flatten()
            .copied()
            .chain(self.closures.iter().map(|&(_, _, e)| e))
            .collect()
    }
}
