//! Neighbour helper arrays.
//!
//! Every perception step works on flat per-atom adjacency lists rather than
//! on the petgraph edge lists directly. [`Neighbours`] is the "neighbours"
//! helper level: build it once per molecule, after the last structural
//! edit, and hand it to ring perception, ranking and encoding. The
//! "rings" level is a [`RingCollection`](crate::rings::RingCollection)
//! built from it.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;
use crate::traits::HasPlainHydrogen;

#[derive(Debug, Clone)]
pub struct Neighbours {
    conn_atoms: Vec<Vec<NodeIndex>>,
    conn_bonds: Vec<Vec<EdgeIndex>>,
    degree: Vec<usize>,
    simple_hydrogen: Vec<bool>,
    bond_atoms: Vec<(NodeIndex, NodeIndex)>,
}

impl Neighbours {
    pub fn new<A: HasPlainHydrogen, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let plain: Vec<bool> = mol.atoms().map(|a| mol.atom(a).is_plain_hydrogen()).collect();

        // A plain hydrogen bonded to exactly one non-hydrogen atom is folded
        // into that atom; H2 and bridging hydrogens stay real atoms.
        let simple_hydrogen: Vec<bool> = mol
            .atoms()
            .map(|a| {
                if !plain[a.index()] {
                    return false;
                }
                let mut nbs = mol.neighbors(a);
                match (nbs.next(), nbs.next()) {
                    (Some(nb), None) => !plain[nb.index()],
                    _ => false,
                }
            })
            .collect();

        let mut conn_atoms = Vec::with_capacity(n);
        let mut conn_bonds = Vec::with_capacity(n);
        let mut degree = Vec::with_capacity(n);
        for a in mol.atoms() {
            let mut pairs: Vec<(NodeIndex, EdgeIndex)> = mol
                .bonds_of(a)
                .filter_map(|e| mol.other_atom(e, a).map(|nb| (nb, e)))
                .collect();
            pairs.sort_by_key(|&(nb, e)| (simple_hydrogen[nb.index()], nb, e));
            degree.push(pairs.iter().filter(|(nb, _)| !simple_hydrogen[nb.index()]).count());
            conn_atoms.push(pairs.iter().map(|&(nb, _)| nb).collect());
            conn_bonds.push(pairs.iter().map(|&(_, e)| e).collect());
        }

        let bond_atoms = mol
            .bonds()
            .filter_map(|e| mol.bond_endpoints(e))
            .collect();

        Self {
            conn_atoms,
            conn_bonds,
            degree,
            simple_hydrogen,
            bond_atoms,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.degree.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bond_atoms.len()
    }

    /// Number of neighbours that are not simple hydrogens.
    pub fn degree(&self, atom: NodeIndex) -> usize {
        self.degree[atom.index()]
    }

    /// Heavy-atom neighbours, ascending by index.
    pub fn conn_atoms(&self, atom: NodeIndex) -> &[NodeIndex] {
        &self.conn_atoms[atom.index()][..self.degree[atom.index()]]
    }

    /// Bonds to heavy-atom neighbours, parallel to [`conn_atoms`](Self::conn_atoms).
    pub fn conn_bonds(&self, atom: NodeIndex) -> &[EdgeIndex] {
        &self.conn_bonds[atom.index()][..self.degree[atom.index()]]
    }

    /// All neighbours, simple hydrogens last.
    pub fn all_conn_atoms(&self, atom: NodeIndex) -> &[NodeIndex] {
        &self.conn_atoms[atom.index()]
    }

    pub fn all_conn_bonds(&self, atom: NodeIndex) -> &[EdgeIndex] {
        &self.conn_bonds[atom.index()]
    }

    pub fn is_simple_hydrogen(&self, atom: NodeIndex) -> bool {
        self.simple_hydrogen[atom.index()]
    }

    /// Number of atoms that take part in ranking and encoding.
    pub fn heavy_atom_count(&self) -> usize {
        self.simple_hydrogen.iter().filter(|&&h| !h).count()
    }

    pub fn bond_atoms(&self, bond: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.bond_atoms[bond.index()]
    }

    /// Whether the bond touches a simple hydrogen.
    pub fn is_hydrogen_bond(&self, bond: EdgeIndex) -> bool {
        let (a, b) = self.bond_atoms(bond);
        self.simple_hydrogen[a.index()] || self.simple_hydrogen[b.index()]
    }

    pub fn other_atom(&self, bond: EdgeIndex, atom: NodeIndex) -> NodeIndex {
        let (a, b) = self.bond_atoms(bond);
        if a == atom {
            b
        } else {
            a
        }
    }

    /// Bond joining two atoms, if any.
    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.conn_atoms[a.index()]
            .iter()
            .position(|&nb| nb == b)
            .map(|i| self.conn_bonds[a.index()][i])
    }
}
