//! Kekulization assigns alternating single and double bonds to delocalized
//! ring systems.
//!
//! [`Resolution::resolve`] only reads the molecule: it returns the bonds to
//! promote to double and the bonds to keep as delocalized query features.
//! [`Resolution::apply`] writes that result back. [`kekulize`] does both for
//! every [`BondKind::Delocalized`] bond of a molecule.
//!
//! The assignment is greedy. Atoms that cannot take part in a double bond
//! (lone-pair donors of 5-rings, saturated atoms, ring carbanions) are
//! protected first; then bonds with a forced choice are promoted, and when
//! no choice is forced, fusion bonds, whole 6-rings and finally the lowest
//! remaining bond are promoted.

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, trace};

use crate::atom::Atom;
use crate::bitset::BitSet;
use crate::bond::{Bond, BondKind, BondOrder, BondQueryFeatures};
use crate::element::Element;
use crate::helpers::Neighbours;
use crate::mol::Mol;
use crate::options::RingMode;
use crate::rings::RingCollection;
use crate::valence::max_valence;

/// Outcome of resolving a set of delocalized bonds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    resolved: Vec<EdgeIndex>,
    double_bonds: Vec<EdgeIndex>,
    query_delocalized: Vec<EdgeIndex>,
    complete: bool,
}

impl Resolution {
    /// Resolves the bonds in `delocalized` into a Kekulé structure.
    ///
    /// `rings` must have been perceived on the same molecule; small rings
    /// are enough.
    pub fn resolve(
        mol: &Mol<Atom, Bond>,
        neighbours: &Neighbours,
        rings: &RingCollection,
        delocalized: &BitSet,
    ) -> Self {
        let mut state = State {
            neighbours,
            flagged: delocalized.clone(),
            double_bonds: Vec::new(),
        };

        state.protect_atoms(mol, rings);

        let mut query_delocalized = Vec::new();
        if mol.is_fragment() {
            let open: Vec<usize> = state
                .flagged
                .iter()
                .filter(|&b| !rings.is_ring_bond(EdgeIndex::new(b)))
                .collect();
            for b in open {
                state.flagged.remove(b);
                query_delocalized.push(EdgeIndex::new(b));
            }
        }

        let aromatic_atoms = state.flagged_atom_count();

        loop {
            state.promote_terminal_bonds();
            let Some(first) = state.flagged.first() else {
                break;
            };

            if let Some(bond) = state.find_fusion_bond() {
                state.promote(bond);
                continue;
            }

            if let Some(ring) = rings
                .rings()
                .iter()
                .find(|r| r.size() == 6 && r.bonds().iter().all(|b| state.flagged.contains(b.index())))
            {
                for i in [0, 2, 4] {
                    state.promote(ring.bonds()[i]);
                }
                continue;
            }

            state.promote(EdgeIndex::new(first));
        }

        let complete = aromatic_atoms == 2 * state.double_bonds.len();
        debug!(
            flagged = delocalized.count(),
            aromatic_atoms,
            promoted = state.double_bonds.len(),
            query = query_delocalized.len(),
            complete,
            "resolved delocalized bonds"
        );

        let resolved = delocalized
            .iter()
            .map(EdgeIndex::new)
            .filter(|b| !query_delocalized.contains(b))
            .collect();

        Self {
            resolved,
            double_bonds: state.double_bonds,
            query_delocalized,
            complete,
        }
    }

    /// Bonds that become double; all other resolved bonds become single.
    pub fn double_bonds(&self) -> &[EdgeIndex] {
        &self.double_bonds
    }

    /// Open delocalized chains of a query fragment, kept as the
    /// [`BondQueryFeatures::DELOCALIZED`] query feature.
    pub fn query_delocalized(&self) -> &[EdgeIndex] {
        &self.query_delocalized
    }

    /// Whether every atom of the delocalized system received a double bond.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn apply(&self, mol: &mut Mol<Atom, Bond>) {
        for &b in &self.resolved {
            let bond = mol.bond_mut(b);
            bond.kind = BondKind::Covalent;
            bond.order = BondOrder::Single;
        }
        for &b in &self.double_bonds {
            mol.bond_mut(b).order = BondOrder::Double;
        }
        for &b in &self.query_delocalized {
            let bond = mol.bond_mut(b);
            bond.kind = BondKind::Covalent;
            bond.order = BondOrder::Single;
            bond.query_features |= BondQueryFeatures::DELOCALIZED;
        }
    }
}

/// Replaces every delocalized bond of `mol` with a single or double bond.
///
/// Returns `false` if some atom of the delocalized system was left without
/// a double bond; the bonds are still rewritten in that case.
pub fn kekulize(mol: &mut Mol<Atom, Bond>) -> bool {
    let delocalized = BitSet::from_indices(
        mol.bond_count(),
        mol.bonds()
            .filter(|&e| mol.bond(e).kind == BondKind::Delocalized)
            .map(|e| e.index()),
    );
    if delocalized.is_empty() {
        return true;
    }
    let neighbours = Neighbours::new(mol);
    let rings = RingCollection::perceive(mol, &neighbours, RingMode::default());
    let resolution = Resolution::resolve(mol, &neighbours, &rings, &delocalized);
    resolution.apply(mol);
    resolution.is_complete()
}

struct State<'a> {
    neighbours: &'a Neighbours,
    flagged: BitSet,
    double_bonds: Vec<EdgeIndex>,
}

impl State<'_> {
    fn flagged_bond_count(&self, atom: NodeIndex) -> usize {
        self.neighbours
            .all_conn_bonds(atom)
            .iter()
            .filter(|b| self.flagged.contains(b.index()))
            .count()
    }

    fn flagged_atom_count(&self) -> usize {
        (0..self.neighbours.atom_count())
            .filter(|&a| self.flagged_bond_count(NodeIndex::new(a)) > 0)
            .count()
    }

    fn unflag_atom(&mut self, atom: NodeIndex) {
        for b in self.neighbours.all_conn_bonds(atom) {
            self.flagged.remove(b.index());
        }
    }

    fn protect_atoms(&mut self, mol: &Mol<Atom, Bond>, rings: &RingCollection) {
        let n = self.neighbours.atom_count();
        let mut protected = BitSet::new(n);
        for a in 0..n {
            let atom_idx = NodeIndex::new(a);
            if self.flagged_bond_count(atom_idx) == 0 {
                continue;
            }
            if self.cannot_take_pi_bond(mol, rings, atom_idx) {
                protected.insert(a);
            }
        }

        // A fully delocalized 5-ring without any other donor needs one
        // pyrrole-type nitrogen to carry the hydrogen.
        for ring in rings.rings() {
            if ring.size() != 5
                || !ring.bonds().iter().all(|b| self.flagged.contains(b.index()))
                || ring.atoms().iter().any(|a| protected.contains(a.index()))
            {
                continue;
            }
            let donor = ring.atoms().iter().copied().find(|&a| {
                let atom = mol.atom(a);
                atom.formal_charge == 0
                    && atom.element().is_some_and(|e| e.is_pnictogen_donor())
                    && self.neighbours.all_conn_atoms(a).len() == 2
            });
            if let Some(donor) = donor {
                trace!(atom = donor.index(), "pyrrole-type donor");
                protected.insert(donor.index());
            }
        }

        for a in protected.iter() {
            self.unflag_atom(NodeIndex::new(a));
        }
        debug!(protected = protected.count(), "protected atoms");
    }

    fn cannot_take_pi_bond(&self, mol: &Mol<Atom, Bond>, rings: &RingCollection, a: NodeIndex) -> bool {
        let atom = mol.atom(a);
        let in_ring_of = |size: usize| rings.atom_rings(a).iter().any(|&r| rings.ring(r).size() == size);
        match (atom.element(), atom.formal_charge) {
            (Some(Element::C), -1) if in_ring_of(5) => return true,
            (Some(Element::C), 1) if in_ring_of(7) => return true,
            _ => {}
        }

        // Bonds already at the lowest valence that fits them leave no room
        // for another pi bond (divalent O/S, trivalent N/P, C=O carbons).
        let used: u8 = self
            .neighbours
            .all_conn_bonds(a)
            .iter()
            .map(|&b| {
                let bond = mol.bond(b);
                match bond.kind {
                    BondKind::Covalent => bond.order.as_u8(),
                    BondKind::Delocalized => 1,
                    BondKind::Coordination => 0,
                }
            })
            .sum::<u8>()
            + atom.radical.valence_loss();
        match max_valence(atom, used) {
            Some(max) => used + 1 > max,
            None => false,
        }
    }

    /// Promotes bonds at atoms left with a single flagged bond until none
    /// remain.
    fn promote_terminal_bonds(&mut self) {
        loop {
            let terminal = self.flagged.iter().map(EdgeIndex::new).find(|&b| {
                let (u, v) = self.neighbours.bond_atoms(b);
                self.flagged_bond_count(u) == 1 || self.flagged_bond_count(v) == 1
            });
            match terminal {
                Some(b) => self.promote(b),
                None => break,
            }
        }
    }

    /// A bond whose two atoms carry four more flagged bonds between them,
    /// such as the central bond of naphthalene.
    fn find_fusion_bond(&self) -> Option<EdgeIndex> {
        self.flagged.iter().map(EdgeIndex::new).find(|&b| {
            let (u, v) = self.neighbours.bond_atoms(b);
            self.flagged_bond_count(u) + self.flagged_bond_count(v) - 2 == 4
        })
    }

    fn promote(&mut self, bond: EdgeIndex) {
        let (u, v) = self.neighbours.bond_atoms(bond);
        trace!(bond = bond.index(), "promote to double");
        self.double_bonds.push(bond);
        self.unflag_atom(u);
        self.unflag_atom(v);
    }
}
