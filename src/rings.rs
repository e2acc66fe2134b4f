//! Ring perception.
//!
//! [`RingCollection::perceive`] finds every chordless ring of up to
//! [`MAX_SMALL_RING_SIZE`] atoms, optionally assigns ring sizes to atoms and
//! bonds that are only part of larger rings, and optionally classifies each
//! 5-, 6- and 7-membered ring as aromatic and delocalized.

use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, trace};

use crate::bitset::BitSet;
use crate::element::Element;
use crate::helpers::Neighbours;
use crate::mol::Mol;
use crate::options::RingMode;
use crate::traits::{HasAtomicNum, HasFormalCharge, HasPiBond};

pub const MAX_SMALL_RING_SIZE: usize = 7;

/// Double-bond patterns of an aromatic 5-ring, indexed by the position of
/// the lone-pair donor. Bit `size - 1 - i` stands for ring bond `i`.
const SEQUENCE_5_RING: [u32; 5] = [10, 5, 18, 9, 20];
/// Double-bond patterns of an aromatic 7-ring, indexed by the position of
/// the empty-orbital acceptor.
const SEQUENCE_7_RING: [u32; 7] = [42, 21, 74, 37, 82, 41, 84];
const SEQUENCE_6_RING: [u32; 2] = [21, 42];

/// One ring: atoms in ring order and the bonds between them.
///
/// Bond `i` joins atom `i` and atom `(i + 1) % size`. The atom list starts
/// at the smallest atom index and continues towards the smaller of that
/// atom's two ring neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    bonds: Vec<EdgeIndex>,
    aromatic: bool,
    delocalized: bool,
    hetero_position: Option<usize>,
}

impl Ring {
    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[EdgeIndex] {
        &self.bonds
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_aromatic(&self) -> bool {
        self.aromatic
    }

    /// Aromatic, and no single Kekulé structure is preferred.
    pub fn is_delocalized(&self) -> bool {
        self.delocalized
    }

    /// Ring position of the lone-pair donor (5-rings) or the empty-orbital
    /// acceptor (7-rings) of an aromatic ring.
    pub fn hetero_position(&self) -> Option<usize> {
        self.hetero_position
    }

    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond)
    }

    pub fn atom_position(&self, atom: NodeIndex) -> Option<usize> {
        self.atoms.iter().position(|&a| a == atom)
    }
}

#[derive(Debug)]
pub struct RingCollection {
    rings: Vec<Ring>,
    mode: RingMode,
    atom_ring_size: Vec<usize>,
    bond_ring_size: Vec<usize>,
    ring_atoms: BitSet,
    ring_bonds: BitSet,
    aromatic_atoms: BitSet,
    aromatic_bonds: BitSet,
    delocalized_bonds: BitSet,
    atom_index: OnceLock<Vec<Vec<usize>>>,
}

impl RingCollection {
    pub fn perceive<A, B>(mol: &Mol<A, B>, neighbours: &Neighbours, mode: RingMode) -> Self
    where
        A: HasAtomicNum + HasFormalCharge,
        B: HasPiBond,
    {
        let atoms = mol.atom_count();
        let bonds = mol.bond_count();
        let candidates = ring_candidates(neighbours);

        let mut rc = Self {
            rings: Vec::new(),
            mode,
            atom_ring_size: vec![0; atoms],
            bond_ring_size: vec![0; bonds],
            ring_atoms: BitSet::new(atoms),
            ring_bonds: BitSet::new(bonds),
            aromatic_atoms: BitSet::new(atoms),
            aromatic_bonds: BitSet::new(bonds),
            delocalized_bonds: BitSet::new(bonds),
            atom_index: OnceLock::new(),
        };

        if candidates.is_empty() {
            return rc;
        }

        rc.find_small_rings(neighbours, &candidates);
        rc.find_ring_bonds(neighbours, &candidates);

        if mode.aromaticity {
            rc.determine_aromaticity(mol, neighbours);
        }

        debug!(
            rings = rc.rings.len(),
            aromatic = rc.rings.iter().filter(|r| r.aromatic).count(),
            large_rings = mode.large_rings,
            "ring perception finished"
        );
        rc
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn mode(&self) -> RingMode {
        self.mode
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring(&self, index: usize) -> &Ring {
        &self.rings[index]
    }

    /// Ids of the small rings containing `atom`.
    pub fn atom_rings(&self, atom: NodeIndex) -> &[usize] {
        let index = self.atom_index.get_or_init(|| {
            let mut index = vec![Vec::new(); self.atom_ring_size.len()];
            for (id, ring) in self.rings.iter().enumerate() {
                for a in &ring.atoms {
                    index[a.index()].push(id);
                }
            }
            index
        });
        &index[atom.index()]
    }

    /// Size of the smallest ring containing `atom`; 0 if none is known.
    ///
    /// Atoms that are only members of rings larger than
    /// [`MAX_SMALL_RING_SIZE`] report 0 unless large-ring mode is on.
    pub fn atom_ring_size(&self, atom: NodeIndex) -> usize {
        self.atom_ring_size[atom.index()]
    }

    pub fn bond_ring_size(&self, bond: EdgeIndex) -> usize {
        self.bond_ring_size[bond.index()]
    }

    /// Whether `atom` lies on any cycle, whatever its size.
    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.ring_atoms.contains(atom.index())
    }

    /// Whether `bond` lies on any cycle, whatever its size.
    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_bonds.contains(bond.index())
    }

    pub fn is_aromatic_atom(&self, atom: NodeIndex) -> bool {
        self.aromatic_atoms.contains(atom.index())
    }

    pub fn is_aromatic_bond(&self, bond: EdgeIndex) -> bool {
        self.aromatic_bonds.contains(bond.index())
    }

    pub fn is_delocalized_bond(&self, bond: EdgeIndex) -> bool {
        self.delocalized_bonds.contains(bond.index())
    }

    pub fn delocalized_bonds(&self) -> &BitSet {
        &self.delocalized_bonds
    }

    pub fn aromatic_bonds(&self) -> &BitSet {
        &self.aromatic_bonds
    }

    /// Id of another small ring sharing `bond` with ring `ring`.
    pub fn shared_ring_bond(&self, ring: usize, bond: EdgeIndex) -> Option<usize> {
        self.rings
            .iter()
            .enumerate()
            .find(|&(id, r)| id != ring && r.contains_bond(bond))
            .map(|(id, _)| id)
    }

    fn find_small_rings(&mut self, neighbours: &Neighbours, candidates: &BitSet) {
        let n = neighbours.atom_count();
        let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
        let mut found: Vec<Vec<NodeIndex>> = Vec::new();

        let mut on_path = vec![false; n];
        for start in candidates.iter() {
            let start_atom = NodeIndex::new(start);
            // Depth-first walk over atoms with a larger index than `start`,
            // keeping the current path and the next neighbour slot per level.
            let mut path: Vec<NodeIndex> = vec![start_atom];
            let mut next_slot: Vec<usize> = vec![0];
            on_path[start] = true;

            while let Some(&tip) = path.last() {
                let depth = path.len() - 1;
                let conn = neighbours.conn_atoms(tip);
                let slot = next_slot[depth];
                if slot >= conn.len() {
                    on_path[tip.index()] = false;
                    path.pop();
                    next_slot.pop();
                    continue;
                }
                next_slot[depth] += 1;

                let nb = conn[slot];
                if !candidates.contains(nb.index()) {
                    continue;
                }
                if nb == start_atom {
                    if path.len() >= 3 {
                        let cycle = normalize_ring(&path);
                        if seen.insert(cycle.clone()) && is_chordless(neighbours, &cycle) {
                            found.push(cycle);
                        }
                    }
                    continue;
                }
                if nb.index() > start && !on_path[nb.index()] && path.len() < MAX_SMALL_RING_SIZE {
                    on_path[nb.index()] = true;
                    path.push(nb);
                    next_slot.push(0);
                }
            }
        }

        found.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        for atoms in found {
            let size = atoms.len();
            let bonds: Vec<EdgeIndex> = (0..size)
                .filter_map(|i| neighbours.bond_between(atoms[i], atoms[(i + 1) % size]))
                .collect();
            for &a in &atoms {
                let s = &mut self.atom_ring_size[a.index()];
                if *s == 0 || *s > size {
                    *s = size;
                }
                self.ring_atoms.insert(a.index());
            }
            for &b in &bonds {
                let s = &mut self.bond_ring_size[b.index()];
                if *s == 0 || *s > size {
                    *s = size;
                }
                self.ring_bonds.insert(b.index());
            }
            trace!(size, atoms = ?atoms, "small ring");
            self.rings.push(Ring {
                atoms,
                bonds,
                aromatic: false,
                delocalized: false,
                hetero_position: None,
            });
        }
    }

    /// Classifies candidate bonds outside small rings by searching the
    /// shortest cycle through each of them; sizes are only recorded in
    /// large-ring mode.
    fn find_ring_bonds(&mut self, neighbours: &Neighbours, candidates: &BitSet) {
        let n = neighbours.atom_count();
        for b in 0..neighbours.bond_count() {
            let bond = EdgeIndex::new(b);
            if self.ring_bonds.contains(b) {
                continue;
            }
            let (u, v) = neighbours.bond_atoms(bond);
            if !candidates.contains(u.index()) || !candidates.contains(v.index()) {
                continue;
            }
            let Some(path) = shortest_path_avoiding(neighbours, candidates, u, v, bond, n) else {
                continue;
            };
            let size = path.len();
            self.ring_bonds.insert(b);
            for &a in &path {
                self.ring_atoms.insert(a.index());
            }
            if !self.mode.large_rings {
                continue;
            }
            let mut cycle_bonds: Vec<EdgeIndex> = path
                .windows(2)
                .filter_map(|w| neighbours.bond_between(w[0], w[1]))
                .collect();
            cycle_bonds.push(bond);
            for a in path {
                let s = &mut self.atom_ring_size[a.index()];
                if *s == 0 || *s > size {
                    *s = size;
                }
            }
            for e in cycle_bonds {
                self.ring_bonds.insert(e.index());
                let s = &mut self.bond_ring_size[e.index()];
                if *s == 0 || *s > size {
                    *s = size;
                }
            }
            trace!(size, bond = b, "large ring");
        }
    }

    fn determine_aromaticity<A, B>(&mut self, mol: &Mol<A, B>, neighbours: &Neighbours)
    where
        A: HasAtomicNum + HasFormalCharge,
        B: HasPiBond,
    {
        let count = self.rings.len();
        let annelated: Vec<Vec<Option<usize>>> = (0..count)
            .map(|r| {
                self.rings[r]
                    .bonds
                    .iter()
                    .map(|&b| self.shared_ring_bond(r, b))
                    .collect()
            })
            .collect();

        let mut determined: Vec<bool> = self
            .rings
            .iter()
            .map(|r| !(5..=7).contains(&r.size()))
            .collect();

        // Fused rings may only become aromatic once a neighbour ring is, so
        // undetermined rings are revisited until a pass changes nothing.
        loop {
            let mut progress = false;
            for r in 0..count {
                if determined[r] {
                    continue;
                }
                let outcome = self.classify_ring(mol, neighbours, r, &annelated[r], &determined);
                if let Some(class) = outcome {
                    let ring = &mut self.rings[r];
                    ring.aromatic = class.aromatic;
                    ring.delocalized = class.delocalized;
                    ring.hetero_position = class.hetero_position;
                    determined[r] = true;
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        for ring in &self.rings {
            if !ring.aromatic {
                continue;
            }
            for a in &ring.atoms {
                self.aromatic_atoms.insert(a.index());
            }
            for b in &ring.bonds {
                self.aromatic_bonds.insert(b.index());
                if ring.delocalized {
                    self.delocalized_bonds.insert(b.index());
                }
            }
        }
    }

    /// `None` while the answer still depends on an undetermined annelated
    /// ring.
    fn classify_ring<A, B>(
        &self,
        mol: &Mol<A, B>,
        neighbours: &Neighbours,
        r: usize,
        annelated: &[Option<usize>],
        determined: &[bool],
    ) -> Option<RingClass>
    where
        A: HasAtomicNum + HasFormalCharge,
        B: HasPiBond,
    {
        let ring = &self.rings[r];
        let size = ring.size();
        let mut bond_sequence: u32 = 0;
        let mut aromatic_but_not_delocalized: u32 = 0;
        let mut unhandled_annelated_ring = false;

        for (i, &b) in ring.bonds.iter().enumerate() {
            bond_sequence <<= 1;
            aromatic_but_not_delocalized <<= 1;
            if mol.bond(b).is_pi_bond() {
                bond_sequence |= 1;
            } else if let Some(other) = annelated[i] {
                if determined[other] {
                    let other = &self.rings[other];
                    if other.aromatic {
                        bond_sequence |= 1;
                        if !other.delocalized {
                            aromatic_but_not_delocalized |= 1;
                        }
                    }
                } else {
                    unhandled_annelated_ring = true;
                }
            }
        }

        let charge_at = |p: usize| mol.atom(ring.atoms[p]).formal_charge();
        let element_at = |p: usize| Element::from_atomic_num(mol.atom(ring.atoms[p]).atomic_num());

        let mut class = RingClass::default();
        match size {
            5 => {
                for (p, &mask) in SEQUENCE_5_RING.iter().enumerate() {
                    if bond_sequence & mask != mask {
                        continue;
                    }
                    if !is_pi_donor(element_at(p), charge_at(p), neighbours.degree(ring.atoms[p])) {
                        continue;
                    }
                    class.aromatic = true;
                    class.hetero_position = Some(p);
                    class.delocalized = aromatic_but_not_delocalized & mask == 0
                        && !has_mobile_donor(ring, p, |q| element_at(q), |q| charge_at(q), neighbours);
                    break;
                }
            }
            6 => {
                for &mask in &SEQUENCE_6_RING {
                    if bond_sequence & mask == mask {
                        class.aromatic = true;
                        class.delocalized = aromatic_but_not_delocalized & mask == 0;
                        break;
                    }
                }
            }
            7 => {
                for (p, &mask) in SEQUENCE_7_RING.iter().enumerate() {
                    if bond_sequence & mask != mask {
                        continue;
                    }
                    if !is_pi_acceptor(element_at(p), charge_at(p)) {
                        continue;
                    }
                    class.aromatic = true;
                    class.hetero_position = Some(p);
                    class.delocalized = aromatic_but_not_delocalized & mask == 0;
                    break;
                }
            }
            _ => return Some(class),
        }

        if class.aromatic && class.delocalized && has_exocyclic_hetero_double_bond(mol, neighbours, ring) {
            class.delocalized = false;
        }

        if !class.aromatic && unhandled_annelated_ring {
            return None;
        }
        Some(class)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct RingClass {
    aromatic: bool,
    delocalized: bool,
    hetero_position: Option<usize>,
}

/// Lone-pair donors of a 5-membered aromatic ring.
fn is_pi_donor(element: Option<Element>, charge: i8, degree: usize) -> bool {
    let Some(element) = element else {
        return false;
    };
    match element {
        Element::C => charge == -1,
        e if e.is_pnictogen_donor() => charge == 0,
        Element::O => charge == 0,
        e if e.is_chalcogen_donor() => charge == 0 && degree == 2,
        _ => false,
    }
}

/// Empty-orbital acceptors of a 7-membered aromatic ring.
fn is_pi_acceptor(element: Option<Element>, charge: i8) -> bool {
    matches!(
        (element, charge),
        (Some(Element::C), 1) | (Some(Element::B), 0)
    )
}

/// A second uncharged two-connected pnictogen could take over the donor
/// role (imidazole-type tautomerism), fixing one Kekulé structure.
fn has_mobile_donor(
    ring: &Ring,
    donor: usize,
    element_at: impl Fn(usize) -> Option<Element>,
    charge_at: impl Fn(usize) -> i8,
    neighbours: &Neighbours,
) -> bool {
    (0..ring.size()).any(|p| {
        p != donor
            && element_at(p).is_some_and(|e| e.is_pnictogen_donor())
            && charge_at(p) == 0
            && neighbours.degree(ring.atoms[p]) == 2
    })
}

/// Amide-type leak: a ring atom double-bonded to an exocyclic heteroatom.
fn has_exocyclic_hetero_double_bond<A, B>(mol: &Mol<A, B>, neighbours: &Neighbours, ring: &Ring) -> bool
where
    A: HasAtomicNum,
    B: HasPiBond,
{
    ring.atoms.iter().any(|&a| {
        neighbours
            .conn_atoms(a)
            .iter()
            .zip(neighbours.conn_bonds(a))
            .any(|(&nb, &b)| {
                !ring.contains_atom(nb)
                    && !mol.bond(b).is_delocalized()
                    && mol.bond(b).is_pi_bond()
                    && mol.atom(nb).atomic_num() != 6
            })
    })
}

/// Degree-pruning fixpoint: atoms with fewer than two remaining candidate
/// neighbours cannot lie on a cycle.
fn ring_candidates(neighbours: &Neighbours) -> BitSet {
    let n = neighbours.atom_count();
    let mut candidates = BitSet::from_indices(
        n,
        (0..n).filter(|&a| !neighbours.is_simple_hydrogen(NodeIndex::new(a))),
    );
    let mut remaining: Vec<usize> = (0..n).map(|a| neighbours.degree(NodeIndex::new(a))).collect();

    let mut stack: Vec<usize> = candidates.iter().filter(|&a| remaining[a] < 2).collect();
    while let Some(a) = stack.pop() {
        if !candidates.remove(a) {
            continue;
        }
        for nb in neighbours.conn_atoms(NodeIndex::new(a)) {
            let i = nb.index();
            if candidates.contains(i) {
                remaining[i] -= 1;
                if remaining[i] < 2 {
                    stack.push(i);
                }
            }
        }
    }
    candidates
}

/// Breadth-first shortest path from `from` to `to` over candidate atoms
/// without using `skip`; returns the atoms of the path, both ends included.
fn shortest_path_avoiding(
    neighbours: &Neighbours,
    candidates: &BitSet,
    from: NodeIndex,
    to: NodeIndex,
    skip: EdgeIndex,
    n: usize,
) -> Option<Vec<NodeIndex>> {
    let mut parent: Vec<Option<NodeIndex>> = vec![None; n];
    let mut visited = vec![false; n];
    visited[from.index()] = true;
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(cur) = queue.pop_front() {
        for (&nb, &e) in neighbours.conn_atoms(cur).iter().zip(neighbours.conn_bonds(cur)) {
            if e == skip || visited[nb.index()] || !candidates.contains(nb.index()) {
                continue;
            }
            visited[nb.index()] = true;
            parent[nb.index()] = Some(cur);
            if nb == to {
                let mut path = vec![to];
                let mut node = to;
                while let Some(p) = parent[node.index()] {
                    path.push(p);
                    node = p;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(nb);
        }
    }
    None
}

fn is_chordless(neighbours: &Neighbours, ring: &[NodeIndex]) -> bool {
    let len = ring.len();
    for i in 0..len {
        for j in (i + 2)..len {
            if i == 0 && j == len - 1 {
                continue;
            }
            if neighbours.bond_between(ring[i], ring[j]).is_some() {
                return false;
            }
        }
    }
    true
}

fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized = Vec::with_capacity(len);
    for i in 0..len {
        normalized.push(ring[(min_pos + i) % len]);
    }

    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }

    normalized
}
