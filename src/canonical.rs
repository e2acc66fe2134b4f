//! Canonical atom ranking.
//!
//! Every atom gets a packed invariant ([`BaseValue`]); equal invariants
//! share a rank. Ranks are refined with the ranks of the neighbours until
//! the number of distinct ranks stops growing, and remaining ties are
//! broken one at a time. Simple hydrogens are not ranked and keep rank 0.

use std::hash::Hasher;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use crate::atom::Atom;
use crate::bond::{Bond, BondKind, BondOrder};
use crate::helpers::Neighbours;
use crate::mol::Mol;
use crate::rings::RingCollection;

struct Fnv1aHasher(u64);

impl Fnv1aHasher {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

/// Bit string built from fixed-width fields, most significant field first.
///
/// Values compare like the concatenated bit strings, so a field added
/// earlier always outweighs every later field.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct BaseValue {
    words: Vec<u64>,
    free: u32,
}

impl BaseValue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends the low `bits` bits of `value`; higher bits are dropped.
    pub(crate) fn add(&mut self, bits: u32, value: u64) {
        let mut remaining = bits.min(64);
        while remaining > 0 {
            if self.free == 0 {
                self.words.push(0);
                self.free = 64;
            }
            let take = remaining.min(self.free);
            let chunk = (value >> (remaining - take)) & low_mask(take);
            if let Some(last) = self.words.last_mut() {
                *last |= chunk << (self.free - take);
            }
            self.free -= take;
            remaining -= take;
        }
    }
}

fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Bits needed to store values up to `max`.
pub(crate) fn bits_for(max: usize) -> u32 {
    usize::BITS - max.leading_zeros()
}

/// Computes canonical ranks for all atoms.
///
/// Ranks of ranked atoms are `1..=k` for `k` ranked atoms, all distinct.
/// The result only depends on the molecule's structure, except that among
/// atoms refinement cannot tell apart the one with the lowest index is
/// ranked first.
pub fn canonical_ranks(mol: &Mol<Atom, Bond>, neighbours: &Neighbours, rings: &RingCollection) -> Vec<u32> {
    let n = mol.atom_count();
    let ranked: Vec<usize> = (0..n)
        .filter(|&a| !neighbours.is_simple_hydrogen(NodeIndex::new(a)))
        .collect();
    if ranked.is_empty() {
        return vec![0; n];
    }

    let values: Vec<BaseValue> = (0..n)
        .map(|a| atom_base_value(mol, neighbours, rings, NodeIndex::new(a)))
        .collect();
    let (mut ranks, mut distinct) = consolidate(&ranked, &values, n);
    debug!(atoms = ranked.len(), distinct, "initial ranks");

    distinct = refine(mol, neighbours, rings, &ranked, &mut ranks, distinct);

    while distinct < ranked.len() {
        let Some(tied) = lowest_tied_rank(&ranked, &ranks) else {
            break;
        };
        let first = ranked.iter().copied().find(|&a| ranks[a] == tied);
        let values: Vec<BaseValue> = (0..n)
            .map(|a| {
                let mut v = BaseValue::new();
                let r = 2 * u64::from(ranks[a]);
                v.add(32, if Some(a) == first { r - 1 } else { r });
                v
            })
            .collect();
        trace!(rank = tied, atom = ?first, "breaking tie");
        let (broken, count) = consolidate(&ranked, &values, n);
        ranks = broken;
        distinct = refine(mol, neighbours, rings, &ranked, &mut ranks, count);
    }

    debug!(distinct, "canonical ranks");
    ranks
}

fn atom_base_value(mol: &Mol<Atom, Bond>, neighbours: &Neighbours, rings: &RingCollection, a: NodeIndex) -> BaseValue {
    let atom = mol.atom(a);
    let mut v = BaseValue::new();
    v.add(8, u64::from(atom.atomic_num));
    v.add(10, u64::from(atom.isotope.min(1023)));
    v.add(2, u64::from(pi_count(mol, neighbours, rings, a).min(3)));
    v.add(4, neighbours.degree(a).min(15) as u64);
    v.add(4, (atom.formal_charge.clamp(-8, 7) + 8) as u64);
    v.add(4, rings.atom_ring_size(a).min(15) as u64);
    v.add(4, u64::from(atom.abnormal_valence.map_or(0, |val| val.min(15))));
    v.add(2, u64::from(atom.radical.code()));
    v.add(6, u64::from(atom.rgroup.min(63)));
    v.add(32, u64::from(atom.query_features.bits()));
    v.add(1, u64::from(!atom.atom_list.is_empty()));
    if !atom.atom_list.is_empty() {
        let mut h = Fnv1aHasher::new();
        h.write(&atom.atom_list);
        v.add(32, h.finish() & 0xffff_ffff);
    }
    v
}

/// Pi bonds at the atom; one for any member of a delocalized system.
pub(crate) fn pi_count(mol: &Mol<Atom, Bond>, neighbours: &Neighbours, rings: &RingCollection, a: NodeIndex) -> u8 {
    let bonds = neighbours.conn_bonds(a);
    if bonds
        .iter()
        .any(|&b| rings.is_delocalized_bond(b) || mol.bond(b).kind == BondKind::Delocalized)
    {
        return 1;
    }
    bonds
        .iter()
        .map(|&b| {
            let bond = mol.bond(b);
            match bond.kind {
                BondKind::Covalent => bond.order.as_u8() - 1,
                _ => 0,
            }
        })
        .sum()
}

/// Whether `bond` is a double bond that ranking treats as localized.
fn is_localized_double(mol: &Mol<Atom, Bond>, rings: &RingCollection, bond: petgraph::graph::EdgeIndex) -> bool {
    let b = mol.bond(bond);
    b.kind == BondKind::Covalent && b.order == BondOrder::Double && !rings.is_delocalized_bond(bond)
}

/// Assigns ranks `1..=k` to the ranked atoms in ascending value order.
fn consolidate(ranked: &[usize], values: &[BaseValue], n: usize) -> (Vec<u32>, usize) {
    let mut order: Vec<usize> = ranked.to_vec();
    order.sort_by(|&a, &b| values[a].cmp(&values[b]));
    let mut ranks = vec![0u32; n];
    let mut rank = 0u32;
    for (i, &a) in order.iter().enumerate() {
        if i == 0 || values[a] != values[order[i - 1]] {
            rank += 1;
        }
        ranks[a] = rank;
    }
    (ranks, rank as usize)
}

fn refine(
    mol: &Mol<Atom, Bond>,
    neighbours: &Neighbours,
    rings: &RingCollection,
    ranked: &[usize],
    ranks: &mut Vec<u32>,
    mut distinct: usize,
) -> usize {
    let n = ranks.len();
    loop {
        let rank_bits = bits_for(distinct);
        let values: Vec<BaseValue> = (0..n)
            .map(|a| {
                let atom = NodeIndex::new(a);
                let mut v = BaseValue::new();
                v.add(rank_bits, u64::from(ranks[a]));
                let mut nb: Vec<u64> = neighbours
                    .conn_atoms(atom)
                    .iter()
                    .zip(neighbours.conn_bonds(atom))
                    .map(|(&other, &bond)| {
                        (u64::from(ranks[other.index()]) << 1) | u64::from(is_localized_double(mol, rings, bond))
                    })
                    .collect();
                nb.sort_unstable_by(|x, y| y.cmp(x));
                for r in nb {
                    v.add(rank_bits + 1, r);
                }
                v
            })
            .collect();
        let (new_ranks, count) = consolidate(ranked, &values, n);
        if count <= distinct {
            return distinct;
        }
        trace!(distinct = count, "refined ranks");
        *ranks = new_ranks;
        distinct = count;
    }
}

fn lowest_tied_rank(ranked: &[usize], ranks: &[u32]) -> Option<u32> {
    let mut sorted: Vec<u32> = ranked.iter().map(|&a| ranks[a]).collect();
    sorted.sort_unstable();
    sorted.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}
