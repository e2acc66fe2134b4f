use tracing::{debug, instrument, warn};

use petgraph::graph::EdgeIndex;

use super::bits::BitWriter;
use super::graph::LinearGraph;
use super::IdCode;
use crate::atom::{Atom, Radical};
use crate::bond::{Bond, BondKind};
use crate::canonical::{bits_for, canonical_ranks};
use crate::helpers::Neighbours;
use crate::mol::Mol;
use crate::options::PerceptionOptions;
use crate::rings::RingCollection;

pub(crate) const VERSION: u64 = 9;

pub(crate) const EXT_ISOTOPE: u8 = 1;
pub(crate) const EXT_RADICAL: u8 = 2;
pub(crate) const EXT_ABNORMAL_VALENCE: u8 = 3;
pub(crate) const EXT_ATOM_QUERY: u8 = 4;
pub(crate) const EXT_BOND_QUERY: u8 = 5;
pub(crate) const EXT_RGROUP: u8 = 6;
pub(crate) const EXT_ATOM_LIST: u8 = 7;
pub(crate) const EXT_COORDINATION: u8 = 8;
pub(crate) const EXT_FRAGMENT: u8 = 9;

pub(crate) const ISOTOPE_BITS: u32 = 10;
pub(crate) const RADICAL_BITS: u32 = 2;
pub(crate) const VALENCE_BITS: u32 = 4;
pub(crate) const ATOM_QUERY_BITS: u32 = 32;
pub(crate) const BOND_QUERY_BITS: u32 = 16;
pub(crate) const RGROUP_BITS: u32 = 6;
pub(crate) const LIST_LENGTH_BITS: u32 = 4;

/// Runs the perception pipeline for one molecule and writes its idcode.
///
/// The intermediate results (neighbour helpers, rings, canonical ranks and
/// the linearized graph) stay available for callers that need them.
#[derive(Debug)]
pub struct IdCodeEncoder<'a> {
    mol: &'a Mol<Atom, Bond>,
    neighbours: Neighbours,
    rings: RingCollection,
    ranks: Vec<u32>,
    graph: LinearGraph,
}

impl<'a> IdCodeEncoder<'a> {
    #[instrument(level = "debug", skip_all, fields(atoms = mol.atom_count(), bonds = mol.bond_count()))]
    pub fn new(mol: &'a Mol<Atom, Bond>, options: &PerceptionOptions) -> Self {
        let neighbours = Neighbours::new(mol);
        let rings = RingCollection::perceive(mol, &neighbours, options.ring_mode);
        let ranks = canonical_ranks(mol, &neighbours, &rings);
        let graph = LinearGraph::new(&neighbours, &ranks);
        Self {
            mol,
            neighbours,
            rings,
            ranks,
            graph,
        }
    }

    pub fn neighbours(&self) -> &Neighbours {
        &self.neighbours
    }

    pub fn rings(&self) -> &RingCollection {
        &self.rings
    }

    /// Canonical rank per atom; 0 for simple hydrogens.
    pub fn ranks(&self) -> &[u32] {
        &self.ranks
    }

    pub fn graph(&self) -> &LinearGraph {
        &self.graph
    }

    pub fn encode(&self) -> IdCode {
        let graph = &self.graph;
        let atoms = graph.atoms();
        let bonds = graph.bonds();
        let nbits = bits_for(atoms.len().max(bonds.len())).max(1);
        let mut w = BitWriter::new();

        w.write(4, VERSION);
        w.write(4, u64::from(nbits));
        w.write(nbits, atoms.len() as u64);
        w.write(nbits, bonds.len() as u64);

        let nitrogen = self.atom_positions(|a| a.atomic_num == 7);
        let oxygen = self.atom_positions(|a| a.atomic_num == 8);
        let other = self.atom_positions(|a| !matches!(a.atomic_num, 6..=8));
        let charged = self.atom_positions(|a| a.formal_charge != 0);
        for list in [&nitrogen, &oxygen, &other, &charged] {
            w.write(nbits, list.len() as u64);
        }
        for &p in nitrogen.iter().chain(&oxygen) {
            w.write(nbits, p as u64);
        }
        for &p in &other {
            w.write(nbits, p as u64);
            w.write(8, u64::from(self.atom_at(p).atomic_num));
        }
        for &p in &charged {
            w.write(nbits, p as u64);
            w.write(4, (clamped_charge(self.atom_at(p).formal_charge) + 8) as u64);
        }

        let deltas = self.parent_deltas();
        let dbits = bits_for(deltas.iter().copied().max().unwrap_or(0));
        w.write(4, u64::from(dbits));
        for &d in &deltas {
            w.write(dbits, d as u64);
        }
        for &(low, high, _) in graph.closures() {
            w.write(nbits, low as u64);
            w.write(nbits, high as u64);
        }

        for &b in &bonds {
            w.write(2, u64::from(self.bond_code(b)));
        }

        self.write_extensions(&mut w, nbits, &bonds);

        let code = IdCode(w.finish());
        debug!(atoms = atoms.len(), bonds = bonds.len(), length = code.as_str().len(), "encoded idcode");
        code
    }

    fn atom_at(&self, position: usize) -> &Atom {
        self.mol.atom(self.graph.atoms()[position])
    }

    fn atom_positions(&self, keep: impl Fn(&Atom) -> bool) -> Vec<usize> {
        (0..self.graph.atom_count())
            .filter(|&p| keep(self.atom_at(p)))
            .collect()
    }

    /// `1 + parent - previous parent` per non-root atom; 0 starts a new
    /// fragment.
    fn parent_deltas(&self) -> Vec<usize> {
        let mut previous = 0;
        (1..self.graph.atom_count())
            .map(|i| match self.graph.parent(i) {
                Some(p) => {
                    let d = 1 + p - previous;
                    previous = p;
                    d
                }
                None => 0,
            })
            .collect()
    }

    /// 2-bit bond code: 0 delocalized, otherwise the bond order.
    fn bond_code(&self, bond: EdgeIndex) -> u8 {
        let b = self.mol.bond(bond);
        if self.rings.is_delocalized_bond(bond) {
            return 0;
        }
        match b.kind {
            BondKind::Delocalized => 0,
            BondKind::Coordination => 1,
            BondKind::Covalent => b.order.as_u8(),
        }
    }

    fn write_extensions(&self, w: &mut BitWriter, nbits: u32, bonds: &[EdgeIndex]) {
        let atom_entries = |value: &dyn Fn(&Atom) -> Option<u64>| -> Vec<(usize, u64)> {
            (0..self.graph.atom_count())
                .filter_map(|p| value(self.atom_at(p)).map(|v| (p, v)))
                .collect()
        };

        let isotopes = atom_entries(&|a| (a.isotope != 0).then(|| u64::from(a.isotope.min(1023))));
        write_entries(w, EXT_ISOTOPE, nbits, ISOTOPE_BITS, &isotopes);

        let radicals = atom_entries(&|a| (a.radical != Radical::None).then(|| u64::from(a.radical.code())));
        write_entries(w, EXT_RADICAL, nbits, RADICAL_BITS, &radicals);

        let valences = atom_entries(&|a| a.abnormal_valence.map(|v| u64::from(v.min(15))));
        write_entries(w, EXT_ABNORMAL_VALENCE, nbits, VALENCE_BITS, &valences);

        let atom_queries = atom_entries(&|a| (!a.query_features.is_empty()).then(|| u64::from(a.query_features.bits())));
        write_entries(w, EXT_ATOM_QUERY, nbits, ATOM_QUERY_BITS, &atom_queries);

        let bond_queries: Vec<(usize, u64)> = bonds
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| {
                let q = self.mol.bond(b).query_features;
                (!q.is_empty()).then(|| (i, u64::from(q.bits())))
            })
            .collect();
        write_entries(w, EXT_BOND_QUERY, nbits, BOND_QUERY_BITS, &bond_queries);

        let rgroups = atom_entries(&|a| (a.rgroup != 0).then(|| u64::from(a.rgroup.min(63))));
        write_entries(w, EXT_RGROUP, nbits, RGROUP_BITS, &rgroups);

        let lists: Vec<(usize, &[u8])> = (0..self.graph.atom_count())
            .map(|p| (p, self.atom_at(p).atom_list.as_slice()))
            .filter(|(_, list)| !list.is_empty())
            .collect();
        if !lists.is_empty() {
            begin_extension(w, EXT_ATOM_LIST);
            w.write(nbits, lists.len() as u64);
            for (p, list) in lists {
                let list = &list[..list.len().min(15)];
                w.write(nbits, p as u64);
                w.write(LIST_LENGTH_BITS, list.len() as u64);
                for &z in list {
                    w.write(8, u64::from(z));
                }
            }
        }

        let coordination: Vec<usize> = bonds
            .iter()
            .enumerate()
            .filter(|&(_, &b)| self.mol.bond(b).kind == BondKind::Coordination)
            .map(|(i, _)| i)
            .collect();
        if !coordination.is_empty() {
            begin_extension(w, EXT_COORDINATION);
            w.write(nbits, coordination.len() as u64);
            for i in coordination {
                w.write(nbits, i as u64);
            }
        }

        if self.mol.is_fragment() {
            begin_extension(w, EXT_FRAGMENT);
        }

        w.write_flag(false);
    }
}

/// Charge limited to the 4-bit field.
fn clamped_charge(charge: i8) -> i8 {
    let clamped = charge.clamp(-8, 7);
    if clamped != charge {
        warn!(charge, clamped, "formal charge outside -8..=7 clamped");
    }
    clamped
}

fn begin_extension(w: &mut BitWriter, tag: u8) {
    w.write_flag(true);
    w.write(4, u64::from(tag));
}

fn write_entries(w: &mut BitWriter, tag: u8, nbits: u32, value_bits: u32, entries: &[(usize, u64)]) {
    if entries.is_empty() {
        return;
    }
    begin_extension(w, tag);
    w.write(nbits, entries.len() as u64);
    for &(index, value) in entries {
        w.write(nbits, index as u64);
        w.write(value_bits, value);
    }
}
