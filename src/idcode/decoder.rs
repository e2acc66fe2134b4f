use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::debug;

use super::bits::BitReader;
use super::encoder::{
    ATOM_QUERY_BITS, BOND_QUERY_BITS, EXT_ABNORMAL_VALENCE, EXT_ATOM_LIST, EXT_ATOM_QUERY, EXT_BOND_QUERY,
    EXT_COORDINATION, EXT_FRAGMENT, EXT_ISOTOPE, EXT_RADICAL, EXT_RGROUP, ISOTOPE_BITS, LIST_LENGTH_BITS,
    RADICAL_BITS, RGROUP_BITS, VALENCE_BITS, VERSION,
};
use super::error::IdCodeError;
use crate::atom::{Atom, AtomQueryFeatures, Radical};
use crate::bond::{Bond, BondKind, BondOrder, BondQueryFeatures};
use crate::helpers::Neighbours;
use crate::kekulize::kekulize;
use crate::mol::Mol;
use crate::options::PerceptionOptions;
use crate::rings::RingCollection;

/// Rebuilds a molecule from an idcode.
///
/// Atoms are numbered in the code's traversal order. Bonds written as
/// delocalized are resolved into a Kekulé structure unless
/// [`PerceptionOptions::kekulize_decoded`] is off; those that ring
/// perception would not report as delocalized again (open chains,
/// imidazole-type rings, rings that fail to resolve) stay
/// [`BondKind::Delocalized`].
pub fn decode(code: &str, options: &PerceptionOptions) -> Result<Mol<Atom, Bond>, IdCodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(IdCodeError::Empty);
    }
    let mut r = BitReader::new(code)?;

    let version = r.read(4)?;
    if version != VERSION {
        return Err(IdCodeError::UnsupportedVersion(version as u8));
    }
    let nbits = r.read(4)? as u32;
    let atom_count = r.read_usize(nbits)?;
    let bond_count = r.read_usize(nbits)?;

    let nitrogen = r.read_usize(nbits)?;
    let oxygen = r.read_usize(nbits)?;
    let other = r.read_usize(nbits)?;
    let charged = r.read_usize(nbits)?;

    let mut atoms = vec![Atom::new(6); atom_count];
    for _ in 0..nitrogen {
        atoms[read_atom(&mut r, nbits, atom_count)?].atomic_num = 7;
    }
    for _ in 0..oxygen {
        atoms[read_atom(&mut r, nbits, atom_count)?].atomic_num = 8;
    }
    for _ in 0..other {
        let p = read_atom(&mut r, nbits, atom_count)?;
        let z = r.read(8)?;
        if z > 118 {
            return Err(IdCodeError::InvalidValue {
                what: "atomic number",
                value: z,
            });
        }
        atoms[p].atomic_num = z as u8;
    }
    for _ in 0..charged {
        let p = read_atom(&mut r, nbits, atom_count)?;
        atoms[p].formal_charge = r.read(4)? as i8 - 8;
    }

    let dbits = r.read(4)? as u32;
    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(bond_count);
    let mut previous = 0;
    for i in 1..atom_count {
        let d = r.read_usize(dbits)?;
        if d == 0 {
            continue;
        }
        let parent = previous + d - 1;
        if parent >= i {
            return Err(IdCodeError::IndexOutOfRange {
                what: "parent atom",
                index: parent,
                limit: i,
            });
        }
        previous = parent;
        edges.push((parent, i));
    }
    if edges.len() > bond_count {
        return Err(IdCodeError::BondCountMismatch {
            bonds: bond_count,
            tree: edges.len(),
        });
    }
    for _ in edges.len()..bond_count {
        let low = read_atom(&mut r, nbits, atom_count)?;
        let high = read_atom(&mut r, nbits, atom_count)?;
        if low == high {
            return Err(IdCodeError::IndexOutOfRange {
                what: "ring closure atom",
                index: high,
                limit: atom_count,
            });
        }
        edges.push((low, high));
    }

    let mut bonds = Vec::with_capacity(bond_count);
    for _ in 0..bond_count {
        bonds.push(match r.read(2)? {
            0 => Bond::delocalized(),
            2 => Bond::double(),
            3 => Bond::triple(),
            _ => Bond::single(),
        });
    }

    let mut is_fragment = false;
    while r.read_flag()? {
        let tag = r.read(4)? as u8;
        match tag {
            EXT_ISOTOPE => read_entries(&mut r, nbits, atom_count, ISOTOPE_BITS, |p, v| {
                atoms[p].isotope = v as u16;
            })?,
            EXT_RADICAL => read_entries(&mut r, nbits, atom_count, RADICAL_BITS, |p, v| {
                atoms[p].radical = Radical::from_code(v as u8).unwrap_or_default();
            })?,
            EXT_ABNORMAL_VALENCE => read_entries(&mut r, nbits, atom_count, VALENCE_BITS, |p, v| {
                atoms[p].abnormal_valence = Some(v as u8);
            })?,
            EXT_ATOM_QUERY => read_entries(&mut r, nbits, atom_count, ATOM_QUERY_BITS, |p, v| {
                atoms[p].query_features = AtomQueryFeatures::from_bits_truncate(v as u32);
            })?,
            EXT_BOND_QUERY => read_entries(&mut r, nbits, bond_count, BOND_QUERY_BITS, |b, v| {
                bonds[b].query_features = BondQueryFeatures::from_bits_truncate(v as u16);
            })?,
            EXT_RGROUP => read_entries(&mut r, nbits, atom_count, RGROUP_BITS, |p, v| {
                atoms[p].rgroup = v as u8;
            })?,
            EXT_ATOM_LIST => {
                let count = r.read_usize(nbits)?;
                for _ in 0..count {
                    let p = read_atom(&mut r, nbits, atom_count)?;
                    let len = r.read_usize(LIST_LENGTH_BITS)?;
                    let mut list = Vec::with_capacity(len);
                    for _ in 0..len {
                        list.push(r.read(8)? as u8);
                    }
                    atoms[p].atom_list = list;
                }
            }
            EXT_COORDINATION => {
                let count = r.read_usize(nbits)?;
                for _ in 0..count {
                    let b = read_index(&mut r, nbits, bond_count, "bond")?;
                    bonds[b].kind = BondKind::Coordination;
                    bonds[b].order = BondOrder::Single;
                }
            }
            EXT_FRAGMENT => is_fragment = true,
            unknown => return Err(IdCodeError::UnknownExtension(unknown)),
        }
    }

    let mut mol = Mol::with_capacity(atom_count, bond_count);
    for atom in atoms {
        mol.add_atom(atom);
    }
    for ((a, b), bond) in edges.into_iter().zip(bonds) {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), bond);
    }
    mol.set_fragment(is_fragment);

    if options.kekulize_decoded {
        resolve_delocalized(&mut mol, options);
    }

    debug!(atoms = mol.atom_count(), bonds = mol.bond_count(), "decoded idcode");
    Ok(mol)
}

/// Kekulizes the bonds written as delocalized, then puts back every one of
/// them that perception of the result does not mark delocalized, until no
/// such bond is left.
fn resolve_delocalized(mol: &mut Mol<Atom, Bond>, options: &PerceptionOptions) {
    let written: Vec<(EdgeIndex, Bond)> = mol
        .bonds()
        .filter(|&e| mol.bond(e).kind == BondKind::Delocalized)
        .map(|e| (e, mol.bond(e).clone()))
        .collect();
    if written.is_empty() {
        return;
    }

    let complete = kekulize(mol);
    let mut restored = 0;
    loop {
        let neighbours = Neighbours::new(mol);
        let rings = RingCollection::perceive(mol, &neighbours, options.ring_mode);
        let stray: Vec<&(EdgeIndex, Bond)> = written
            .iter()
            .filter(|(e, _)| mol.bond(*e).kind != BondKind::Delocalized && !rings.is_delocalized_bond(*e))
            .collect();
        if stray.is_empty() {
            break;
        }
        restored += stray.len();
        for (e, bond) in stray {
            *mol.bond_mut(*e) = bond.clone();
        }
    }
    debug!(delocalized = written.len(), complete, restored, "kekulized decoded molecule");
}

fn read_index(r: &mut BitReader, nbits: u32, limit: usize, what: &'static str) -> Result<usize, IdCodeError> {
    let index = r.read_usize(nbits)?;
    if index >= limit {
        return Err(IdCodeError::IndexOutOfRange { what, index, limit });
    }
    Ok(index)
}

fn read_atom(r: &mut BitReader, nbits: u32, atom_count: usize) -> Result<usize, IdCodeError> {
    read_index(r, nbits, atom_count, "atom")
}

/// Reads a counted list of `(index, value)` pairs; indices are checked
/// against `limit` before `set` sees them.
fn read_entries(
    r: &mut BitReader,
    nbits: u32,
    limit: usize,
    value_bits: u32,
    mut set: impl FnMut(usize, u64),
) -> Result<(), IdCodeError> {
    let count = r.read_usize(nbits)?;
    for _ in 0..count {
        let index = read_index(r, nbits, limit, "extension")?;
        let value = r.read(value_bits)?;
        set(index, value);
    }
    Ok(())
}
