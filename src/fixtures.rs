//! Small molecules built by hand for unit tests.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;

/// Bond from a compact order code: 0 = delocalized, 1..=3 = covalent order.
pub(crate) fn bond_of(order: u8) -> Bond {
    match order {
        0 => Bond::delocalized(),
        2 => Bond::double(),
        3 => Bond::triple(),
        _ => Bond::single(),
    }
}

pub(crate) fn mol_from(atoms: &[Atom], bonds: &[(usize, usize, u8)]) -> Mol<Atom, Bond> {
    let mut mol = Mol::with_capacity(atoms.len(), bonds.len());
    for atom in atoms {
        mol.add_atom(atom.clone());
    }
    for &(a, b, order) in bonds {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), bond_of(order));
    }
    mol
}

pub(crate) fn chain(atomic_nums: &[u8], orders: &[u8]) -> Mol<Atom, Bond> {
    let atoms: Vec<Atom> = atomic_nums.iter().map(|&z| Atom::new(z)).collect();
    let bonds: Vec<(usize, usize, u8)> = orders
        .iter()
        .enumerate()
        .map(|(i, &o)| (i, i + 1, o))
        .collect();
    mol_from(&atoms, &bonds)
}

pub(crate) fn ring(atomic_nums: &[u8], delocalized: bool) -> Mol<Atom, Bond> {
    let n = atomic_nums.len();
    let atoms: Vec<Atom> = atomic_nums.iter().map(|&z| Atom::new(z)).collect();
    let order = if delocalized { 0 } else { 1 };
    let bonds: Vec<(usize, usize, u8)> = (0..n).map(|i| (i, (i + 1) % n, order)).collect();
    mol_from(&atoms, &bonds)
}

/// Ring with explicit orders; bond `i` joins atom `i` and atom `i + 1`.
pub(crate) fn ring_with_orders(atomic_nums: &[u8], orders: &[u8]) -> Mol<Atom, Bond> {
    let n = atomic_nums.len();
    let atoms: Vec<Atom> = atomic_nums.iter().map(|&z| Atom::new(z)).collect();
    let bonds: Vec<(usize, usize, u8)> = (0..n).map(|i| (i, (i + 1) % n, orders[i])).collect();
    mol_from(&atoms, &bonds)
}

pub(crate) fn kekule_benzene() -> Mol<Atom, Bond> {
    ring_with_orders(&[6; 6], &[2, 1, 2, 1, 2, 1])
}

/// Naphthalene; atoms 0..=3 and 4..=7 are the outer CH atoms, 8 and 9 the
/// fusion atoms.
pub(crate) fn naphthalene(delocalized: bool) -> Mol<Atom, Bond> {
    let atoms = vec![Atom::new(6); 10];
    let (d, s) = if delocalized { (0, 0) } else { (2, 1) };
    let bonds = [
        (8, 0, s),
        (0, 1, d),
        (1, 2, s),
        (2, 3, d),
        (3, 9, s),
        (9, 8, d),
        (9, 4, s),
        (4, 5, d),
        (5, 6, s),
        (6, 7, d),
        (7, 8, s),
    ];
    mol_from(&atoms, &bonds)
}

pub(crate) fn pyrrole(delocalized: bool) -> Mol<Atom, Bond> {
    if delocalized {
        ring(&[7, 6, 6, 6, 6], true)
    } else {
        ring_with_orders(&[7, 6, 6, 6, 6], &[1, 2, 1, 2, 1])
    }
}

pub(crate) fn cyclopentadienyl_anion(delocalized: bool) -> Mol<Atom, Bond> {
    let mut mol = if delocalized {
        ring(&[6; 5], true)
    } else {
        ring_with_orders(&[6; 5], &[1, 2, 1, 2, 1])
    };
    mol.atom_mut(NodeIndex::new(0)).formal_charge = -1;
    mol
}

pub(crate) fn propane() -> Mol<Atom, Bond> {
    chain(&[6, 6, 6], &[1, 1])
}
