#![allow(dead_code)]

use molkey::{Atom, AtomQueryFeatures, Bond, Mol, Radical};
use petgraph::graph::NodeIndex;

/// Hand-written molecule: atomic numbers, formal charges by atom index,
/// and bonds as `(a, b, order)` where order 0 means delocalized.
pub struct Entry {
    pub name: &'static str,
    pub atoms: &'static [u8],
    pub charges: &'static [(usize, i8)],
    pub bonds: &'static [(usize, usize, u8)],
}

impl Entry {
    pub fn build(&self) -> Mol<Atom, Bond> {
        build(self.atoms, self.charges, self.bonds)
    }
}

pub fn bond_of(order: u8) -> Bond {
    match order {
        0 => Bond::delocalized(),
        2 => Bond::double(),
        3 => Bond::triple(),
        _ => Bond::single(),
    }
}

pub fn build(atoms: &[u8], charges: &[(usize, i8)], bonds: &[(usize, usize, u8)]) -> Mol<Atom, Bond> {
    let mut mol = Mol::with_capacity(atoms.len(), bonds.len());
    for &z in atoms {
        mol.add_atom(Atom::new(z));
    }
    for &(i, charge) in charges {
        mol.atom_mut(NodeIndex::new(i)).formal_charge = charge;
    }
    for &(a, b, order) in bonds {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), bond_of(order));
    }
    mol
}

const KEKULE_6: &[(usize, usize, u8)] = &[(0, 1, 2), (1, 2, 1), (2, 3, 2), (3, 4, 1), (4, 5, 2), (5, 0, 1)];
const KEKULE_5: &[(usize, usize, u8)] = &[(0, 1, 1), (1, 2, 2), (2, 3, 1), (3, 4, 2), (4, 0, 1)];
const DELOCALIZED_5: &[(usize, usize, u8)] = &[(0, 1, 0), (1, 2, 0), (2, 3, 0), (3, 4, 0), (4, 0, 0)];

pub const MOLECULES: &[Entry] = &[
    // Simple
    Entry { name: "methane", atoms: &[6], charges: &[], bonds: &[] },
    Entry { name: "ethanol", atoms: &[6, 6, 8], charges: &[], bonds: &[(0, 1, 1), (1, 2, 1)] },
    Entry { name: "acetic acid", atoms: &[6, 6, 8, 8], charges: &[], bonds: &[(0, 1, 1), (1, 2, 2), (1, 3, 1)] },
    Entry { name: "acetonitrile", atoms: &[6, 6, 7], charges: &[], bonds: &[(0, 1, 1), (1, 2, 3)] },
    Entry { name: "acetone", atoms: &[6, 6, 6, 8], charges: &[], bonds: &[(0, 1, 1), (1, 2, 1), (1, 3, 2)] },
    // Branching
    Entry { name: "isobutane", atoms: &[6, 6, 6, 6], charges: &[], bonds: &[(0, 1, 1), (1, 2, 1), (1, 3, 1)] },
    Entry {
        name: "neopentane",
        atoms: &[6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (0, 4, 1)],
    },
    // Saturated rings
    Entry { name: "cyclopropane", atoms: &[6, 6, 6], charges: &[], bonds: &[(0, 1, 1), (1, 2, 1), (2, 0, 1)] },
    Entry {
        name: "cyclohexane",
        atoms: &[6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 5, 1), (5, 0, 1)],
    },
    Entry {
        name: "norbornane",
        atoms: &[6, 6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1), (4, 5, 1), (5, 0, 1), (0, 6, 1), (6, 3, 1)],
    },
    Entry {
        name: "cubane",
        atoms: &[6, 6, 6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[
            (0, 1, 1),
            (1, 2, 1),
            (2, 3, 1),
            (3, 0, 1),
            (4, 5, 1),
            (5, 6, 1),
            (6, 7, 1),
            (7, 4, 1),
            (0, 4, 1),
            (1, 5, 1),
            (2, 6, 1),
            (3, 7, 1),
        ],
    },
    // Aromatic
    Entry { name: "benzene", atoms: &[6, 6, 6, 6, 6, 6], charges: &[], bonds: KEKULE_6 },
    Entry {
        name: "benzene (delocalized)",
        atoms: &[6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 0), (1, 2, 0), (2, 3, 0), (3, 4, 0), (4, 5, 0), (5, 0, 0)],
    },
    Entry { name: "pyridine", atoms: &[7, 6, 6, 6, 6, 6], charges: &[], bonds: KEKULE_6 },
    Entry { name: "pyrrole", atoms: &[7, 6, 6, 6, 6], charges: &[], bonds: KEKULE_5 },
    Entry { name: "furan", atoms: &[8, 6, 6, 6, 6], charges: &[], bonds: KEKULE_5 },
    Entry { name: "thiophene", atoms: &[16, 6, 6, 6, 6], charges: &[], bonds: KEKULE_5 },
    Entry { name: "imidazole", atoms: &[7, 6, 7, 6, 6], charges: &[], bonds: KEKULE_5 },
    Entry { name: "imidazole (delocalized)", atoms: &[7, 6, 7, 6, 6], charges: &[], bonds: DELOCALIZED_5 },
    Entry { name: "cyclopentadienyl (delocalized)", atoms: &[6, 6, 6, 6, 6], charges: &[], bonds: DELOCALIZED_5 },
    Entry {
        name: "butadiene (delocalized)",
        atoms: &[6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 0), (1, 2, 0), (2, 3, 0)],
    },
    Entry { name: "cyclopentadienyl anion", atoms: &[6, 6, 6, 6, 6], charges: &[(0, -1)], bonds: KEKULE_5 },
    Entry {
        name: "tropylium",
        atoms: &[6, 6, 6, 6, 6, 6, 6],
        charges: &[(0, 1)],
        bonds: &[(0, 1, 1), (1, 2, 2), (2, 3, 1), (3, 4, 2), (4, 5, 1), (5, 6, 2), (6, 0, 1)],
    },
    Entry {
        name: "phenol",
        atoms: &[6, 6, 6, 6, 6, 6, 8],
        charges: &[],
        bonds: &[(0, 1, 2), (1, 2, 1), (2, 3, 2), (3, 4, 1), (4, 5, 2), (5, 0, 1), (0, 6, 1)],
    },
    Entry {
        name: "toluene",
        atoms: &[6, 6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[(0, 1, 2), (1, 2, 1), (2, 3, 2), (3, 4, 1), (4, 5, 2), (5, 0, 1), (0, 6, 1)],
    },
    Entry {
        name: "naphthalene",
        atoms: &[6, 6, 6, 6, 6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[
            (0, 1, 2),
            (1, 2, 1),
            (2, 3, 2),
            (3, 4, 1),
            (4, 5, 2),
            (5, 6, 1),
            (6, 7, 2),
            (7, 8, 1),
            (8, 9, 2),
            (9, 0, 1),
            (0, 5, 1),
        ],
    },
    Entry {
        name: "indole",
        atoms: &[7, 6, 6, 6, 6, 6, 6, 6, 6],
        charges: &[],
        bonds: &[
            (0, 1, 1),
            (1, 2, 2),
            (2, 3, 1),
            (3, 4, 1),
            (4, 5, 2),
            (5, 6, 1),
            (6, 7, 2),
            (7, 8, 1),
            (8, 3, 2),
            (8, 0, 1),
        ],
    },
    Entry {
        name: "nitrobenzene",
        atoms: &[6, 6, 6, 6, 6, 6, 7, 8, 8],
        charges: &[(6, 1), (8, -1)],
        bonds: &[
            (0, 1, 2),
            (1, 2, 1),
            (2, 3, 2),
            (3, 4, 1),
            (4, 5, 2),
            (5, 0, 1),
            (0, 6, 1),
            (6, 7, 2),
            (6, 8, 1),
        ],
    },
    // Charged and multi-component
    Entry {
        name: "glycine zwitterion",
        atoms: &[7, 6, 6, 8, 8],
        charges: &[(0, 1), (4, -1)],
        bonds: &[(0, 1, 1), (1, 2, 1), (2, 3, 2), (2, 4, 1)],
    },
    Entry { name: "sodium chloride", atoms: &[11, 17], charges: &[(0, 1), (1, -1)], bonds: &[] },
    Entry { name: "ammonium hydroxide", atoms: &[7, 8], charges: &[(0, 1), (1, -1)], bonds: &[] },
    Entry { name: "ethene and ethyne", atoms: &[6, 6, 6, 6], charges: &[], bonds: &[(0, 1, 2), (2, 3, 3)] },
];

/// Molecules using features the compact table cannot express.
pub fn special_molecules() -> Vec<(&'static str, Mol<Atom, Bond>)> {
    let n = NodeIndex::new;

    let mut deuteromethane = build(&[6, 1], &[], &[(0, 1, 1)]);
    deuteromethane.atom_mut(n(1)).isotope = 2;

    let mut methyl_radical = build(&[6], &[], &[]);
    methyl_radical.atom_mut(n(0)).radical = Radical::Doublet;

    let ethanol_with_h = build(&[6, 6, 8, 1], &[], &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);

    let mut carbon_13 = build(&[6, 6, 6], &[], &[(0, 1, 1), (1, 2, 1)]);
    carbon_13.atom_mut(n(0)).isotope = 13;

    let mut ammine_iron = build(&[26, 7, 7], &[], &[]);
    ammine_iron.add_bond(n(0), n(1), Bond::coordination());
    ammine_iron.add_bond(n(0), n(2), Bond::coordination());

    let mut carbene = build(&[6, 6], &[], &[(0, 1, 1)]);
    carbene.atom_mut(n(0)).abnormal_valence = Some(2);

    let mut query = build(&[6, 6, 0], &[], &[(0, 1, 1), (1, 2, 1)]);
    query.set_fragment(true);
    query.atom_mut(n(2)).atom_list = vec![7, 8];
    query.atom_mut(n(0)).query_features = AtomQueryFeatures::NOT_CHAIN;

    let mut benzyl_query = build(
        &[6, 6, 6, 6, 6, 6, 6, 6],
        &[],
        &[(0, 1, 0), (1, 2, 0), (2, 3, 0), (3, 4, 0), (4, 5, 0), (5, 0, 0), (0, 6, 1), (6, 7, 0)],
    );
    benzyl_query.set_fragment(true);

    vec![
        ("deuteromethane", deuteromethane),
        ("methyl radical", methyl_radical),
        ("ethanol with explicit hydrogen", ethanol_with_h),
        ("1-13C-propane", carbon_13),
        ("diammine iron", ammine_iron),
        ("carbene", carbene),
        ("query fragment", query),
        ("query fragment with delocalized side chain", benzyl_query),
    ]
}

pub fn all_molecules() -> Vec<(&'static str, Mol<Atom, Bond>)> {
    MOLECULES
        .iter()
        .map(|e| (e.name, e.build()))
        .chain(special_molecules())
        .collect()
}
