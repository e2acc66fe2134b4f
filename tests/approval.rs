mod common;

use std::collections::HashMap;

use molkey::{kekulize, to_idcode, Atom, Bond, BondOrder, IdCode, Mol, Neighbours, PerceptionOptions, RingCollection};
use serde::Deserialize;

#[derive(Deserialize)]
struct MolEntry {
    atoms: Vec<u8>,
    #[serde(default)]
    charges: Vec<(usize, i8)>,
    bonds: Vec<(usize, usize, u8)>,
}

impl MolEntry {
    fn build(&self) -> Mol<Atom, Bond> {
        common::build(&self.atoms, &self.charges, &self.bonds)
    }
}

// ---------------------------------------------------------------------------
// 1. Ring perception and Kekulé resolution
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PerceptionEntry {
    name: String,
    #[serde(flatten)]
    mol: MolEntry,
    ring_sizes: Vec<usize>,
    aromatic_rings: usize,
    delocalized_rings: usize,
    kekulize_complete: bool,
    double_bonds: Option<usize>,
}

#[test]
fn approval_perception() {
    let data: Vec<PerceptionEntry> =
        serde_json::from_str(include_str!("approval_data/perception.json")).unwrap();

    let ring_mode = PerceptionOptions::default().ring_mode;
    let mut failures = Vec::new();
    for entry in &data {
        let mut mol = entry.mol.build();
        let neighbours = Neighbours::new(&mol);
        let rings = RingCollection::perceive(&mol, &neighbours, ring_mode);

        let mut sizes: Vec<usize> = rings.rings().iter().map(|r| r.size()).collect();
        sizes.sort();
        if sizes != entry.ring_sizes {
            failures.push(format!(
                "[rings] {}: expected {:?}, got {:?}",
                entry.name, entry.ring_sizes, sizes
            ));
        }

        let aromatic = rings.rings().iter().filter(|r| r.is_aromatic()).count();
        if aromatic != entry.aromatic_rings {
            failures.push(format!(
                "[aromatic] {}: expected {}, got {}",
                entry.name, entry.aromatic_rings, aromatic
            ));
        }

        let delocalized = rings.rings().iter().filter(|r| r.is_delocalized()).count();
        if delocalized != entry.delocalized_rings {
            failures.push(format!(
                "[delocalized] {}: expected {}, got {}",
                entry.name, entry.delocalized_rings, delocalized
            ));
        }

        let complete = kekulize(&mut mol);
        if complete != entry.kekulize_complete {
            failures.push(format!(
                "[kekulize] {}: expected {}, got {}",
                entry.name, entry.kekulize_complete, complete
            ));
        }

        if let Some(expected) = entry.double_bonds {
            let doubles = mol
                .bonds()
                .filter(|&e| mol.bond(e).order == BondOrder::Double)
                .count();
            if doubles != expected {
                failures.push(format!(
                    "[double bonds] {}: expected {}, got {}",
                    entry.name, expected, doubles
                ));
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} perception failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

// ---------------------------------------------------------------------------
// 2. idcode equivalence classes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GroupEntry {
    group: String,
    members: Vec<MolEntry>,
}

#[test]
fn approval_idcode_groups() {
    let data: Vec<GroupEntry> =
        serde_json::from_str(include_str!("approval_data/idcode_groups.json")).unwrap();

    let mut failures = Vec::new();
    let mut owners: HashMap<IdCode, &str> = HashMap::new();
    for entry in &data {
        let codes: Vec<IdCode> = entry.members.iter().map(|m| to_idcode(&m.build())).collect();
        let first = &codes[0];
        for (i, code) in codes.iter().enumerate().skip(1) {
            if code != first {
                failures.push(format!(
                    "[same] {} member {}: expected {}, got {}",
                    entry.group, i, first, code
                ));
            }
        }
        if let Some(other) = owners.insert(first.clone(), &entry.group) {
            failures.push(format!("[distinct] {} and {} share {}", other, entry.group, first));
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} idcode group failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}
