use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondKind};
use crate::mol::Mol;

/// Valence already consumed by explicit bonds and radical electrons.
///
/// Delocalized bonds count one each plus a single shared pi bond, so an
/// aromatic CH with two delocalized ring bonds occupies three valences.
pub fn occupied_valence(mol: &Mol<Atom, Bond>, atom: NodeIndex) -> u8 {
    let mut sum = 0u8;
    let mut delocalized = false;
    for e in mol.bonds_of(atom) {
        let bond = mol.bond(e);
        match bond.kind {
            BondKind::Covalent => sum += bond.order.as_u8(),
            BondKind::Delocalized => {
                sum += 1;
                delocalized = true;
            }
            BondKind::Coordination => {}
        }
    }
    if delocalized {
        sum += 1;
    }
    sum + mol.atom(atom).radical.valence_loss()
}

/// Valence the atom may reach, given that `occupied` valences are used.
///
/// An explicit abnormal valence always wins. Otherwise the smallest
/// charge-adjusted default valence that accommodates `occupied` is
/// returned, or the largest one if none does. `None` for elements without
/// default valences and for query placeholders.
pub fn max_valence(atom: &Atom, occupied: u8) -> Option<u8> {
    if let Some(v) = atom.abnormal_valence {
        return Some(v);
    }
    let elem = atom.element()?;
    let charge = atom.formal_charge as i16;
    let adjusted: Vec<u8> = elem
        .default_valences()
        .iter()
        .filter_map(|&v| {
            let v = if elem.is_electron_rich() {
                v as i16 + charge
            } else {
                v as i16 - charge.abs()
            };
            u8::try_from(v).ok()
        })
        .collect();
    adjusted
        .iter()
        .copied()
        .find(|&v| v >= occupied)
        .or_else(|| adjusted.last().copied())
}

/// Number of hydrogens implied by the atom's valence.
///
/// Atoms of query fragments never carry implicit hydrogens.
pub fn implicit_hydrogens(mol: &Mol<Atom, Bond>, atom: NodeIndex) -> u8 {
    if mol.is_fragment() {
        return 0;
    }
    let occupied = occupied_valence(mol, atom);
    max_valence(mol.atom(atom), occupied)
        .map(|v| v.saturating_sub(occupied))
        .unwrap_or(0)
}

impl Mol<Atom, Bond> {
    pub fn implicit_hydrogens(&self, atom: NodeIndex) -> u8 {
        implicit_hydrogens(self, atom)
    }
}
