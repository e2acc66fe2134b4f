use crate::atom::Radical;
use crate::bond::{BondKind, BondOrder};

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasIsotope {
    fn isotope(&self) -> u16;
}

pub trait HasRadical {
    fn radical(&self) -> Radical;
}

/// Atoms that can tell whether they are plain hydrogens.
///
/// Plain hydrogens are skipped by the neighbour helpers when counting
/// heavy-atom degree and are never ranked.
pub trait HasPlainHydrogen {
    fn is_plain_hydrogen(&self) -> bool;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondKind {
    fn bond_kind(&self) -> BondKind;

    fn is_delocalized(&self) -> bool {
        self.bond_kind() == BondKind::Delocalized
    }
}

/// A bond contributes to a ring's pi system when it is double, triple or
/// delocalized.
pub trait HasPiBond: HasBondOrder + HasBondKind {
    fn is_pi_bond(&self) -> bool {
        match self.bond_kind() {
            BondKind::Delocalized => true,
            BondKind::Coordination => false,
            BondKind::Covalent => self.bond_order() != BondOrder::Single,
        }
    }
}

impl<T: HasBondOrder + HasBondKind> HasPiBond for T {}
