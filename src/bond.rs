use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub fn from_u8(order: u8) -> Option<BondOrder> {
        match order {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            _ => None,
        }
    }
}

/// How a bond participates in the electronic structure.
///
/// `Delocalized` bonds have no fixed Kekulé order yet; their `order` field is
/// `Single` until [`kekulize`](crate::kekulize::kekulize) assigns one.
/// `Coordination` bonds (metal–ligand) consume no valence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondKind {
    #[default]
    Covalent,
    Delocalized,
    Coordination,
}

bitflags::bitflags! {
    /// Query constraints carried by bonds of a query fragment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BondQueryFeatures: u16 {
        const SINGLE = 0x0001;
        const DOUBLE = 0x0002;
        const TRIPLE = 0x0004;
        const DELOCALIZED = 0x0008;
        const RING = 0x0010;
        const NOT_RING = 0x0020;
        const AROMATIC = 0x0040;
        const NOT_AROMATIC = 0x0080;
        const MATCH_STEREO = 0x0100;
    }
}

impl Default for BondQueryFeatures {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub order: BondOrder,
    pub kind: BondKind,
    pub query_features: BondQueryFeatures,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn single() -> Self {
        Self::new(BondOrder::Single)
    }

    pub fn double() -> Self {
        Self::new(BondOrder::Double)
    }

    pub fn triple() -> Self {
        Self::new(BondOrder::Triple)
    }

    pub fn delocalized() -> Self {
        Self {
            kind: BondKind::Delocalized,
            ..Self::default()
        }
    }

    pub fn coordination() -> Self {
        Self {
            kind: BondKind::Coordination,
            ..Self::default()
        }
    }

    /// Pi bonds contributed by this bond (delocalized counts as one).
    pub fn pi_count(&self) -> u8 {
        match self.kind {
            BondKind::Covalent => self.order.as_u8() - 1,
            BondKind::Delocalized => 1,
            BondKind::Coordination => 0,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondKind for Bond {
    fn bond_kind(&self) -> BondKind {
        self.kind
    }
}
