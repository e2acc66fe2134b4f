use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Unpaired-electron state of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Radical {
    #[default]
    None,
    Singlet,
    Doublet,
    Triplet,
}

impl Radical {
    pub fn code(self) -> u8 {
        match self {
            Radical::None => 0,
            Radical::Singlet => 1,
            Radical::Doublet => 2,
            Radical::Triplet => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Radical> {
        match code {
            0 => Some(Radical::None),
            1 => Some(Radical::Singlet),
            2 => Some(Radical::Doublet),
            3 => Some(Radical::Triplet),
            _ => None,
        }
    }

    /// Number of valences consumed by the radical state.
    pub fn valence_loss(self) -> u8 {
        match self {
            Radical::None => 0,
            Radical::Doublet => 1,
            Radical::Singlet | Radical::Triplet => 2,
        }
    }
}

bitflags::bitflags! {
    /// Query constraints carried by atoms of a query fragment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AtomQueryFeatures: u32 {
        const AROMATIC = 0x0001;
        const NOT_AROMATIC = 0x0002;
        const MORE_NEIGHBOURS = 0x0004;
        const NO_MORE_NEIGHBOURS = 0x0008;
        const NOT_CHAIN = 0x0010;
        const RING_SIZE_3 = 0x0020;
        const RING_SIZE_4 = 0x0040;
        const RING_SIZE_5 = 0x0080;
        const RING_SIZE_6 = 0x0100;
        const RING_SIZE_7 = 0x0200;
        const NOT_0_HYDROGEN = 0x0400;
        const NOT_1_HYDROGEN = 0x0800;
        const NOT_2_HYDROGEN = 0x1000;
        const NOT_3_HYDROGEN = 0x2000;
        const NOT_CHARGED = 0x4000;
        const MATCH_STEREO = 0x8000;
        const EXCLUDE_GROUP = 0x0001_0000;
    }
}

impl Default for AtomQueryFeatures {
    fn default() -> Self {
        Self::empty()
    }
}

/// Default atom type for a molecular graph node.
///
/// `Atom` stores the intrinsic properties that identify an atom in the
/// canonical encoding. Hydrogens are implicit unless present as explicit
/// graph nodes; the implicit count is derived from the default valence of
/// the element or from [`abnormal_valence`](Atom::abnormal_valence).
///
/// # Examples
///
/// ```
/// use molkey::Atom;
///
/// let nitrogen = Atom::new(7);
/// assert_eq!(nitrogen.atomic_num, 7);
/// assert!(!nitrogen.is_query());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// Atomic number. `0` is the "any atom" placeholder used by queries.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units. Ranking and idcodes only
    /// distinguish `-8..=7`; larger charges are clamped into that range.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    pub radical: Radical,
    /// Explicit valence overriding the element's default valence.
    pub abnormal_valence: Option<u8>,
    /// R-group number (1-based); `0` for ordinary atoms.
    pub rgroup: u8,
    /// Allowed atomic numbers of an atom-list query atom, ascending.
    pub atom_list: Vec<u8>,
    pub query_features: AtomQueryFeatures,
}

impl Atom {
    pub fn new(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            ..Self::default()
        }
    }

    pub fn with_charge(atomic_num: u8, formal_charge: i8) -> Self {
        Self {
            atomic_num,
            formal_charge,
            ..Self::default()
        }
    }

    pub fn element(&self) -> Option<Element> {
        Element::from_atomic_num(self.atomic_num)
    }

    /// Whether the atom carries any query-only information.
    pub fn is_query(&self) -> bool {
        !self.atom_list.is_empty() || !self.query_features.is_empty() || self.atomic_num == 0
    }

    /// A plain hydrogen that may be folded into its neighbour's implicit count.
    pub fn is_plain_hydrogen(&self) -> bool {
        self.atomic_num == 1
            && self.isotope == 0
            && self.formal_charge == 0
            && self.radical == Radical::None
            && self.abnormal_valence.is_none()
            && !self.is_query()
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> u16 {
        self.isotope
    }
}

impl crate::traits::HasRadical for Atom {
    fn radical(&self) -> Radical {
        self.radical
    }
}

impl crate::traits::HasPlainHydrogen for Atom {
    fn is_plain_hydrogen(&self) -> bool {
        Atom::is_plain_hydrogen(self)
    }
}
