pub mod atom;
pub mod bitset;
pub mod bond;
pub mod canonical;
pub mod element;
pub mod graph_ops;
pub mod helpers;
pub mod idcode;
pub mod kekulize;
pub mod mol;
pub mod options;
pub mod rings;
pub mod traits;
pub mod valence;

pub use atom::{Atom, AtomQueryFeatures, Radical};
pub use bitset::BitSet;
pub use bond::{Bond, BondKind, BondOrder, BondQueryFeatures};
pub use canonical::canonical_ranks;
pub use element::Element;
pub use graph_ops::{connected_components, renumber_atoms, renumber_atoms_canonical, RenumberError};
pub use helpers::Neighbours;
pub use idcode::{from_idcode, to_idcode, to_idcode_with, IdCode, IdCodeEncoder, IdCodeError, LinearGraph};
pub use kekulize::{kekulize, Resolution};
pub use mol::Mol;
pub use options::{PerceptionOptions, RingMode};
pub use rings::{Ring, RingCollection};
pub use traits::{HasAtomicNum, HasBondKind, HasBondOrder, HasFormalCharge, HasIsotope, HasPiBond, HasPlainHydrogen, HasRadical};

#[cfg(test)]
mod fixtures;
