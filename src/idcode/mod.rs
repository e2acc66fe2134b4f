//! Canonical idcode strings.
//!
//! An idcode is a compact, printable, canonical encoding of a molecule's
//! constitution: two molecules get the same idcode exactly when they have
//! the same atoms, charges, isotopes and bonds, whatever the atom order or
//! the Kekulé structure of their aromatic rings.
//!
//! ```
//! use molkey::{to_idcode, Atom, Bond, Mol};
//!
//! let mut ethanol = Mol::<Atom, Bond>::new();
//! let c1 = ethanol.add_atom(Atom::new(6));
//! let c2 = ethanol.add_atom(Atom::new(6));
//! let o = ethanol.add_atom(Atom::new(8));
//! ethanol.add_bond(c1, c2, Bond::single());
//! ethanol.add_bond(c2, o, Bond::single());
//!
//! let mut reversed = Mol::<Atom, Bond>::new();
//! let o = reversed.add_atom(Atom::new(8));
//! let c2 = reversed.add_atom(Atom::new(6));
//! let c1 = reversed.add_atom(Atom::new(6));
//! reversed.add_bond(o, c2, Bond::single());
//! reversed.add_bond(c2, c1, Bond::single());
//!
//! assert_eq!(to_idcode(&ethanol), to_idcode(&reversed));
//! ```

mod bits;
mod decoder;
mod encoder;
pub mod error;
mod graph;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::options::PerceptionOptions;
pub use decoder::decode;
pub use encoder::IdCodeEncoder;
pub use error::IdCodeError;
pub use graph::LinearGraph;

/// A validated idcode string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdCode(String);

impl IdCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decodes into a molecule using the default options.
    pub fn to_mol(&self) -> Result<Mol<Atom, Bond>, IdCodeError> {
        decode(&self.0, &PerceptionOptions::default())
    }
}

impl fmt::Display for IdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IdCode {
    type Err = IdCodeError;

    /// Checks the character range only; structural errors surface when
    /// decoding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdCodeError::Empty);
        }
        if let Some((pos, ch)) = s.chars().enumerate().find(|&(_, ch)| !('@'..='\x7f').contains(&ch)) {
            return Err(IdCodeError::InvalidCharacter { pos, ch });
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for IdCode {
    type Error = IdCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IdCode> for String {
    fn from(code: IdCode) -> Self {
        code.0
    }
}

impl AsRef<str> for IdCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn to_idcode(mol: &Mol<Atom, Bond>) -> IdCode {
    to_idcode_with(mol, &PerceptionOptions::default())
}

pub fn to_idcode_with(mol: &Mol<Atom, Bond>, options: &PerceptionOptions) -> IdCode {
    IdCodeEncoder::new(mol, options).encode()
}

pub fn from_idcode(code: &str) -> Result<Mol<Atom, Bond>, IdCodeError> {
    decode(code, &PerceptionOptions::default())
}
