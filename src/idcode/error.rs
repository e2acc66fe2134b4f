use thiserror::Error;

/// Errors produced when reading an idcode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdCodeError {
    /// The input string was empty or contained only whitespace.
    #[error("empty idcode")]
    Empty,
    /// A character outside `'@'..='\x7f'` was found.
    #[error("invalid character {ch:?} at position {pos}")]
    InvalidCharacter { pos: usize, ch: char },
    #[error("unsupported idcode version {0}")]
    UnsupportedVersion(u8),
    /// The bit stream ended inside a field.
    #[error("idcode ended unexpectedly")]
    Truncated,
    /// An atom or bond reference points past the declared counts.
    #[error("{what} index {index} out of range (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },
    /// The declared bond count is smaller than the spanning tree needs.
    #[error("bond count {bonds} is smaller than the {tree} tree bonds")]
    BondCountMismatch { bonds: usize, tree: usize },
    #[error("unknown extension tag {0}")]
    UnknownExtension(u8),
    /// A field value outside its legal range.
    #[error("invalid {what} value {value}")]
    InvalidValue { what: &'static str, value: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = IdCodeError::IndexOutOfRange {
            what: "atom",
            index: 12,
            limit: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("atom"));
        assert!(msg.contains("12"));
        assert_eq!(
            IdCodeError::InvalidCharacter { pos: 3, ch: '!' }.to_string(),
            "invalid character '!' at position 3"
        );
    }
}
