//! Error types shared by the automaton builders and the scanner.

use thiserror::Error;

/// Failures raised while compiling token specifications or scanning input.
///
/// Every variant is terminal for the build or scan that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A token specification cannot be compiled (empty literal, empty union,
    /// duplicate kind, ...). Raised at build time only.
    #[error("specification error: {0}")]
    Specification(String),

    /// No token matches at `offset` and the character there is not whitespace.
    #[error("unrecognized character {ch:?} at offset {offset}")]
    UnrecognizedCharacter { ch: char, offset: usize },

    /// An identifier was matched in full but is longer than allowed.
    #[error("identifier {lexeme:?} at offset {offset} exceeds {max} characters")]
    IdentifierLength {
        lexeme: String,
        offset: usize,
        max: usize,
    },
}

impl LexError {
    pub(crate) fn spec(msg: impl Into<String>) -> Self {
        LexError::Specification(msg.into())
    }

    /// Byte offset of the offending input, if the error came from a scan.
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexError::Specification(_) => None,
            LexError::UnrecognizedCharacter { offset, .. }
            | LexError::IdentifierLength { offset, .. } => Some(*offset),
        }
    }
}

pub type Result<T> = std::result::Result<T, LexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_character_display() {
        let err = LexError::UnrecognizedCharacter { ch: '@', offset: 4 };
        assert_eq!(err.to_string(), "unrecognized character '@' at offset 4");
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn specification_error_has_no_offset() {
        let err = LexError::spec("empty literal for kind PLUS");
        assert_eq!(err.to_string(), "specification error: empty literal for kind PLUS");
        assert_eq!(err.offset(), None);
    }
}
