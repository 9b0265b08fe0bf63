//! Parse error types.

use thiserror::Error;

/// What went wrong while reading.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected closing quote {quote}")]
    UnterminatedString { quote: char },
    #[error("expected closing '{expected}'")]
    UnclosedList { expected: char },
    #[error("unexpected '{found}'")]
    UnexpectedClose { found: char },
    #[error("hash literal is empty")]
    EmptyHash,
    #[error("invalid numeric literal '{text}'")]
    InvalidNumber { text: String },
}

/// A read failure at a byte offset into the source.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}
