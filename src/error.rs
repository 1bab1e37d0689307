use thiserror::Error;

use crate::{automaton::AutomatonError, format::ParseError, regex::RegexError};

/// The error type returned by the public API.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct PublicError(#[from] pub ErrorRepr);

#[derive(Debug, Error)]
pub enum ErrorRepr {
    /// An error that occured while building or transforming an automaton.
    #[error("automaton error: {0}")]
    Automaton(AutomatonError),

    /// An error that occured while validating or compiling a regular expression.
    #[error("invalid regular expression: {0}")]
    Regex(RegexError),

    /// An error that occured while reading the text encoding of an automaton.
    #[error("failed to parse automaton file: {0}")]
    Parse(ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Resolve transitive conversion

impl From<AutomatonError> for PublicError {
    fn from(err: AutomatonError) -> Self {
        PublicError(ErrorRepr::Automaton(err))
    }
}

impl From<RegexError> for PublicError {
    fn from(err: RegexError) -> Self {
        PublicError(ErrorRepr::Regex(err))
    }
}

impl From<ParseError> for PublicError {
    fn from(err: ParseError) -> Self {
        PublicError(ErrorRepr::Parse(err))
    }
}

impl From<std::io::Error> for PublicError {
    fn from(err: std::io::Error) -> Self {
        PublicError(ErrorRepr::Io(err))
    }
}
