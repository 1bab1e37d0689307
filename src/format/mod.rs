//! Textual representations of automata.

pub mod dot;
pub mod text;

use thiserror::Error;

use crate::automaton::AutomatonError;

/// Errors that occur while reading the text encoding of an automaton.
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unknown state '{name}'")]
    UnknownState { line: usize, name: String },

    #[error("line {line}: expected 'y' or 'n', found '{found}'")]
    InvalidFlag { line: usize, found: String },

    #[error("line {line}: {source}")]
    Automaton { line: usize, source: AutomatonError },

    #[error("block opened at line {0} is not closed by 'end.'")]
    Unterminated(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }
}
