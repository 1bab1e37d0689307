//! Construction, classification and transformation of finite automata.
//!
//! Automata are built programmatically, read from the text encoding in [`format::text`] or compiled from regular expressions in prefix notation (see [`regex`]).
//! Given an automaton, the crate decides acceptance of words, whether it is deterministic, whether its language is finite (and if so, lists it),
//! removes epsilon transitions and converts it into a deterministic automaton.

pub mod automaton;
mod error;
pub mod format;
mod options;
pub mod regex;

pub use automaton::{Automaton, AutomatonError, Label, State, Transition};
pub use error::{ErrorRepr, PublicError};
pub use format::{dot::to_dot, text::AutomatonFile, ParseError};
pub use options::Options;
pub use regex::{Regex, RegexError};

/// Compiles a regular expression and, if `determinize` is set, removes the epsilon transitions and converts the result into a DFA.
pub fn compile_regex(input: &str, determinize: bool, options: &Options) -> Result<Automaton, PublicError> {
    let mut automaton = regex::compile(input, options)?;
    log::debug!("Compiled '{}' into automaton with {} states", input, automaton.num_states());
    if determinize {
        automaton.remove_epsilon_transitions();
        automaton = automaton.determinize(options)?;
    }
    Ok(automaton)
}

/// Reads an automaton file, removes its epsilon transitions and converts it into a DFA.
pub fn determinize_file(path: impl AsRef<std::path::Path>, options: &Options) -> Result<Automaton, PublicError> {
    let mut file = AutomatonFile::from_path(path)?;
    file.automaton.remove_epsilon_transitions();
    Ok(file.automaton.determinize(options)?)
}
