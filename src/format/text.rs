//! The line-based text encoding of automata and their test vectors.
//!
//! ```text
//! alphabet: ab
//! states: A,B,C
//! final: C
//! transitions:
//! A,a --> B
//! B,_ --> C
//! end.
//!
//! words:
//! a,y
//! ,n
//! end.
//!
//! dfa:n
//! finite:y
//! ```
//!
//! Keys are case-insensitive, blank lines are ignored and lines starting with `#` are comments.
//! The first listed state is the start state.

use std::{fmt::Write, path::Path, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::automaton::{Automaton, Label, Transition, EPSILON_MARKER};

use super::ParseError;

const END: &str = "end.";
const ARROW: &str = "-->";

/// A parsed automaton file: the automaton together with the expected results stored next to it.
#[derive(Debug, Clone, Default)]
pub struct AutomatonFile {
    pub automaton: Automaton,
    /// Test words mapped to whether they are expected to be accepted.
    pub words: IndexMap<String, bool>,
    /// Whether the automaton is expected to be a DFA.
    pub dfa: Option<bool>,
    /// Whether the automaton is expected to accept finitely many words.
    pub finite: Option<bool>,
}

/// An expected value next to the computed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check<T> {
    pub expected: T,
    pub actual: bool,
}

impl Check<bool> {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

impl Check<Option<bool>> {
    /// A check without an expectation always passes.
    pub fn passed(&self) -> bool {
        self.expected.map_or(true, |e| e == self.actual)
    }
}

/// The result of comparing the test vectors of an [`AutomatonFile`] against the algorithms.
#[derive(Debug, Clone)]
pub struct Report {
    pub words: Vec<(String, Check<bool>)>,
    pub dfa: Check<Option<bool>>,
    pub finite: Check<Option<bool>>,
    /// The accepted words, if there are finitely many.
    pub finite_words: Option<IndexSet<String>>,
}

impl Report {
    /// The number of vectors that disagree with the computed results.
    pub fn mismatches(&self) -> usize {
        let words = self.words.iter().filter(|(_, c)| !c.passed()).count();
        words + usize::from(!self.dfa.passed()) + usize::from(!self.finite.passed())
    }

    pub fn is_ok(&self) -> bool {
        self.mismatches() == 0
    }
}

impl AutomatonFile {
    /// Wraps an automaton without any test vectors.
    pub fn new(automaton: Automaton) -> Self {
        Self {
            automaton,
            ..Default::default()
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let input = std::fs::read_to_string(path)?;
        input.parse()
    }

    /// Runs every test vector against the automaton.
    pub fn check(&self) -> Report {
        let a = &self.automaton;
        let words = self
            .words
            .iter()
            .map(|(w, expected)| {
                let check = Check {
                    expected: *expected,
                    actual: a.accepts(w),
                };
                (w.clone(), check)
            })
            .collect_vec();
        let finite = a.is_finite();
        Report {
            words,
            dfa: Check {
                expected: self.dfa,
                actual: a.is_dfa(),
            },
            finite: Check {
                expected: self.finite,
                actual: finite,
            },
            finite_words: if finite { Some(a.finite_words()) } else { None },
        }
    }

    /// Writes the file in the text encoding.
    /// The classification vectors are computed from the automaton, not copied from the expectations.
    /// Test words starting with `#` cannot be represented and are left out.
    pub fn to_text(&self) -> String {
        let mut out = write_automaton(&self.automaton);
        out.push_str("\nwords:\n");
        for (word, accepted) in &self.words {
            if word.starts_with('#') {
                log::warn!("Test word '{}' would be read back as a comment, not writing it", word);
                continue;
            }
            let _ = writeln!(out, "{},{}", word, flag(*accepted));
        }
        out.push_str(END);
        out.push('\n');
        let _ = writeln!(out, "\ndfa:{}", flag(self.automaton.is_dfa()));
        let _ = writeln!(out, "finite:{}", flag(self.automaton.is_finite()));
        out
    }
}

impl FromStr for AutomatonFile {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[derive(Clone, Copy)]
enum Section {
    Header,
    /// Opened at the given line.
    Transitions(usize),
    Words(usize),
}

/// Parses an automaton file.
pub fn parse(input: &str) -> Result<AutomatonFile, ParseError> {
    let mut file = AutomatonFile::default();
    let mut section = Section::Header;

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match section {
            Section::Transitions(_) | Section::Words(_) if line.eq_ignore_ascii_case(END) => {
                section = Section::Header;
            }
            Section::Transitions(_) => {
                let transition = parse_transition(line, line_no)?;
                file.automaton
                    .add_transition(transition)
                    .map_err(|source| ParseError::Automaton { line: line_no, source })?;
            }
            Section::Words(_) => {
                let (word, accepted) = line
                    .rsplit_once(',')
                    .ok_or_else(|| ParseError::syntax(line_no, format!("expected '<word>,<y|n>', found '{}'", line)))?;
                let word = word.trim();
                let accepted = parse_flag(accepted, line_no)?;
                match file.words.get(word) {
                    Some(&previous) if previous != accepted => {
                        return Err(ParseError::syntax(
                            line_no,
                            format!("conflicting expectations for word '{}'", word),
                        ));
                    }
                    Some(_) => log::warn!("line {}: duplicate test word '{}'", line_no, word),
                    None => {
                        file.words.insert(word.to_string(), accepted);
                    }
                }
            }
            Section::Header => {
                let (key, value) = line
                    .split_once(':')
                    .ok_or_else(|| ParseError::syntax(line_no, format!("expected '<key>:<value>', found '{}'", line)))?;
                let value = value.trim();
                match key.trim().to_ascii_lowercase().as_str() {
                    "alphabet" => value
                        .chars()
                        .filter(|c| !c.is_whitespace() && *c != ',' && *c != EPSILON_MARKER)
                        .for_each(|c| file.automaton.add_symbol(c)),
                    "states" => {
                        for name in list(value) {
                            file.automaton
                                .add_state(name, false)
                                .map_err(|source| ParseError::Automaton { line: line_no, source })?;
                        }
                    }
                    "final" => {
                        for name in list(value) {
                            if !file.automaton.contains_state(name) {
                                return Err(ParseError::UnknownState {
                                    line: line_no,
                                    name: name.to_string(),
                                });
                            }
                            file.automaton
                                .set_accepting(name, true)
                                .map_err(|source| ParseError::Automaton { line: line_no, source })?;
                        }
                    }
                    "transitions" => section = Section::Transitions(line_no),
                    "words" => section = Section::Words(line_no),
                    "dfa" => file.dfa = Some(parse_flag(value, line_no)?),
                    "finite" => file.finite = Some(parse_flag(value, line_no)?),
                    other => return Err(ParseError::syntax(line_no, format!("unknown key '{}'", other))),
                }
            }
        }
    }

    match section {
        Section::Header => Ok(file),
        Section::Transitions(opened) | Section::Words(opened) => Err(ParseError::Unterminated(opened)),
    }
}

/// Splits a comma separated list, skipping empty entries.
fn list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_flag(value: &str, line: usize) -> Result<bool, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(ParseError::InvalidFlag {
            line,
            found: value.trim().to_string(),
        }),
    }
}

fn parse_label(value: &str, line: usize) -> Result<Label, ParseError> {
    let value = value.trim();
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Label::from_char(c)),
        _ => Err(ParseError::syntax(
            line,
            format!("expected a single symbol or '{}', found '{}'", EPSILON_MARKER, value),
        )),
    }
}

/// Parses `<source>,<label> --> <target>` or `<source>,<label> [<pop>,<push>] --> <target>`.
fn parse_transition(line: &str, line_no: usize) -> Result<Transition, ParseError> {
    let (lhs, target) = line
        .split_once(ARROW)
        .ok_or_else(|| ParseError::syntax(line_no, format!("missing '{}' in transition '{}'", ARROW, line)))?;
    let target = target.trim();
    let (lhs, stack) = match lhs.split_once('[') {
        Some((lhs, stack)) => {
            let (pop, push) = stack
                .trim()
                .strip_suffix(']')
                .and_then(|s| s.split_once(','))
                .ok_or_else(|| ParseError::syntax(line_no, "expected '[<pop>,<push>]'"))?;
            (lhs, Some((parse_label(pop, line_no)?, parse_label(push, line_no)?)))
        }
        None => (lhs, None),
    };
    let (source, label) = lhs
        .split_once(',')
        .ok_or_else(|| ParseError::syntax(line_no, format!("expected '<state>,<symbol>', found '{}'", lhs.trim())))?;
    let (source, label) = (source.trim(), parse_label(label, line_no)?);
    if source.is_empty() || target.is_empty() {
        return Err(ParseError::syntax(line_no, "transition without source or target"));
    }
    Ok(match stack {
        Some((pop, push)) => Transition::with_stack(source, target, label, pop, push),
        None => Transition::new(source, target, label),
    })
}

fn flag(value: bool) -> char {
    if value {
        'y'
    } else {
        'n'
    }
}

/// Writes the alphabet, states, accepting states and transitions of the automaton.
pub fn write_automaton(automaton: &Automaton) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "alphabet: {}", automaton.alphabet().iter().collect::<String>());
    let _ = writeln!(out, "states: {}", automaton.states().map(|s| s.name()).join(","));
    let _ = writeln!(
        out,
        "final: {}",
        automaton.states().filter(|s| s.is_accepting()).map(|s| s.name()).join(",")
    );
    out.push_str("transitions:\n");
    for t in automaton.transitions() {
        let _ = writeln!(out, "{}", t);
    }
    out.push_str(END);
    out.push('\n');
    out
}
