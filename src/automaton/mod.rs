//! The automaton model.
//!
//! An [`Automaton`] owns an insertion-ordered set of [`State`]s, keyed by their name, an explicit start state,
//! an ordered list of [`Transition`]s and the alphabet of symbols it reads.
//! The algorithms operating on automata live in the submodules and are exposed as methods on [`Automaton`].

mod accept;
mod classify;
mod determinize;
mod epsilon;

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
};

use indexmap::{IndexMap, IndexSet};

pub use classify::Classification;

/// The character used to denote the empty word in all textual forms.
pub const EPSILON_MARKER: char = '_';

/// The error type that can occur when building or transforming automata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("State {0} already exists")]
    DuplicateState(String),

    #[error("Unknown state {0}")]
    UnknownState(String),

    #[error("Push-down transitions are not supported ({0})")]
    UnsupportedStackTransition(Transition),

    #[error("The automaton has no start state")]
    NoStartState,
}

/// A state of an automaton.
/// States are identified by their name, two states with the same name are the same state.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    accepting: bool,
}

impl State {
    pub fn new(name: impl Into<String>, accepting: bool) -> Self {
        Self {
            name: name.into(),
            accepting,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The label of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Reads exactly the given symbol.
    Symbol(char),
    /// Reads nothing.
    Epsilon,
}

impl Label {
    /// Converts a character into a label, mapping the [`EPSILON_MARKER`] to [`Label::Epsilon`].
    pub fn from_char(c: char) -> Self {
        if c == EPSILON_MARKER {
            Label::Epsilon
        } else {
            Label::Symbol(c)
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns the symbol read by this label, or `None` for epsilon.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Label::Symbol(c) => Some(*c),
            Label::Epsilon => None,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Symbol(c) => write!(f, "{}", c),
            Label::Epsilon => write!(f, "{}", EPSILON_MARKER),
        }
    }
}

/// Distinguishes plain finite-automaton transitions from push-down transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Plain,
    /// Pops `pop` from and pushes `push` onto the stack.
    /// None of the algorithms handle this kind, automata refuse to store it.
    Stack { pop: Label, push: Label },
}

/// A labeled edge between two states, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    source: String,
    target: String,
    label: Label,
    kind: TransitionKind,
}

impl Transition {
    pub fn new(source: impl Into<String>, target: impl Into<String>, label: Label) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label,
            kind: TransitionKind::Plain,
        }
    }

    pub fn epsilon(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, Label::Epsilon)
    }

    pub fn with_stack(
        source: impl Into<String>,
        target: impl Into<String>,
        label: Label,
        pop: Label,
        push: Label,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label,
            kind: TransitionKind::Stack { pop, push },
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TransitionKind::Plain => write!(f, "{},{} --> {}", self.source, self.label, self.target),
            TransitionKind::Stack { pop, push } => write!(
                f,
                "{},{} [{},{}] --> {}",
                self.source, self.label, pop, push, self.target
            ),
        }
    }
}

/// A finite automaton.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    alphabet: BTreeSet<char>,
    states: IndexMap<String, State>,
    start: Option<String>,
    transitions: Vec<Transition>,

    /// Classification computed by [`Automaton::classify`], cleared on every mutation.
    classification: Option<Classification>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new state.
    /// The first state added to an automaton without a start state becomes the start state.
    pub fn add_state(&mut self, name: impl Into<String>, accepting: bool) -> Result<(), AutomatonError> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(AutomatonError::DuplicateState(name));
        }
        self.insert_state(State::new(name, accepting));
        Ok(())
    }

    /// Adds the state if no state with the same name exists.
    /// Otherwise the existing state becomes accepting if the given one is.
    pub(crate) fn ensure_state(&mut self, state: State) {
        match self.states.get_mut(&state.name) {
            Some(existing) => existing.accepting |= state.accepting,
            None => self.insert_state(state),
        }
        self.classification = None;
    }

    fn insert_state(&mut self, state: State) {
        if self.start.is_none() {
            self.start = Some(state.name.clone());
        }
        self.states.insert(state.name.clone(), state);
        self.classification = None;
    }

    pub fn set_accepting(&mut self, name: &str, accepting: bool) -> Result<(), AutomatonError> {
        let state = self
            .states
            .get_mut(name)
            .ok_or_else(|| AutomatonError::UnknownState(name.to_string()))?;
        state.accepting = accepting;
        self.classification = None;
        Ok(())
    }

    pub fn set_start(&mut self, name: &str) -> Result<(), AutomatonError> {
        if !self.states.contains_key(name) {
            return Err(AutomatonError::UnknownState(name.to_string()));
        }
        self.start = Some(name.to_string());
        self.classification = None;
        Ok(())
    }

    pub fn start(&self) -> Option<&State> {
        self.start.as_ref().and_then(|s| self.states.get(s))
    }

    pub fn start_name(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn is_accepting(&self, name: &str) -> bool {
        self.states.get(name).map(State::is_accepting).unwrap_or(false)
    }

    /// Returns the states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Adds a symbol to the alphabet. The epsilon marker is ignored.
    pub fn add_symbol(&mut self, symbol: char) {
        if symbol != EPSILON_MARKER {
            self.alphabet.insert(symbol);
            self.classification = None;
        }
    }

    /// The sorted alphabet of the automaton.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// The sorted set of symbols that actually occur on transitions.
    pub fn used_symbols(&self) -> BTreeSet<char> {
        self.transitions.iter().filter_map(|t| t.label.symbol()).collect()
    }

    /// Adds a transition between two existing states.
    /// The symbol of the transition is added to the alphabet.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), AutomatonError> {
        if let TransitionKind::Stack { .. } = transition.kind {
            return Err(AutomatonError::UnsupportedStackTransition(transition));
        }
        for endpoint in [&transition.source, &transition.target] {
            if !self.states.contains_key(endpoint) {
                return Err(AutomatonError::UnknownState(endpoint.clone()));
            }
        }
        if let Label::Symbol(c) = transition.label {
            self.alphabet.insert(c);
        }
        self.transitions.push(transition);
        self.classification = None;
        Ok(())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn has_transition(&self, source: &str, target: &str, label: Label) -> bool {
        self.transitions
            .iter()
            .any(|t| t.source == source && t.target == target && t.label == label)
    }

    /// Transitions leaving the given state, in insertion order.
    pub fn outgoing<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.source == name)
    }

    /// Transitions entering the given state, in insertion order.
    pub fn incoming<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.target == name)
    }

    /// Epsilon transitions leaving the given state.
    pub fn epsilon_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> + 'a {
        self.outgoing(name).filter(|t| t.is_epsilon())
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// Returns true if the automaton has transitions and all of them are epsilon transitions.
    /// Such an automaton does not describe a usable language.
    pub fn only_epsilon_transitions(&self) -> bool {
        !self.transitions.is_empty() && self.transitions.iter().all(Transition::is_epsilon)
    }

    /// Returns the states reachable from `name` using only epsilon transitions, including `name` itself.
    /// The states are returned in the order they are discovered.
    /// Epsilon cycles are handled.
    pub fn epsilon_closure<'a>(&'a self, name: &'a str) -> IndexSet<&'a str> {
        let mut closure = IndexSet::new();
        let mut stack = vec![name];
        while let Some(current) = stack.pop() {
            if !closure.insert(current) {
                continue;
            }
            for t in self.epsilon_from(current) {
                if !closure.contains(t.target()) {
                    stack.push(t.target());
                }
            }
        }
        closure
    }

    /// Merges the states, transitions and alphabet of `other` into this automaton.
    /// States with the same name are identified.
    /// The start state of this automaton is kept.
    pub fn merge(&mut self, other: Automaton) {
        for state in other.states.into_values() {
            self.ensure_state(state);
        }
        self.transitions.extend(other.transitions);
        self.alphabet.extend(other.alphabet);
        self.classification = None;
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::text::write_automaton(self))
    }
}
