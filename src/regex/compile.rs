//! Thompson construction of automata from regular expressions.

use crate::{
    automaton::{Automaton, Label, State, Transition},
    options::Options,
};

use super::{Regex, RegexError};

/// Compiles regular expressions into automata.
///
/// The compiler owns the counter used to name fresh states, so that all states created by one compiler have unique names.
/// Sub-expressions are compiled into sub-automata between a given pair of states, which are then merged into the automaton of the enclosing expression.
pub struct Compiler<'a> {
    options: &'a Options,
    counter: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options, counter: 0 }
    }

    /// The number of states created so far.
    pub fn states_created(&self) -> usize {
        self.counter
    }

    /// Compiles the expression into an automaton with a single accepting state.
    /// The result usually contains epsilon transitions.
    pub fn compile(&mut self, re: &Regex) -> Result<Automaton, RegexError> {
        let first = self.fresh(false);
        let last = self.fresh(true);
        self.build(re, first, last)
    }

    fn fresh(&mut self, accepting: bool) -> State {
        let state = State::new(format!("{}{}", self.options.state_prefix, self.counter), accepting);
        self.counter += 1;
        state
    }

    /// Builds the automaton for `re`, reading from `first` to `last`.
    fn build(&mut self, re: &Regex, first: State, last: State) -> Result<Automaton, RegexError> {
        match re {
            Regex::Literal(label) => self.literal(*label, first, last),
            Regex::Concat(left, right) => {
                let middle = self.fresh(false);
                let mut a = frame(&[&first, &middle, &last]);
                let l = self.build(left, first, middle.clone())?;
                let r = self.build(right, middle, last)?;
                a.merge(l);
                a.merge(r);
                Ok(a)
            }
            Regex::Union(left, right) => {
                let top_left = self.fresh(false);
                let top_right = self.fresh(false);
                let bottom_left = self.fresh(false);
                let bottom_right = self.fresh(false);
                let mut a = frame(&[&first, &top_left, &top_right, &bottom_left, &bottom_right, &last]);
                a.add_transition(Transition::epsilon(first.name(), top_left.name()))?;
                a.add_transition(Transition::epsilon(top_right.name(), last.name()))?;
                a.add_transition(Transition::epsilon(first.name(), bottom_left.name()))?;
                a.add_transition(Transition::epsilon(bottom_right.name(), last.name()))?;
                let l = self.build(left, top_left, top_right)?;
                let r = self.build(right, bottom_left, bottom_right)?;
                a.merge(l);
                a.merge(r);
                Ok(a)
            }
            Regex::Star(inner) => {
                let loop_in = self.fresh(false);
                let loop_out = self.fresh(false);
                let mut a = frame(&[&first, &loop_in, &loop_out, &last]);
                // Skip, repeat, enter and exit
                a.add_transition(Transition::epsilon(first.name(), last.name()))?;
                a.add_transition(Transition::epsilon(loop_out.name(), loop_in.name()))?;
                a.add_transition(Transition::epsilon(first.name(), loop_in.name()))?;
                a.add_transition(Transition::epsilon(loop_out.name(), last.name()))?;
                let sub = self.build(inner, loop_in, loop_out)?;
                a.merge(sub);
                Ok(a)
            }
        }
    }

    fn literal(&mut self, label: Label, first: State, last: State) -> Result<Automaton, RegexError> {
        if let Label::Symbol(c) = label {
            if c.is_whitespace() {
                return Err(RegexError::EmptyLiteral);
            }
        }
        let mut a = frame(&[&first, &last]);
        a.add_transition(Transition::new(first.name(), last.name(), label))?;
        Ok(a)
    }
}

/// Creates an automaton without transitions containing the given states, the first of which is the start state.
fn frame(states: &[&State]) -> Automaton {
    let mut a = Automaton::new();
    for s in states {
        a.ensure_state((*s).clone());
    }
    a
}
