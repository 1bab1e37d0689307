//! Structural classification of automata.

use indexmap::IndexSet;
use itertools::Itertools;

use super::Automaton;

/// The result of classifying an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether the automaton is a (complete) DFA.
    pub dfa: bool,
    /// Whether the language of the automaton is finite.
    pub finite: bool,
}

impl Automaton {
    /// Checks whether the automaton is a complete deterministic automaton.
    /// That is, no transition reads epsilon and every state has exactly one outgoing transition for every symbol of the alphabet.
    pub fn is_dfa(&self) -> bool {
        if self.has_epsilon_transitions() {
            return false;
        }
        self.states().all(|s| self.is_dfa_state(s.name()))
    }

    fn is_dfa_state(&self, name: &str) -> bool {
        let labels = self
            .outgoing(name)
            .filter_map(|t| t.label().symbol())
            .sorted()
            .collect_vec();
        if labels.len() != self.alphabet.len() {
            return false;
        }
        // The alphabet is a sorted set
        labels.iter().eq(self.alphabet.iter())
    }

    /// Checks whether the language of the automaton is finite.
    ///
    /// An automaton that is a DFA is never considered finite, since a complete DFA always contains a loop.
    /// Otherwise, the automaton is traversed depth-first from the start state and the language is infinite iff some path revisits a state.
    /// Only loops along a single path count, states shared between sibling branches are not loops.
    pub fn is_finite(&self) -> bool {
        let dfa = match self.classification {
            Some(c) => c.dfa,
            None => self.is_dfa(),
        };
        self.is_finite_with(dfa)
    }

    /// Finiteness check for an automaton already known to be (or not be) a DFA.
    fn is_finite_with(&self, dfa: bool) -> bool {
        if dfa {
            return false;
        }
        match self.start_name() {
            Some(start) => {
                let mut path = IndexSet::new();
                !self.has_loop_from(start, &mut path)
            }
            None => true,
        }
    }

    fn has_loop_from<'a>(&'a self, state: &'a str, path: &mut IndexSet<&'a str>) -> bool {
        path.insert(state);
        for t in self.outgoing(state) {
            if path.contains(t.target()) {
                log::debug!("Found loop at transition {}", t);
                return true;
            }
            if self.has_loop_from(t.target(), path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Enumerates the words of a finite language, in the order they are found.
    ///
    /// The automaton must be finite (see [`Automaton::is_finite`]).
    /// On an automaton with an infinite language this does not terminate.
    pub fn finite_words(&self) -> IndexSet<String> {
        debug_assert!(self.is_finite(), "finite_words called on an infinite language");
        let mut words = IndexSet::new();
        if let Some(start) = self.start_name() {
            let mut prefix = String::new();
            self.collect_words(start, &mut prefix, &mut words);
        }
        words
    }

    fn collect_words(&self, state: &str, prefix: &mut String, words: &mut IndexSet<String>) {
        if self.is_accepting(state) {
            words.insert(prefix.clone());
        }
        for t in self.outgoing(state) {
            let symbol = t.label().symbol();
            if let Some(c) = symbol {
                prefix.push(c);
            }
            self.collect_words(t.target(), prefix, words);
            if symbol.is_some() {
                prefix.pop();
            }
        }
    }

    /// Classifies the automaton and caches the result until the next mutation.
    pub fn classify(&mut self) -> Classification {
        if let Some(c) = self.classification {
            return c;
        }
        let dfa = self.is_dfa();
        let classification = Classification {
            dfa,
            finite: self.is_finite_with(dfa),
        };
        log::debug!(
            "Classified automaton: dfa = {}, finite = {}",
            classification.dfa,
            classification.finite
        );
        self.classification = Some(classification);
        classification
    }

    /// Returns the classification computed by the last call of [`Automaton::classify`], if still valid.
    pub fn cached_classification(&self) -> Option<Classification> {
        self.classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{tests::automaton, Label, Transition};

    fn complete_dfa() -> Automaton {
        automaton(
            &[("A", false), ("B", true)],
            &[("A", 'a', "B"), ("A", 'b', "A"), ("B", 'a', "B"), ("B", 'b', "A")],
        )
    }

    #[test]
    fn dfa_one_transition_per_symbol() {
        assert!(complete_dfa().is_dfa());
    }

    #[test]
    fn dfa_missing_transition() {
        let a = automaton(
            &[("A", false), ("B", true)],
            &[("A", 'a', "B"), ("A", 'b', "A"), ("B", 'a', "B")],
        );
        assert!(!a.is_dfa());
    }

    #[test]
    fn dfa_duplicate_symbol() {
        let a = automaton(
            &[("A", false), ("B", true)],
            &[("A", 'a', "B"), ("A", 'a', "A"), ("B", 'a', "B"), ("B", 'b', "A")],
        );
        assert!(!a.is_dfa());
    }

    #[test]
    fn dfa_rejects_epsilon() {
        let mut a = complete_dfa();
        a.add_transition(Transition::new("A", "B", Label::Epsilon)).unwrap();
        assert!(!a.is_dfa());
    }

    #[test]
    fn dfa_is_never_finite() {
        assert!(!complete_dfa().is_finite());
    }

    #[test]
    fn finite_chain() {
        let a = automaton(
            &[("A", false), ("B", true), ("C", true)],
            &[("A", 'a', "B"), ("B", 'b', "C")],
        );
        assert!(a.is_finite());
        let words = a.finite_words();
        assert_eq!(words.into_iter().collect_vec(), vec!["a", "ab"]);
    }

    #[test]
    fn self_loop_is_infinite() {
        let a = automaton(&[("A", false), ("B", true)], &[("A", 'a', "B"), ("B", 'b', "B")]);
        assert!(!a.is_finite());
    }

    #[test]
    fn epsilon_loop_is_infinite() {
        let a = automaton(
            &[("A", false), ("B", true)],
            &[("A", 'a', "B"), ("B", '_', "A")],
        );
        assert!(!a.is_finite());
    }

    #[test]
    fn diamond_is_finite() {
        // Two branches join in D, which is not a loop
        let a = automaton(
            &[("A", false), ("B", false), ("C", false), ("D", true)],
            &[("A", 'a', "B"), ("A", 'b', "C"), ("B", 'c', "D"), ("C", 'c', "D")],
        );
        assert!(a.is_finite());
        let words = a.finite_words();
        assert_eq!(words.into_iter().collect_vec(), vec!["ac", "bc"]);
    }

    #[test]
    fn finite_words_deduplicated() {
        let a = automaton(
            &[("A", false), ("B", true), ("C", true)],
            &[("A", 'a', "B"), ("A", 'a', "C")],
        );
        assert_eq!(a.finite_words().len(), 1);
    }

    #[test]
    fn finite_words_epsilon_and_empty_word() {
        let a = automaton(
            &[("A", true), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", 'x', "C")],
        );
        let words = a.finite_words();
        assert!(words.contains(""));
        assert!(words.contains("x"));
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn unreachable_loop_ignored() {
        let a = automaton(
            &[("A", false), ("B", true), ("C", false)],
            &[("A", 'a', "B"), ("C", 'a', "C")],
        );
        assert!(a.is_finite());
    }

    #[test]
    fn classification_is_cached_and_invalidated() {
        let mut a = automaton(&[("A", false), ("B", true)], &[("A", 'a', "B")]);
        assert_eq!(a.cached_classification(), None);
        let c = a.classify();
        assert_eq!(
            c,
            Classification {
                dfa: false,
                finite: true
            }
        );
        assert_eq!(a.cached_classification(), Some(c));
        a.add_transition(Transition::new("B", "A", Label::Symbol('a')))
            .unwrap();
        assert_eq!(a.cached_classification(), None);
        assert!(!a.classify().finite);
    }

    #[test]
    fn classify_agrees_with_single_checks() {
        let samples = [
            complete_dfa(),
            automaton(&[("A", false), ("B", true)], &[("A", 'a', "B")]),
            automaton(&[("A", false), ("B", true)], &[("A", 'a', "B"), ("B", 'b', "B")]),
            automaton(&[("A", true)], &[("A", '_', "A")]),
        ];
        for mut a in samples {
            let (dfa, finite) = (a.is_dfa(), a.is_finite());
            let c = a.classify();
            assert_eq!((c.dfa, c.finite), (dfa, finite));
            assert_eq!(a.is_finite(), finite);
        }
    }
}
