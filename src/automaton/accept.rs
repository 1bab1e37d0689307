//! Word membership.

use indexmap::IndexSet;

use super::{Automaton, Label};

impl Automaton {
    /// Checks whether the automaton accepts the given word.
    ///
    /// Performs an exhaustive backtracking search from the start state.
    /// Symbol transitions consume the next symbol of the word, epsilon transitions consume nothing.
    /// States entered by epsilon moves since the last consumed symbol are remembered, so that epsilon cycles do not cause non-termination.
    pub fn accepts(&self, word: &str) -> bool {
        let word: Vec<char> = word.chars().collect();
        match self.start_name() {
            Some(start) => {
                let mut epsilon_path = IndexSet::new();
                self.accepts_from(start, &word, &mut epsilon_path)
            }
            None => false,
        }
    }

    fn accepts_from<'a>(&'a self, state: &'a str, word: &[char], epsilon_path: &mut IndexSet<&'a str>) -> bool {
        if word.is_empty() && self.is_accepting(state) {
            return true;
        }
        if !epsilon_path.insert(state) {
            // Already visited on the current epsilon chain
            return false;
        }

        let accepted = self.outgoing(state).any(|t| match t.label() {
            Label::Epsilon => self.accepts_from(t.target(), word, epsilon_path),
            Label::Symbol(c) if word.first() == Some(&c) => {
                let mut fresh = IndexSet::new();
                self.accepts_from(t.target(), &word[1..], &mut fresh)
            }
            Label::Symbol(_) => false,
        });

        epsilon_path.pop();
        accepted
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use crate::automaton::{tests::automaton, Automaton};

    fn ends_with_ab() -> Automaton {
        automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[
                ("A", 'a', "A"),
                ("A", 'b', "A"),
                ("A", 'a', "B"),
                ("B", 'b', "C"),
            ],
        )
    }

    #[test]
    fn nondeterministic_choice() {
        let a = ends_with_ab();
        assert!(a.accepts("ab"));
        assert!(a.accepts("bbaab"));
        assert!(!a.accepts("aba"));
        assert!(!a.accepts(""));
        assert!(!a.accepts("c"));
    }

    #[test]
    fn epsilon_moves() {
        let a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", 'a', "C"), ("A", 'b', "C")],
        );
        assert!(a.accepts("a"));
        assert!(a.accepts("b"));
        assert!(!a.accepts(""));
        assert!(!a.accepts("ab"));
    }

    #[test]
    fn epsilon_to_accepting_at_end() {
        let a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", 'a', "B"), ("B", '_', "C")],
        );
        assert!(a.accepts("a"));
    }

    #[test]
    fn epsilon_cycle_terminates() {
        let a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", '_', "A"), ("B", 'a', "C")],
        );
        assert!(a.accepts("a"));
        assert!(!a.accepts(""));
        assert!(!a.accepts("b"));
    }

    #[test]
    fn no_states_accepts_nothing() {
        assert!(!Automaton::new().accepts(""));
    }

    #[quickcheck]
    fn acceptance_is_deterministic(word: String) -> bool {
        let a = ends_with_ab();
        a.accepts(&word) == a.accepts(&word)
    }
}
