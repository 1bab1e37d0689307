//! Elimination of epsilon transitions.

use indexmap::IndexSet;

use super::{Automaton, Transition};

impl Automaton {
    /// Transforms the automaton into an equivalent automaton without epsilon transitions.
    ///
    /// Every epsilon transition `u -> v` is replaced by symbol transitions that bypass it:
    /// - If `v` is accepting and has no outgoing transitions, the symbol transitions that lead into `u` through epsilon moves are redirected to `v`.
    /// - Otherwise, the symbol transitions reachable from `v` through epsilon moves are copied to start in `u`.
    ///
    /// States that reach an accepting state through epsilon moves become accepting.
    /// Afterwards, all states except the start state without incoming transitions are removed, together with their outgoing transitions.
    /// Running this on an automaton without epsilon transitions does nothing.
    pub fn remove_epsilon_transitions(&mut self) {
        let epsilons: Vec<Transition> = self
            .transitions
            .iter()
            .filter(|t| t.is_epsilon())
            .cloned()
            .collect();
        if epsilons.is_empty() {
            return;
        }
        log::debug!("Removing {} epsilon transitions", epsilons.len());

        let mut replacements: Vec<Transition> = Vec::new();
        for eps in &epsilons {
            let candidates = if self.is_absorbing(eps.target()) {
                self.entering_through_epsilon(eps.source())
                    .into_iter()
                    .map(|t| Transition::new(t.source(), eps.target(), t.label()))
                    .collect::<Vec<_>>()
            } else {
                self.leaving_through_epsilon(eps.target())
                    .into_iter()
                    .map(|t| Transition::new(eps.source(), t.target(), t.label()))
                    .collect::<Vec<_>>()
            };
            for candidate in candidates {
                let known = self.has_transition(candidate.source(), candidate.target(), candidate.label())
                    || replacements.contains(&candidate);
                if !known {
                    log::debug!("Replacing {} with {}", eps, candidate);
                    replacements.push(candidate);
                }
            }
        }

        let now_accepting: Vec<String> = self
            .states()
            .filter(|s| !s.is_accepting())
            .filter(|s| self.epsilon_closure(s.name()).iter().any(|c| self.is_accepting(c)))
            .map(|s| s.name().to_string())
            .collect();
        for name in now_accepting {
            if let Some(state) = self.states.get_mut(&name) {
                state.accepting = true;
            }
        }

        self.transitions.retain(|t| !t.is_epsilon());
        self.transitions.extend(replacements);
        self.remove_orphaned_states();
        self.classification = None;
    }

    /// A state is absorbing if it is accepting and has no outgoing transitions.
    fn is_absorbing(&self, name: &str) -> bool {
        self.is_accepting(name) && self.outgoing(name).next().is_none()
    }

    /// Returns the symbol transitions that reach `name` through a (possibly empty) chain of epsilon transitions.
    fn entering_through_epsilon(&self, name: &str) -> Vec<Transition> {
        let mut found = Vec::new();
        let mut visited = IndexSet::new();
        let mut stack = vec![name];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for t in self.incoming(current) {
                if t.is_epsilon() {
                    stack.push(t.source());
                } else {
                    found.push(t.clone());
                }
            }
        }
        found
    }

    /// Returns the symbol transitions reachable from `name` through a (possibly empty) chain of epsilon transitions.
    fn leaving_through_epsilon(&self, name: &str) -> Vec<Transition> {
        let mut found = Vec::new();
        let mut visited = IndexSet::new();
        let mut stack = vec![name];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for t in self.outgoing(current) {
                if t.is_epsilon() {
                    stack.push(t.target());
                } else {
                    found.push(t.clone());
                }
            }
        }
        found
    }

    /// Removes all states other than the start state that have no incoming transitions, until there are none left.
    fn remove_orphaned_states(&mut self) {
        loop {
            let orphaned: Vec<String> = self
                .states
                .keys()
                .filter(|name| self.start.as_ref() != Some(*name))
                .filter(|name| self.incoming(name.as_str()).next().is_none())
                .cloned()
                .collect();
            if orphaned.is_empty() {
                break;
            }
            for name in &orphaned {
                log::debug!("Removing unreachable state {}", name);
                self.states.shift_remove(name);
            }
            let states = &self.states;
            self.transitions.retain(|t| states.contains_key(t.source()));
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::automaton::{tests::automaton, Automaton};

    const SAMPLE: &[&str] = &["", "a", "b", "ab", "ba", "aa", "bb", "aab", "abb", "abab", "bbb"];

    fn assert_same_language(before: &Automaton, after: &Automaton) {
        for w in SAMPLE {
            assert_eq!(before.accepts(w), after.accepts(w), "disagree on {:?}", w);
        }
    }

    #[test]
    fn general_case_splices_source() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", 'a', "C"), ("C", 'b', "B")],
        );
        let before = a.clone();
        a.remove_epsilon_transitions();
        assert!(!a.has_epsilon_transitions());
        assert!(a.has_transition("A", "C", crate::automaton::Label::Symbol('a')));
        assert_same_language(&before, &a);
    }

    #[test]
    fn absorbing_case_redirects_predecessors() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", 'a', "B"), ("B", '_', "C")],
        );
        let before = a.clone();
        a.remove_epsilon_transitions();
        assert!(a.has_transition("A", "C", crate::automaton::Label::Symbol('a')));
        assert!(!a.has_epsilon_transitions());
        assert_same_language(&before, &a);
    }

    #[test]
    fn absorbing_from_start_accepts_empty_word() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "C"), ("A", 'a', "B"), ("B", 'b', "C")],
        );
        let before = a.clone();
        a.remove_epsilon_transitions();
        assert!(a.accepts(""));
        assert_same_language(&before, &a);
    }

    #[test]
    fn chain_into_absorbing_after_splice() {
        let mut a = automaton(
            &[("Q", false), ("X", false), ("Y", false), ("F", true)],
            &[("Q", '_', "X"), ("X", 'a', "Y"), ("Y", '_', "F")],
        );
        let before = a.clone();
        a.remove_epsilon_transitions();
        assert!(a.accepts("a"));
        assert_same_language(&before, &a);
    }

    #[test]
    fn epsilon_cycle() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", '_', "A"), ("B", 'a', "C"), ("C", 'b', "A")],
        );
        let before = a.clone();
        a.remove_epsilon_transitions();
        assert!(!a.has_epsilon_transitions());
        assert_same_language(&before, &a);
    }

    #[test]
    fn second_run_is_noop() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", false), ("D", true)],
            &[
                ("A", '_', "B"),
                ("B", 'a', "C"),
                ("C", '_', "D"),
                ("C", 'b', "A"),
                ("A", 'b', "D"),
            ],
        );
        a.remove_epsilon_transitions();
        let once = a.transitions().iter().cloned().collect_vec();
        let states = a.states().map(|s| s.name().to_string()).collect_vec();
        a.remove_epsilon_transitions();
        assert_eq!(a.transitions(), once.as_slice());
        assert_eq!(a.states().map(|s| s.name().to_string()).collect_vec(), states);
    }

    #[test]
    fn no_duplicate_replacements() {
        let mut a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("A", '_', "B"), ("B", 'a', "C")],
        );
        a.remove_epsilon_transitions();
        assert_eq!(a.transitions().len(), 1);
    }

    #[test]
    fn start_is_kept() {
        let mut a = automaton(&[("A", false), ("B", true)], &[("A", '_', "B")]);
        a.remove_epsilon_transitions();
        assert_eq!(a.start_name(), Some("A"));
        assert!(a.accepts(""));
    }
}
