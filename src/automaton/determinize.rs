//! Powerset construction.

use std::collections::VecDeque;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::options::Options;

use super::{Automaton, AutomatonError, Label, Transition};

impl Automaton {
    /// Converts the automaton into an equivalent, complete deterministic automaton using the powerset construction.
    ///
    /// Every state of the result stands for a set of states of this automaton and is named by the sorted names of its members, joined by the separator configured in `options`.
    /// If that name already belongs to a different set, for example because a member name contains the separator, primes (`'`) are appended.
    /// Sets are closed under epsilon transitions, so the construction is also correct for automata that still contain epsilon transitions.
    /// Symbols that cannot be read from a set lead into a single non-accepting sink state, which is only added if needed.
    pub fn determinize(&self, options: &Options) -> Result<Automaton, AutomatonError> {
        let start = self.start_name().ok_or(AutomatonError::NoStartState)?;

        let mut dfa = Automaton::new();
        dfa.alphabet = self.alphabet.clone();

        // Set-states are identified by their members, the rendered names are only labels
        let mut names: IndexMap<Vec<&str>, String> = IndexMap::new();
        let initial = self.closure_of([start]);
        let initial_name = unique_name(&initial, &names, options);
        names.insert(initial.clone(), initial_name);
        let mut queue = VecDeque::from([initial]);

        let mut edges: Vec<(String, String, char)> = Vec::new();
        let mut into_sink: Vec<(String, char)> = Vec::new();

        while let Some(set) = queue.pop_front() {
            let name = names[&set].clone();
            let accepting = set.iter().any(|s| self.is_accepting(s));
            dfa.add_state(name.clone(), accepting)?;

            for &symbol in &self.alphabet {
                let reachable = set
                    .iter()
                    .flat_map(|&s| self.outgoing(s))
                    .filter(|t| t.label() == Label::Symbol(symbol))
                    .map(|t| t.target())
                    .collect_vec();
                if reachable.is_empty() {
                    into_sink.push((name.clone(), symbol));
                    continue;
                }
                let next = self.closure_of(reachable);
                let next_name = match names.get(&next) {
                    Some(known) => known.clone(),
                    None => {
                        let fresh = unique_name(&next, &names, options);
                        log::debug!("New set-state {}", fresh);
                        names.insert(next.clone(), fresh.clone());
                        queue.push_back(next);
                        fresh
                    }
                };
                edges.push((name.clone(), next_name, symbol));
            }
        }

        for (source, target, symbol) in edges {
            dfa.add_transition(Transition::new(source, target, Label::Symbol(symbol)))?;
        }

        if !into_sink.is_empty() {
            let mut sink = options.sink_name.clone();
            while dfa.contains_state(&sink) {
                sink.push('\'');
            }
            dfa.add_state(sink.clone(), false)?;
            for (source, symbol) in into_sink {
                dfa.add_transition(Transition::new(source, sink.clone(), Label::Symbol(symbol)))?;
            }
            for &symbol in &self.alphabet {
                dfa.add_transition(Transition::new(sink.clone(), sink.clone(), Label::Symbol(symbol)))?;
            }
        }

        log::debug!(
            "Determinized automaton with {} states into automaton with {} states",
            self.num_states(),
            dfa.num_states()
        );
        Ok(dfa)
    }

    /// The sorted and deduplicated union of the epsilon closures of the given states.
    fn closure_of<'a>(&'a self, states: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        states
            .into_iter()
            .flat_map(|s| self.epsilon_closure(s))
            .sorted()
            .dedup()
            .collect()
    }
}

/// Names a set-state by its sorted members, appending primes while the name belongs to another set-state.
fn unique_name(set: &[&str], names: &IndexMap<Vec<&str>, String>, options: &Options) -> String {
    let mut name = set.iter().join(&options.set_separator);
    while names.values().any(|n| *n == name) {
        name.push('\'');
    }
    name
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use crate::{
        automaton::{tests::automaton, Automaton},
        options::Options,
    };

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
    fn set_states_are_named_by_members() {
        let dfa = ends_with_ab().determinize(&Options::default()).unwrap();
        let names: Vec<&str> = dfa.states().map(|s| s.name()).collect();
        assert_eq!(names, vec!["A", "A-B", "A-C"]);
        assert!(dfa.is_accepting("A-C"));
        assert!(!dfa.is_accepting("A-B"));
        assert!(dfa.is_dfa());
    }

    #[test]
    fn sink_is_added_when_needed() {
        let a = automaton(&[("A", false), ("B", true)], &[("A", 'a', "B"), ("A", 'b', "A")]);
        let dfa = a.determinize(&Options::default()).unwrap();
        assert!(dfa.contains_state("Sink"));
        assert!(!dfa.is_accepting("Sink"));
        assert!(dfa.is_dfa());
        assert!(dfa.accepts("bba"));
        assert!(!dfa.accepts("ab"));
    }

    #[test]
    fn no_sink_when_total() {
        let dfa = ends_with_ab().determinize(&Options::default()).unwrap();
        assert!(!dfa.contains_state("Sink"));
    }

    #[test]
    fn sink_name_made_unique() {
        let a = automaton(&[("Sink", false), ("B", true)], &[("Sink", 'a', "B")]);
        let dfa = a.determinize(&Options::default()).unwrap();
        assert!(dfa.contains_state("Sink'"));
        assert!(dfa.is_dfa());
    }

    #[test]
    fn epsilon_closure_is_used() {
        let a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", '_', "B"), ("B", 'a', "C")],
        );
        let dfa = a.determinize(&Options::default()).unwrap();
        assert_eq!(dfa.start_name(), Some("A-B"));
        assert!(dfa.accepts("a"));
        assert!(!dfa.accepts(""));
        assert!(dfa.is_dfa());
    }

    #[test]
    fn member_names_containing_separator() {
        // The set {A, B} and the state `A-B` render to the same name
        let a = automaton(
            &[("S", false), ("A", false), ("B", false), ("A-B", true)],
            &[("S", 'a', "A"), ("S", 'a', "B"), ("S", 'b', "A-B")],
        );
        let dfa = a.determinize(&Options::default()).unwrap();
        assert!(dfa.contains_state("A-B"));
        assert!(dfa.contains_state("A-B'"));
        assert!(dfa.is_dfa());
        for word in ["a", "b", "", "ab", "ba"] {
            assert_eq!(a.accepts(word), dfa.accepts(word), "disagree on {:?}", word);
        }
        assert!(dfa.accepts("b"));
    }

    #[test]
    fn no_start_state() {
        assert!(Automaton::new().determinize(&Options::default()).is_err());
    }

    #[quickcheck]
    fn same_language(word: Vec<bool>) -> bool {
        let word: String = word.into_iter().map(|b| if b { 'a' } else { 'b' }).collect();
        let nfa = ends_with_ab();
        let dfa = nfa.determinize(&Options::default()).unwrap();
        nfa.accepts(&word) == dfa.accepts(&word)
    }

    #[test]
    fn totality() {
        let a = automaton(
            &[("A", false), ("B", false), ("C", true)],
            &[("A", 'a', "B"), ("A", 'a', "C"), ("B", 'b', "C"), ("C", 'c', "A")],
        );
        let dfa = a.determinize(&Options::default()).unwrap();
        for state in dfa.states() {
            let mut symbols: Vec<char> = dfa
                .outgoing(state.name())
                .filter_map(|t| t.label().symbol())
                .collect();
            symbols.sort();
            assert_eq!(symbols, vec!['a', 'b', 'c']);
        }
    }
}
