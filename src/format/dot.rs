//! Graphviz output.

use std::fmt::Write;

use crate::automaton::{Automaton, Label};

/// Renders the automaton as a Graphviz `digraph`.
/// Accepting states are drawn as double circles, an unnamed invisible node points at the start state and epsilon transitions are labeled `ε`.
pub fn to_dot(automaton: &Automaton) -> String {
    let mut out = String::new();
    out.push_str("digraph automaton {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    \"\" [shape=none];\n");
    for state in automaton.states() {
        let shape = if state.is_accepting() { "doublecircle" } else { "circle" };
        let _ = writeln!(out, "    \"{}\" [shape={}];", escape(state.name()), shape);
    }
    if let Some(start) = automaton.start_name() {
        let _ = writeln!(out, "    \"\" -> \"{}\";", escape(start));
    }
    for t in automaton.transitions() {
        let label = match t.label() {
            Label::Symbol(c) => escape(&c.to_string()),
            Label::Epsilon => "ε".to_string(),
        };
        let _ = writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(t.source()),
            escape(t.target()),
            label
        );
    }
    out.push_str("}\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
