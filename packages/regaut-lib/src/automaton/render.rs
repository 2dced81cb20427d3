use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::automaton::{AutomatonView, State};

/// Renders an automaton in the graphviz DOT format. Parallel labels between
/// the same pair of states are joined into a single edge.
pub fn to_graphviz<A: AutomatonView>(
    automaton: &A,
    edge_label: impl Fn(&A::Label) -> String,
) -> String {
    let mut dot = String::new();
    dot.push_str("digraph finite_state_machine {\n");
    dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
    dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
    dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
    dot.push_str("rankdir=LR;\n");
    dot.push_str("node [shape=point,label=\"\"]START\n");

    let accepting_states = automaton
        .view_states()
        .into_iter()
        .filter(|state| automaton.view_is_final(*state))
        .collect_vec();

    dot.push_str(&format!(
        "node [shape = doublecircle]; {};\n",
        accepting_states.iter().join(" ")
    ));
    dot.push_str("node [shape = circle];\n");
    dot.push_str(&format!("START -> {};\n", automaton.view_start()));

    for (from, to, labels) in automaton.view_edges() {
        let label = labels.into_iter().map(&edge_label).join(", ");
        dot.push_str(&format!(
            "{} -> {} [ label={:?} ];\n",
            from, to, label
        ));
    }

    dot.push_str("}\n");

    dot
}

/// [to_graphviz] for automata whose labels can be displayed.
pub fn to_graphviz_display<A>(automaton: &A) -> String
where
    A: AutomatonView,
    A::Label: Display,
{
    to_graphviz(automaton, |label| label.to_string())
}

/// A plain, serializable copy of the structure of an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub states: Vec<State>,
    pub start: State,
    pub finals: Vec<State>,
    pub transitions: Vec<(State, String, State)>,
}

impl Snapshot {
    pub fn capture<A: AutomatonView>(
        automaton: &A,
        edge_label: impl Fn(&A::Label) -> String,
    ) -> Self {
        let states = automaton.view_states();
        let finals = states
            .iter()
            .copied()
            .filter(|state| automaton.view_is_final(*state))
            .collect();
        let transitions = automaton
            .view_edges()
            .into_iter()
            .flat_map(|(from, to, labels)| {
                labels
                    .into_iter()
                    .map(|label| (from, edge_label(label), to))
                    .collect_vec()
            })
            .collect();

        Snapshot {
            states,
            start: automaton.view_start(),
            finals,
            transitions,
        }
    }

    pub fn capture_display<A>(automaton: &A) -> Self
    where
        A: AutomatonView,
        A::Label: Display,
    {
        Snapshot::capture(automaton, |label| label.to_string())
    }
}
