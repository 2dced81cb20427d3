use std::collections::BTreeSet;

use itertools::Itertools;

use crate::automaton::{
    Letter, State, insert_letter,
    nfa::{NFA, NFAEdge},
};

/// Decides which label replaces a group of transitions during state
/// elimination.
pub trait EdgeCombiner<L: Letter> {
    /// The label of the path `p -pre-> q (loops)* -post-> r` once `q` is
    /// removed. `loops` are the non-ε self-loop symbols of `q` and may be
    /// empty.
    fn combine_path(&self, pre: &NFAEdge<L>, loops: &[L], post: &NFAEdge<L>) -> NFAEdge<L>;

    /// The single label replacing all parallel labels between two states.
    /// `labels` is never empty.
    fn combine_parallel(&self, labels: &[&NFAEdge<L>]) -> NFAEdge<L>;

    /// A size estimate for a label, used by the elimination order heuristic.
    fn label_weight(&self, label: &NFAEdge<L>) -> usize;
}

impl<L: Letter> NFA<L> {
    /// Removes `state`, rerouting every pair of incoming and outgoing
    /// transitions around it with a label produced by `combiner`.
    ///
    /// In safe mode the state is only removed if no information gets lost:
    /// it must have no non-ε self-loop and no pair of incoming and outgoing
    /// transitions may both carry a symbol. Otherwise the automaton is left
    /// untouched and `None` is returned. ε self-loops are ignored in both
    /// modes.
    ///
    /// Panics if `state` is the start or final state.
    pub fn rip<C: EdgeCombiner<L>>(
        &mut self,
        state: State,
        safe: bool,
        combiner: &C,
    ) -> Option<&mut Self> {
        assert!(
            state != self.start && state != self.final_state,
            "Cannot rip the start or final state {:?}",
            state
        );
        assert!(self.contains_state(state), "Unknown state {:?}", state);

        let (incoming, outgoing) = self.in_out_sets(state);
        let loops = incoming
            .iter()
            .filter(|(source, _)| *source == state)
            .filter_map(|(_, label)| label.symbol().cloned())
            .collect_vec();
        let incoming = incoming
            .into_iter()
            .filter(|(source, _)| *source != state)
            .map(|(source, label)| (source, label.clone()))
            .collect_vec();
        let outgoing = outgoing
            .into_iter()
            .filter(|(target, _)| *target != state)
            .map(|(target, label)| (target, label.clone()))
            .collect_vec();

        if safe {
            let joins_symbols = incoming.iter().any(|(_, label)| !label.is_epsilon())
                && outgoing.iter().any(|(_, label)| !label.is_epsilon());
            if !loops.is_empty() || joins_symbols {
                return None;
            }
        }

        let mut rerouted = Vec::with_capacity(incoming.len() * outgoing.len());
        for (source, pre) in &incoming {
            for (target, post) in &outgoing {
                let label = if safe {
                    if pre.is_epsilon() {
                        post.clone()
                    } else {
                        pre.clone()
                    }
                } else {
                    combiner.combine_path(pre, &loops, post)
                };
                rerouted.push((*source, label, *target));
            }
        }

        self.remove_state(state);
        for (source, label, target) in rerouted {
            self.add_transition(source, label, target);
        }

        Some(self)
    }

    /// Replaces every group of parallel transitions with a single
    /// transition carrying the combined label.
    pub fn union_edges<C: EdgeCombiner<L>>(&mut self, combiner: &C) -> &mut Self {
        let merged = self
            .graph
            .all_edges()
            .filter(|(_, _, labels)| labels.len() > 1)
            .map(|(from, to, labels)| {
                (
                    from,
                    to,
                    combiner.combine_parallel(&labels.iter().collect_vec()),
                )
            })
            .collect_vec();

        for (from, to, label) in merged {
            if let NFAEdge::Symbol(symbol) = &label {
                insert_letter(&mut self.alphabet, symbol.clone());
            }
            if let Some(labels) = self.graph.edge_weight_mut(from, to) {
                *labels = BTreeSet::from([label]);
            }
        }

        self
    }
}

/// Combines string labels into regex syntax, e.g. `ab(c)*d` or `(a|b)?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexStringCombiner;

impl RegexStringCombiner {
    fn text(label: &NFAEdge<String>) -> &str {
        label.symbol().map(String::as_str).unwrap_or("")
    }

    /// Wraps a label in a group if it has a top level alternation, so it can
    /// be concatenated safely.
    fn grouped(text: &str) -> String {
        if has_top_level_alternation(text) {
            format!("({})", text)
        } else {
            text.to_string()
        }
    }

    fn edge(text: String) -> NFAEdge<String> {
        if text.is_empty() {
            NFAEdge::Epsilon
        } else {
            NFAEdge::Symbol(text)
        }
    }
}

impl EdgeCombiner<String> for RegexStringCombiner {
    fn combine_path(
        &self,
        pre: &NFAEdge<String>,
        loops: &[String],
        post: &NFAEdge<String>,
    ) -> NFAEdge<String> {
        let pre = Self::text(pre);
        let post = Self::text(post);

        if loops.is_empty() {
            if pre.is_empty() || post.is_empty() {
                return Self::edge(format!("{}{}", pre, post));
            }
            return Self::edge(format!("{}{}", Self::grouped(pre), Self::grouped(post)));
        }

        let repeat = loops.iter().join("|");
        let label = if pre == repeat {
            // covers pre == post == repeat as well, giving `(R)+R`
            format!("({})+{}", repeat, Self::grouped(post))
        } else if post == repeat {
            format!("{}({})+", Self::grouped(pre), repeat)
        } else {
            format!(
                "{}({})*{}",
                Self::grouped(pre),
                repeat,
                Self::grouped(post)
            )
        };

        Self::edge(label)
    }

    fn combine_parallel(&self, labels: &[&NFAEdge<String>]) -> NFAEdge<String> {
        let optional = labels.iter().any(|label| label.is_epsilon());
        let alternatives = labels
            .iter()
            .filter_map(|label| label.symbol())
            .unique()
            .collect_vec();

        match (alternatives.as_slice(), optional) {
            ([], _) => NFAEdge::Epsilon,
            ([single], false) => NFAEdge::Symbol((*single).clone()),
            (_, false) => NFAEdge::Symbol(alternatives.iter().join("|")),
            (_, true) => NFAEdge::Symbol(format!("({})?", alternatives.iter().join("|"))),
        }
    }

    fn label_weight(&self, label: &NFAEdge<String>) -> usize {
        Self::text(label).chars().count()
    }
}

/// Checks if a regex string contains a `|` outside of all groups.
pub fn has_top_level_alternation(text: &str) -> bool {
    let mut depth = 0usize;
    let mut escaped = false;

    for c in text.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => return true,
            _ => {}
        }
    }

    false
}
