use std::fmt::Display;

use crate::{
    automaton::{
        Letter, State,
        nfa::{
            NFA, NFAEdge,
            elimination::{EdgeCombiner, RegexStringCombiner},
        },
    },
    config::{EliminationConfig, EliminationOrder},
    regex::{
        Postfix, escape,
        symbolic::{Annotated, PostfixCombiner, label_tokens},
    },
};

/// Reduces an automaton to its start and final state by repeatedly ripping
/// out states, until a single edge carries a label for the whole language.
#[derive(Debug, Clone)]
pub struct StateEliminator<C> {
    combiner: C,
    order: EliminationOrder,
}

impl<C> StateEliminator<C> {
    pub fn new(combiner: C, order: EliminationOrder) -> Self {
        StateEliminator { combiner, order }
    }

    pub fn from_config(combiner: C, config: &EliminationConfig) -> Self {
        StateEliminator::new(combiner, *config.get_order())
    }

    /// The estimated growth of the labels when `state` is ripped:
    /// `in_weight * out_degree + out_weight * in_degree`, where self-loops
    /// are left out of all four terms.
    pub fn cost<L: Letter>(&self, nfa: &NFA<L>, state: State) -> usize
    where
        C: EdgeCombiner<L>,
    {
        let (incoming, outgoing) = nfa.in_out_sets(state);
        let weigh = |edges: &[(State, &NFAEdge<L>)]| {
            edges
                .iter()
                .filter(|(other, _)| *other != state)
                .fold((0usize, 0usize), |(weight, degree), (_, label)| {
                    (weight + self.combiner.label_weight(label), degree + 1)
                })
        };

        let (in_weight, in_degree) = weigh(&incoming);
        let (out_weight, out_degree) = weigh(&outgoing);

        in_weight
            .saturating_mul(out_degree)
            .saturating_add(out_weight.saturating_mul(in_degree))
    }

    /// The next state to rip, or `None` if only the start and final state
    /// are left. Ties are broken by the smaller state.
    pub fn next_state<L: Letter>(&self, nfa: &NFA<L>) -> Option<State>
    where
        C: EdgeCombiner<L>,
    {
        let candidates = nfa
            .states()
            .into_iter()
            .filter(|s| *s != nfa.start() && *s != nfa.final_state());

        match self.order {
            EliminationOrder::Ascending => candidates.min(),
            EliminationOrder::Heuristic => candidates.min_by_key(|s| self.cost(nfa, *s)),
        }
    }

    /// Eliminates all states except start and final. The result has at most
    /// one transition, from the start to the final state, and the states 0
    /// and 1.
    pub fn eliminate<L: Letter>(&self, mut nfa: NFA<L>) -> NFA<L>
    where
        C: EdgeCombiner<L>,
    {
        nfa.isolate_terminals();
        nfa.union_edges(&self.combiner);

        while let Some(state) = self.next_state(&nfa) {
            tracing::debug!(
                state = %state,
                cost = self.cost(&nfa, state),
                remaining = nfa.state_count(),
                "Ripping state"
            );

            // unsafe rips always succeed
            if nfa.rip(state, false, &self.combiner).is_some() {
                nfa.union_edges(&self.combiner);
            }
        }

        nfa.renumber();
        nfa
    }

    /// The label describing the language of `nfa`. `None` means the language
    /// is empty, [NFAEdge::Epsilon] that it only contains the empty word.
    pub fn expression<L: Letter>(&self, nfa: NFA<L>) -> Option<NFAEdge<L>>
    where
        C: EdgeCombiner<L>,
    {
        let reduced = self.eliminate(nfa);

        reduced
            .labels_between(reduced.start(), reduced.final_state())
            .and_then(|labels| labels.iter().next().cloned())
    }
}

/// Synthesizes a postfix regex for the language of `nfa`, `None` if the
/// language is empty.
pub fn synthesize<S: Letter>(nfa: &NFA<S>, order: EliminationOrder) -> Option<Postfix<S>> {
    let annotated = nfa.map_labels(|s| Annotated::Literal(s.clone()));
    let label = StateEliminator::new(PostfixCombiner, order).expression(annotated)?;

    Some(Postfix::new(label_tokens(&label)))
}

/// Synthesizes a regex string for the language of `nfa` by gluing strings
/// together, `None` if the language is empty.
pub fn synthesize_string<S: Letter + Display>(
    nfa: &NFA<S>,
    order: EliminationOrder,
) -> Option<String> {
    let labelled = nfa.map_labels(|s| escape(&s.to_string()));
    let label = StateEliminator::new(RegexStringCombiner, order).expression(labelled)?;

    Some(label.symbol().cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        automaton::Language,
        regex::compiler::{construct_nfa, construct_string, parse_regex_as_nfa},
    };

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_heuristic_prefers_cheap_states() {
        // 0 -a-> 1 -b-> 3, 0 -c-> 2, 2 -d-> 3, 2 -e-> 3
        let nfa = NFA::from_parts(
            [0, 1, 2, 3],
            [],
            [
                (0, NFAEdge::Symbol('a'), 1),
                (1, NFAEdge::Symbol('b'), 3),
                (0, NFAEdge::Symbol('c'), 2),
                (2, NFAEdge::Symbol('d'), 3),
                (2, NFAEdge::Symbol('e'), 3),
            ],
            0,
            3,
        )
        .unwrap()
        .map_labels(|c| c.to_string());
        let eliminator = StateEliminator::new(RegexStringCombiner, EliminationOrder::Heuristic);

        assert_eq!(eliminator.cost(&nfa, State(1)), 2);
        assert_eq!(eliminator.cost(&nfa, State(2)), 4);
        assert_eq!(eliminator.next_state(&nfa), Some(State(1)));
    }

    #[test]
    fn test_alternation() {
        let nfa = parse_regex_as_nfa("a|b").unwrap();
        let postfix = synthesize(&nfa, EliminationOrder::Heuristic).unwrap();

        let text = construct_string(&postfix).unwrap();
        assert!(text == "a|b" || text == "b|a", "got {}", text);
    }

    #[test]
    fn test_round_trip() {
        for regex in ["a(aa)*b*", "(a|b)*abb", "ab?c+", "(ab|c)*d?"] {
            let nfa = parse_regex_as_nfa(regex).unwrap();

            for order in [EliminationOrder::Heuristic, EliminationOrder::Ascending] {
                let postfix = synthesize(&nfa, order).unwrap();
                let synthesized = construct_nfa(&postfix).unwrap();

                for w in ["", "a", "ab", "abb", "aab", "aaab", "abcc", "ac", "cd", "abd"] {
                    assert_eq!(
                        synthesized.accepts(&word(w)),
                        nfa.accepts(&word(w)),
                        "regex {} order {:?} word {}",
                        regex,
                        order,
                        w
                    );
                }
            }
        }
    }

    #[test]
    fn test_string_combiner_round_trip() {
        let nfa = parse_regex_as_nfa("(a|b)c*").unwrap();
        let text = synthesize_string(&nfa, EliminationOrder::Heuristic).unwrap();
        let synthesized = parse_regex_as_nfa(&text).unwrap();

        for w in ["a", "b", "ac", "bcc", "", "c", "ab"] {
            assert_eq!(synthesized.accepts(&word(w)), nfa.accepts(&word(w)), "{}", text);
        }
    }

    #[test]
    fn test_empty_language() {
        let nfa = NFA::<char>::new(vec!['a']);

        assert_eq!(synthesize(&nfa, EliminationOrder::Heuristic), None);
        assert_eq!(synthesize_string(&nfa, EliminationOrder::Ascending), None);
    }

    #[test]
    fn test_empty_word() {
        let nfa = NFA::<char>::empty_word(vec![]);

        assert_eq!(
            synthesize(&nfa, EliminationOrder::Heuristic),
            Some(Postfix::default())
        );
    }
}
