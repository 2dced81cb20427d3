use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::automaton::{
    Letter, State,
    dfa::{DFA, node::DfaNode},
    index_map::{IndexMap, IndexSet},
};

pub trait Minimizable {
    fn minimize(&self) -> Self;
}

impl<L: Letter> Minimizable for DFA<L> {
    /// Hopcroft partition refinement.
    ///
    /// Only states reachable from the start take part. A partial DFA is
    /// additionally trimmed of states that can never reach an accepting
    /// state, so the result is the minimal partial DFA. A complete DFA stays
    /// complete. If no accepting state is reachable, the result is a single
    /// non-accepting state without transitions.
    ///
    /// The state of the result is the index of its partition. The start
    /// state need not be state 0.
    fn minimize(&self) -> Self {
        let mut live = self.reachable_states();
        if !self.is_complete() {
            let productive = self.productive_states();
            let mut trimmed = IndexSet::new(self.state_count());
            for node in live.iter().filter(|n| productive.contains(*n)) {
                trimmed.insert(node);
            }
            live = trimmed;
        }

        let (finals, non_finals): (Vec<NodeIndex>, Vec<NodeIndex>) =
            live.iter().partition(|n| self.graph[*n].accepting);

        if finals.is_empty() {
            tracing::debug!("No accepting state is reachable, collapsing to a single state");
            return DFA::new(self.alphabet.clone());
        }

        let successors = self.successor_table(&live);
        let letter_count = self.alphabet.len();

        let mut partitions = vec![finals];
        let mut accepting = vec![true];
        if !non_finals.is_empty() {
            partitions.push(non_finals);
            accepting.push(false);
        }

        let mut worklist: Vec<usize> = (0..partitions.len()).collect();
        let mut in_worklist = vec![true; partitions.len()];

        while let Some(splitter_index) = worklist.pop() {
            in_worklist[splitter_index] = false;

            let mut splitter = IndexSet::new(self.state_count());
            for node in &partitions[splitter_index] {
                splitter.insert(*node);
            }

            for letter in 0..letter_count {
                for index in 0..partitions.len() {
                    let (to_splitter, rest): (Vec<NodeIndex>, Vec<NodeIndex>) = partitions[index]
                        .iter()
                        .partition(|n| {
                            successors[n.index()][letter].is_some_and(|t| splitter.contains(t))
                        });

                    if to_splitter.is_empty() || rest.is_empty() {
                        continue;
                    }

                    let larger_kept = to_splitter.len() > rest.len();
                    partitions[index] = to_splitter;
                    partitions.push(rest);
                    accepting.push(accepting[index]);
                    in_worklist.push(false);
                    let added = partitions.len() - 1;

                    if in_worklist[index] || larger_kept {
                        worklist.push(added);
                        in_worklist[added] = true;
                    } else {
                        worklist.push(index);
                        in_worklist[index] = true;
                    }
                }
            }
        }

        let mut class_of = IndexMap::<NodeIndex, Option<usize>>::new(self.state_count());
        for (class, members) in partitions.iter().enumerate() {
            for node in members {
                class_of.insert(*node, Some(class));
            }
        }

        let class = |node: NodeIndex| class_of.get(node).map(State::new);
        let start = class(self.start).unwrap_or(State(0));
        let nodes = accepting.iter().map(|a| DfaNode::new(*a, false)).collect();
        let mut minimized = DFA::from_nodes(self.alphabet.clone(), nodes, start);

        for (index, members) in partitions.iter().enumerate() {
            let from = State::new(index);
            let representative = members[0];
            let mut only_self_loops = true;

            for (letter, target) in successors[representative.index()].iter().enumerate() {
                let Some(to) = target.and_then(class) else {
                    only_self_loops = false;
                    continue;
                };

                minimized.add_transition(from, to, self.alphabet[letter].clone());
                only_self_loops &= from == to;
            }

            if only_self_loops && !accepting[index] {
                minimized.mark_trap(from);
            }
        }

        tracing::debug!(
            "Minimized DFA from {} to {} states",
            self.state_count(),
            minimized.state_count()
        );

        minimized
    }
}

impl<L: Letter> DFA<L> {
    /// For every live state the successor on each letter of the alphabet,
    /// indexed by the letter's position. Transitions into states that are not
    /// live are dropped.
    fn successor_table(&self, live: &IndexSet<NodeIndex>) -> Vec<Vec<Option<NodeIndex>>> {
        let mut table = vec![vec![None; self.alphabet.len()]; self.state_count()];

        for edge in self.graph.edge_references() {
            if !live.contains(edge.source()) || !live.contains(edge.target()) {
                continue;
            }

            if let Ok(letter) = self.alphabet.binary_search(edge.weight()) {
                table[edge.source().index()][letter] = Some(edge.target());
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Language;

    #[test]
    fn test_merges_equivalent_states() {
        // (a|b)a* with a redundant copy of the looping state
        let dfa = DFA::from_parts(
            [0, 1, 2],
            ['a', 'b'],
            [(0, 'a', 1), (0, 'b', 2), (1, 'a', 1), (2, 'a', 2)],
            0,
            [1, 2],
        )
        .unwrap();
        let minimized = dfa.minimize();

        assert_eq!(minimized.state_count(), 2);
        for word in [vec!['a'], vec!['b', 'a'], vec!['a', 'b'], vec![]] {
            assert_eq!(minimized.accepts(&word), dfa.accepts(&word));
        }
    }

    #[test]
    fn test_trims_dead_states_of_partial_dfa() {
        let dfa = DFA::from_parts(
            [0, 1, 2],
            ['a', 'b'],
            [(0, 'a', 1), (0, 'b', 2), (2, 'a', 2)],
            0,
            [1],
        )
        .unwrap();
        let minimized = dfa.minimize();

        assert_eq!(minimized.state_count(), 2);
        assert!(minimized.accepts(&['a']));
        assert!(!minimized.accepts(&['b']));
    }

    #[test]
    fn test_complete_dfa_stays_complete() {
        let dfa = DFA::from_parts([0, 1], ['a', 'b'], [(0, 'a', 1)], 0, [1])
            .unwrap()
            .complete();
        let minimized = dfa.minimize();

        assert!(minimized.is_complete());
        assert_eq!(minimized.state_count(), 3);
        assert_eq!(
            minimized
                .states()
                .into_iter()
                .filter(|s| minimized.is_trap(*s))
                .count(),
            1
        );
    }

    #[test]
    fn test_no_reachable_final_collapses() {
        let dfa = DFA::from_parts([0, 1, 2], ['a'], [(0, 'a', 1)], 0, [2]).unwrap();
        let minimized = dfa.minimize();

        assert_eq!(minimized.state_count(), 1);
        assert!(minimized.transitions().is_empty());
        assert!(!minimized.accepts(&[]));
    }
}
