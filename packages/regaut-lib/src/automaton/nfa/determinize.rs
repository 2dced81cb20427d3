use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::automaton::{
    Letter, State,
    dfa::DFA,
    nfa::{NFA, NFAEdge},
};

impl<L: Letter> NFA<L> {
    /// Determinizes the NFA with the subset construction. Every DFA state
    /// stands for an ε-closed set of NFA states, the start state 0 for the
    /// closure of the NFA start state. A set is accepting if it contains the
    /// NFA final state.
    ///
    /// The empty set is only materialized if `complete` is set. It then
    /// becomes a trap state and the result is a complete DFA. Otherwise
    /// missing transitions are left out.
    pub fn to_dfa(&self, complete: bool) -> DFA<L> {
        let mut closures: HashMap<State, BTreeSet<State>> = HashMap::new();
        let mut dfa = DFA::new(self.alphabet.clone());

        let start_set = self.eps_closure(self.start, true);
        dfa.set_accepting(dfa.start(), self.is_accepting_set(&start_set));

        let mut subsets = vec![start_set.clone()];
        let mut state_map: HashMap<BTreeSet<State>, State> = HashMap::new();
        state_map.insert(start_set, dfa.start());
        let mut stack = vec![dfa.start()];

        while let Some(current) = stack.pop() {
            let subset = subsets[current.index()].clone();

            for symbol in &self.alphabet {
                let label = NFAEdge::Symbol(symbol.clone());
                let mut target_set = BTreeSet::new();

                for &state in &subset {
                    for next in self.targets(state, &label) {
                        let closure = closures
                            .entry(next)
                            .or_insert_with(|| self.eps_closure(next, true));
                        target_set.extend(closure.iter().copied());
                    }
                }

                if target_set.is_empty() && !complete {
                    continue;
                }

                let target = match state_map.get(&target_set) {
                    Some(&existing) => existing,
                    None => {
                        let new_state = dfa.add_state(self.is_accepting_set(&target_set));
                        if target_set.is_empty() {
                            dfa.mark_trap(new_state);
                        }

                        state_map.insert(target_set.clone(), new_state);
                        subsets.push(target_set);
                        stack.push(new_state);
                        new_state
                    }
                };

                dfa.add_transition(current, target, symbol.clone());
            }
        }

        tracing::debug!(
            "Determinized NFA with {} states into DFA with {} states",
            self.state_count(),
            dfa.state_count()
        );

        dfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Language;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_partial_subset_construction() {
        let nfa = NFA::literal('a').concat(NFA::literal('b')).union(NFA::literal('b'));
        let dfa = nfa.to_dfa(false);

        assert!(!dfa.is_complete());
        assert_eq!(dfa.state_count(), 3);
        assert!(dfa.accepts(&word("ab")));
        assert!(dfa.accepts(&word("b")));
        assert!(!dfa.accepts(&word("a")));
        assert!(!dfa.accepts(&word("bb")));
    }

    #[test]
    fn test_complete_subset_construction() {
        let nfa = NFA::literal('a').star();
        let dfa = nfa.to_dfa(true);

        assert!(dfa.is_complete());
        assert!(dfa.accepts(&word("")));
        assert!(dfa.accepts(&word("aaa")));
    }

    #[test]
    fn test_complete_subset_construction_adds_trap() {
        let nfa = NFA::literal('a').union(NFA::literal('b'));
        let dfa = nfa.to_dfa(true);

        assert!(dfa.is_complete());
        assert_eq!(dfa.state_count(), 3);
        assert_eq!(
            dfa.states().into_iter().filter(|s| dfa.is_trap(*s)).count(),
            1
        );
        assert!(!dfa.accepts(&word("ab")));
    }

    #[test]
    fn test_start_state_is_zero() {
        let dfa = NFA::literal('a').opt().to_dfa(false);

        assert_eq!(dfa.start(), State(0));
        assert!(dfa.is_final(State(0)));
    }
}
