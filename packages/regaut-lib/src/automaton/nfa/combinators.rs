//! Thompson style combinators. Every combinator consumes its operands and
//! returns the combined automaton, so the operands can never be observed in a
//! half merged state.

use hashbrown::HashMap;
use petgraph::Direction;

use crate::automaton::{
    Letter, State, insert_letter,
    nfa::{NFA, NFAEdge},
};

impl<L: Letter> NFA<L> {
    /// Accepts `L(self) · L(other)`. The final state of `self` and the start
    /// state of `other` are fused into one state.
    pub fn concat(mut self, mut other: NFA<L>) -> Self {
        self.isolate_terminals();
        other.isolate_terminals();

        let other_final = other.final_state;
        let mut identify: HashMap<State, State> = HashMap::new();
        identify.insert(other.start, self.final_state);
        let remap = self.absorb(other, identify);
        self.final_state = remap[&other_final];

        self
    }

    /// Accepts `L(self) ∪ L(other)`. Start states and final states are fused
    /// pairwise.
    pub fn union(mut self, mut other: NFA<L>) -> Self {
        self.isolate_terminals();
        other.isolate_terminals();

        let mut identify: HashMap<State, State> = HashMap::new();
        identify.insert(other.start, self.start);
        identify.insert(other.final_state, self.final_state);
        self.absorb(other, identify);

        self
    }

    /// Accepts `L(self)*` using a fresh start and a fresh final state.
    pub fn star(mut self) -> Self {
        let (old_start, old_final) = (self.start, self.final_state);
        let start = self.add_state();
        let final_state = self.add_state();

        self.add_transition(start, NFAEdge::Epsilon, old_start);
        self.add_transition(start, NFAEdge::Epsilon, final_state);
        self.add_transition(old_final, NFAEdge::Epsilon, old_start);
        self.add_transition(old_final, NFAEdge::Epsilon, final_state);

        self.start = start;
        self.final_state = final_state;
        self
    }

    /// Accepts `L(self)+`. Like [NFA::star] without the bypass.
    pub fn plus(mut self) -> Self {
        let (old_start, old_final) = (self.start, self.final_state);
        let start = self.add_state();
        let final_state = self.add_state();

        self.add_transition(start, NFAEdge::Epsilon, old_start);
        self.add_transition(old_final, NFAEdge::Epsilon, old_start);
        self.add_transition(old_final, NFAEdge::Epsilon, final_state);

        self.start = start;
        self.final_state = final_state;
        self
    }

    /// Accepts `L(self) ∪ {ε}` by adding an ε-edge from start to final.
    pub fn opt(mut self) -> Self {
        self.isolate_terminals();
        let (start, final_state) = (self.start, self.final_state);
        self.add_transition(start, NFAEdge::Epsilon, final_state);
        self
    }

    /// Makes sure the start state has no incoming and the final state no
    /// outgoing transitions, and that the two are different states. Missing
    /// guarantees are restored with a fresh state and an ε-edge, the
    /// language does not change.
    ///
    /// Automata built by the combinators in this module already satisfy
    /// this, except for the single state [NFA::empty_word].
    pub fn isolate_terminals(&mut self) {
        if self.start == self.final_state || self.has_incoming(self.start) {
            let start = self.add_state();
            self.add_transition(start, NFAEdge::Epsilon, self.start);
            self.start = start;
        }

        if self.has_outgoing(self.final_state) {
            let final_state = self.add_state();
            self.add_transition(self.final_state, NFAEdge::Epsilon, final_state);
            self.final_state = final_state;
        }
    }

    fn has_incoming(&self, state: State) -> bool {
        self.graph
            .neighbors_directed(state, Direction::Incoming)
            .next()
            .is_some()
    }

    fn has_outgoing(&self, state: State) -> bool {
        self.graph
            .neighbors_directed(state, Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Copies all states and transitions of `other` into self. States listed
    /// in `identify` are mapped onto the given existing states, all others
    /// get fresh handles. Returns the full state map.
    fn absorb(
        &mut self,
        other: NFA<L>,
        mut identify: HashMap<State, State>,
    ) -> HashMap<State, State> {
        for state in other.states() {
            if !identify.contains_key(&state) {
                let fresh = self.add_state();
                identify.insert(state, fresh);
            }
        }

        for (from, to, labels) in other.graph.all_edges() {
            for label in labels {
                self.add_transition(identify[&from], label.clone(), identify[&to]);
            }
        }

        for letter in other.alphabet {
            insert_letter(&mut self.alphabet, letter);
        }

        identify
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::{Alphabet, Language};

    use super::*;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_concat() {
        let nfa = NFA::literal('a').concat(NFA::literal('b'));

        assert!(nfa.accepts(&word("ab")));
        assert!(!nfa.accepts(&word("a")));
        assert!(!nfa.accepts(&word("ba")));
        assert_eq!(nfa.state_count(), 3);
        assert_eq!(nfa.alphabet(), &['a', 'b']);
    }

    #[test]
    fn test_union_shares_terminals() {
        let nfa = NFA::literal('a').union(NFA::literal('b'));

        assert!(nfa.accepts(&word("a")));
        assert!(nfa.accepts(&word("b")));
        assert!(!nfa.accepts(&word("ab")));
        assert_eq!(nfa.state_count(), 2);
    }

    #[test]
    fn test_star_and_plus() {
        let star = NFA::literal('a').star();
        let plus = NFA::literal('a').plus();

        assert!(star.accepts(&word("")));
        assert!(star.accepts(&word("aaa")));
        assert!(!plus.accepts(&word("")));
        assert!(plus.accepts(&word("a")));
        assert!(plus.accepts(&word("aaaa")));
    }

    #[test]
    fn test_opt() {
        let nfa = NFA::literal('a').opt();

        assert!(nfa.accepts(&word("")));
        assert!(nfa.accepts(&word("a")));
        assert!(!nfa.accepts(&word("aa")));
        assert_eq!(nfa.state_count(), 2);
    }

    #[test]
    fn test_single_state_operands() {
        let eps = || NFA::<char>::empty_word(vec![]);

        let nfa = eps().concat(NFA::literal('a'));
        assert!(nfa.accepts(&word("a")));
        assert!(!nfa.accepts(&word("")));

        let nfa = NFA::literal('a').concat(eps());
        assert!(nfa.accepts(&word("a")));
        assert!(!nfa.accepts(&word("aa")));

        let nfa = NFA::literal('a').union(eps());
        assert!(nfa.accepts(&word("")));
        assert!(nfa.accepts(&word("a")));
        assert!(!nfa.accepts(&word("aa")));
    }

    #[test]
    fn test_union_with_looping_start() {
        // a start state with a loop must not leak into the other operand
        let looping = NFA::from_parts(
            [0, 1],
            ['a', 'b'],
            [
                (0, NFAEdge::Symbol('a'), 1),
                (1, NFAEdge::Symbol('b'), 0),
                (0, NFAEdge::Epsilon, 1),
            ],
            0,
            1,
        )
        .unwrap();
        let nfa = looping.union(NFA::literal('c'));

        assert!(nfa.accepts(&word("c")));
        assert!(nfa.accepts(&word("aba")));
        assert!(!nfa.accepts(&word("abc")));
        assert!(!nfa.accepts(&word("cb")));
    }
}
