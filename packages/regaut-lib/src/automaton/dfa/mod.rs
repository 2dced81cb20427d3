use itertools::Itertools;
use node::DfaNode;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    automaton::{
        Alphabet, AutomatonView, Language, Letter, State,
        index_map::IndexSet,
        insert_letter,
        nfa::{NFA, NFAEdge},
        normalize_alphabet,
    },
    error::AutomatonError,
};

pub mod minimization;
pub mod node;

fn index_of(state: State) -> NodeIndex {
    NodeIndex::new(state.index())
}

fn state_of(node: NodeIndex) -> State {
    State::new(node.index())
}

/// A deterministic finite automaton. Missing transitions lead to an implicit
/// rejecting sink, so the automaton may be partial.
///
/// States are the compact range `0..state_count`.
#[derive(Debug, Clone)]
pub struct DFA<L: Letter> {
    start: NodeIndex,
    graph: DiGraph<DfaNode, L>,
    alphabet: Vec<L>,
}

impl<L: Letter> DFA<L> {
    /// Creates a DFA with a single non-accepting start state and no
    /// transitions.
    pub fn new(alphabet: Vec<L>) -> Self {
        let mut graph = DiGraph::new();
        let start = graph.add_node(DfaNode::non_accepting());

        DFA {
            start,
            graph,
            alphabet: normalize_alphabet(alphabet),
        }
    }

    pub(crate) fn from_nodes(alphabet: Vec<L>, nodes: Vec<DfaNode>, start: State) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len() * alphabet.len());
        for data in nodes {
            graph.add_node(data);
        }
        assert!(start.index() < graph.node_count(), "Start must be a state");

        DFA {
            start: index_of(start),
            graph,
            alphabet: normalize_alphabet(alphabet),
        }
    }

    /// Builds a DFA from explicit parts. The given ids are mapped onto the
    /// compact state range in ascending order. Symbols used by transitions
    /// are added to the alphabet.
    pub fn from_parts(
        states: impl IntoIterator<Item = u32>,
        alphabet: impl IntoIterator<Item = L>,
        transitions: impl IntoIterator<Item = (u32, L, u32)>,
        start: u32,
        finals: impl IntoIterator<Item = u32>,
    ) -> Result<Self, AutomatonError> {
        let ids = states.into_iter().sorted().dedup().collect_vec();
        let lookup = |id: u32| ids.binary_search(&id).ok().map(State::new);

        let start = lookup(start).ok_or(AutomatonError::StartNotInStates(start))?;
        let mut nodes = vec![DfaNode::non_accepting(); ids.len()];
        for id in finals {
            let index = lookup(id).ok_or(AutomatonError::FinalNotInStates(id))?;
            nodes[index.index()].accepting = true;
        }

        let mut dfa = DFA::from_nodes(alphabet.into_iter().collect(), nodes, start);
        for (from, symbol, to) in transitions {
            let source = lookup(from).ok_or(AutomatonError::UnknownTransitionState(from))?;
            let target = lookup(to).ok_or(AutomatonError::UnknownTransitionState(to))?;

            match dfa.successor(source, &symbol) {
                Some(existing) if existing == target => {}
                Some(_) => {
                    return Err(AutomatonError::NonDeterministic {
                        state: from,
                        symbol: format!("{:?}", symbol),
                    });
                }
                None => dfa.add_transition(source, target, symbol),
            }
        }

        Ok(dfa)
    }

    pub fn start(&self) -> State {
        state_of(self.start)
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn states(&self) -> Vec<State> {
        self.graph.node_indices().map(state_of).collect()
    }

    pub fn is_final(&self, state: State) -> bool {
        self.graph[index_of(state)].accepting
    }

    pub fn is_trap(&self, state: State) -> bool {
        self.graph[index_of(state)].trap
    }

    pub fn final_states(&self) -> Vec<State> {
        self.graph
            .node_indices()
            .filter(|n| self.graph[*n].accepting)
            .map(state_of)
            .collect()
    }

    pub fn set_accepting(&mut self, state: State, accepting: bool) {
        let data = &mut self.graph[index_of(state)];
        data.accepting = accepting;
        if accepting {
            data.trap = false;
        }
    }

    pub(crate) fn mark_trap(&mut self, state: State) {
        self.graph[index_of(state)] = DfaNode::trap();
    }

    pub fn add_state(&mut self, accepting: bool) -> State {
        state_of(self.graph.add_node(DfaNode::new(accepting, false)))
    }

    /// Adds a transition. Adding a transition that already exists does
    /// nothing.
    ///
    /// Panics if `from` already has a transition on `symbol` to another
    /// state.
    pub fn add_transition(&mut self, from: State, to: State, symbol: L) {
        if let Some(target) = self.successor(from, &symbol) {
            if target != to {
                panic!(
                    "Transition conflict, adding the new transition causes this automaton to no longer be a DFA. Existing: {:?} -{:?}-> {:?}. New: {:?} -{:?}-> {:?}",
                    from, symbol, target, from, symbol, to
                );
            }
            return;
        }

        insert_letter(&mut self.alphabet, symbol.clone());
        self.graph.add_edge(index_of(from), index_of(to), symbol);
    }

    pub fn successor(&self, from: State, symbol: &L) -> Option<State> {
        self.graph
            .edges_directed(index_of(from), Direction::Outgoing)
            .find(|edge| edge.weight() == symbol)
            .map(|edge| state_of(edge.target()))
    }

    /// All transitions, sorted by source, symbol and target.
    pub fn transitions(&self) -> Vec<(State, &L, State)> {
        self.graph
            .edge_references()
            .map(|edge| (state_of(edge.source()), edge.weight(), state_of(edge.target())))
            .sorted()
            .collect()
    }

    /// Checks if every state has a transition for every letter of the
    /// alphabet.
    pub fn is_complete(&self) -> bool {
        self.graph.node_indices().all(|n| {
            self.graph.edges_directed(n, Direction::Outgoing).count() == self.alphabet.len()
        })
    }

    /// Returns a complete copy of self. If any transition is missing, a trap
    /// state is added that receives all missing transitions.
    pub fn complete(&self) -> Self {
        let mut completed = self.clone();

        let missing = self
            .states()
            .into_iter()
            .cartesian_product(self.alphabet.iter())
            .filter(|(s, letter)| self.successor(*s, letter).is_none())
            .collect_vec();

        if missing.is_empty() {
            return completed;
        }

        let trap = completed.add_state(false);
        completed.mark_trap(trap);
        for (s, letter) in missing {
            completed.add_transition(s, trap, letter.clone());
        }
        for letter in self.alphabet.iter() {
            completed.add_transition(trap, trap, letter.clone());
        }

        completed
    }

    /// States reachable from the start state.
    pub fn reachable_states(&self) -> IndexSet<NodeIndex> {
        self.search(vec![self.start], Direction::Outgoing)
    }

    /// States from which some accepting state is reachable.
    pub fn productive_states(&self) -> IndexSet<NodeIndex> {
        let finals = self.final_states().into_iter().map(index_of).collect();
        self.search(finals, Direction::Incoming)
    }

    fn search(&self, roots: Vec<NodeIndex>, direction: Direction) -> IndexSet<NodeIndex> {
        let mut visited = IndexSet::new(self.state_count());
        let mut stack = Vec::new();
        for root in roots {
            if visited.insert(root) {
                stack.push(root);
            }
        }

        while let Some(current) = stack.pop() {
            for next in self.graph.neighbors_directed(current, direction) {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        visited
    }

    /// Lifts the DFA into an equivalent NFA. The NFA keeps the state numbers
    /// and gets one extra final state, reached by ε-transitions from every
    /// accepting state.
    pub fn to_nfa(&self) -> NFA<L> {
        let count = self.state_count();
        let final_state = State::new(count);
        let mut nfa = NFA::with_states(self.alphabet.clone(), count + 1, self.start(), final_state);

        for (from, symbol, to) in self.transitions() {
            nfa.add_transition(from, NFAEdge::Symbol(symbol.clone()), to);
        }
        for accepting in self.final_states() {
            nfa.add_transition(accepting, NFAEdge::Epsilon, final_state);
        }

        nfa
    }
}

impl<L: Letter> Alphabet for DFA<L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        &self.alphabet
    }
}

impl<L: Letter> Language for DFA<L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        let mut current = self.start();
        for symbol in input {
            match self.successor(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }

        self.is_final(current)
    }
}

impl<L: Letter> AutomatonView for DFA<L> {
    type Label = L;

    fn view_states(&self) -> Vec<State> {
        self.states()
    }

    fn view_start(&self) -> State {
        self.start()
    }

    fn view_is_final(&self, state: State) -> bool {
        self.is_final(state)
    }

    fn view_edges(&self) -> Vec<(State, State, Vec<&L>)> {
        self.transitions()
            .into_iter()
            .sorted_by(|a, b| (a.0, a.2, a.1).cmp(&(b.0, b.2, b.1)))
            .chunk_by(|(from, _, to)| (*from, *to))
            .into_iter()
            .map(|((from, to), group)| (from, to, group.map(|(_, symbol, _)| symbol).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_as() -> DFA<char> {
        DFA::from_parts(
            [0, 1],
            ['a', 'b'],
            [(0, 'a', 1), (1, 'a', 0), (0, 'b', 0), (1, 'b', 1)],
            0,
            [0],
        )
        .unwrap()
    }

    #[test]
    fn test_accepts() {
        let dfa = even_as();

        assert!(dfa.accepts(&[]));
        assert!(dfa.accepts(&['a', 'b', 'a']));
        assert!(!dfa.accepts(&['a', 'b']));
        assert!(!dfa.accepts(&['c']));
        assert!(dfa.is_complete());
    }

    #[test]
    fn test_from_parts_rejects_non_determinism() {
        let result = DFA::from_parts([0, 1], ['a'], [(0, 'a', 1), (0, 'a', 0)], 0, [1]);

        assert_eq!(
            result.unwrap_err(),
            AutomatonError::NonDeterministic {
                state: 0,
                symbol: "'a'".to_string()
            }
        );
    }

    #[test]
    fn test_from_parts_compacts_ids() {
        let dfa = DFA::from_parts([10, 20], ['a'], [(20, 'a', 10)], 20, [10]).unwrap();

        assert_eq!(dfa.start(), State(1));
        assert_eq!(dfa.final_states(), vec![State(0)]);
        assert!(dfa.accepts(&['a']));
    }

    #[test]
    #[should_panic]
    fn test_add_transition_conflict() {
        let mut dfa = even_as();
        dfa.add_transition(State(0), State(0), 'a');
    }

    #[test]
    fn test_complete() {
        let dfa = DFA::from_parts([0, 1], ['a', 'b'], [(0, 'a', 1)], 0, [1]).unwrap();
        assert!(!dfa.is_complete());

        let completed = dfa.complete();
        assert!(completed.is_complete());
        assert_eq!(completed.state_count(), 3);
        assert!(completed.is_trap(State(2)));
        assert!(completed.accepts(&['a']));
        assert!(!completed.accepts(&['a', 'b']));
    }

    #[test]
    fn test_to_nfa() {
        let dfa = even_as();
        let nfa = dfa.to_nfa();

        assert_eq!(nfa.state_count(), 3);
        assert_eq!(nfa.final_state(), State(2));
        assert!(nfa.has_transition(State(0), &NFAEdge::Epsilon, State(2)));
        for word in [vec![], vec!['a'], vec!['a', 'a'], vec!['b', 'a', 'b']] {
            assert_eq!(nfa.accepts(&word), dfa.accepts(&word));
        }
    }
}
