use std::{collections::BTreeSet, fmt::Display};

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::{Direction, graphmap::DiGraphMap};

use crate::{
    automaton::{
        Alphabet, AutomatonView, Language, Letter, State, insert_letter, normalize_alphabet,
    },
    error::AutomatonError,
};

pub mod combinators;
pub mod determinize;
pub mod elimination;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NFAEdge<L> {
    Symbol(L),
    Epsilon,
}

impl<L> NFAEdge<L> {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, NFAEdge::Epsilon)
    }

    pub fn symbol(&self) -> Option<&L> {
        match self {
            NFAEdge::Symbol(s) => Some(s),
            NFAEdge::Epsilon => None,
        }
    }

    pub fn map<M>(&self, f: impl FnOnce(&L) -> M) -> NFAEdge<M> {
        match self {
            NFAEdge::Symbol(s) => NFAEdge::Symbol(f(s)),
            NFAEdge::Epsilon => NFAEdge::Epsilon,
        }
    }
}

impl<L> From<Option<L>> for NFAEdge<L> {
    fn from(value: Option<L>) -> Self {
        match value {
            Some(e) => NFAEdge::Symbol(e),
            None => NFAEdge::Epsilon,
        }
    }
}

impl<L: Display> Display for NFAEdge<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NFAEdge::Symbol(s) => write!(f, "{}", s),
            NFAEdge::Epsilon => write!(f, "ε"),
        }
    }
}

/// A nondeterministic finite automaton with ε-transitions, a single start
/// state and a single final state.
///
/// All labels between the same pair of states are stored together on one
/// graph edge, so that parallel transitions can be inspected and merged as a
/// whole. State handles are allocated from a monotone counter and are never
/// reused after a state is removed.
#[derive(Debug, Clone)]
pub struct NFA<L: Letter> {
    graph: DiGraphMap<State, BTreeSet<NFAEdge<L>>>,
    alphabet: Vec<L>,
    start: State,
    final_state: State,
    next_state: u32,
}

impl<L: Letter> NFA<L> {
    /// Creates an automaton with a distinct start and final state and no
    /// transitions. It accepts nothing.
    pub fn new(alphabet: Vec<L>) -> Self {
        NFA::with_states(alphabet, 2, State(0), State(1))
    }

    /// The automaton with a single state that is both start and final. It
    /// accepts exactly the empty word.
    pub fn empty_word(alphabet: Vec<L>) -> Self {
        NFA::with_states(alphabet, 1, State(0), State(0))
    }

    /// The two state automaton accepting exactly the one letter word `symbol`.
    pub fn literal(symbol: L) -> Self {
        let mut nfa = NFA::new(vec![symbol.clone()]);
        nfa.add_transition(nfa.start, NFAEdge::Symbol(symbol), nfa.final_state);
        nfa
    }

    /// Creates an automaton with the states `0..state_count`.
    pub(crate) fn with_states(
        alphabet: Vec<L>,
        state_count: usize,
        start: State,
        final_state: State,
    ) -> Self {
        let mut graph = DiGraphMap::new();
        for index in 0..state_count {
            graph.add_node(State::new(index));
        }
        assert!(graph.contains_node(start), "Start state must be a state");
        assert!(
            graph.contains_node(final_state),
            "Final state must be a state"
        );

        NFA {
            graph,
            alphabet: normalize_alphabet(alphabet),
            start,
            final_state,
            next_state: state_count as u32,
        }
    }

    /// Builds an automaton from explicit parts. Symbols used by transitions
    /// are added to the alphabet.
    pub fn from_parts(
        states: impl IntoIterator<Item = u32>,
        alphabet: impl IntoIterator<Item = L>,
        transitions: impl IntoIterator<Item = (u32, NFAEdge<L>, u32)>,
        start: u32,
        final_state: u32,
    ) -> Result<Self, AutomatonError> {
        let mut graph = DiGraphMap::new();
        for state in states {
            graph.add_node(State(state));
        }

        if !graph.contains_node(State(start)) {
            return Err(AutomatonError::StartNotInStates(start));
        }
        if !graph.contains_node(State(final_state)) {
            return Err(AutomatonError::FinalNotInStates(final_state));
        }

        // ids must leave room for the allocator to hand out the next one
        let mut next_state = 0;
        for state in graph.nodes() {
            let after = state
                .0
                .checked_add(1)
                .ok_or(AutomatonError::StateIdOutOfRange(state.0))?;
            next_state = next_state.max(after);
        }
        let mut nfa = NFA {
            graph,
            alphabet: normalize_alphabet(alphabet.into_iter().collect()),
            start: State(start),
            final_state: State(final_state),
            next_state,
        };

        for (from, label, to) in transitions {
            for state in [from, to] {
                if !nfa.contains_state(State(state)) {
                    return Err(AutomatonError::UnknownTransitionState(state));
                }
            }
            nfa.add_transition(State(from), label, State(to));
        }

        Ok(nfa)
    }

    pub fn start(&self) -> State {
        self.start
    }

    pub fn final_state(&self) -> State {
        self.final_state
    }

    pub fn set_start(&mut self, state: State) {
        assert!(self.contains_state(state), "Unknown state {:?}", state);
        self.start = state;
    }

    pub fn set_final(&mut self, state: State) {
        assert!(self.contains_state(state), "Unknown state {:?}", state);
        self.final_state = state;
    }

    pub fn contains_state(&self, state: State) -> bool {
        self.graph.contains_node(state)
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All states in ascending order.
    pub fn states(&self) -> Vec<State> {
        self.graph.nodes().sorted().collect()
    }

    /// The number of labelled transitions, counting parallel labels
    /// separately.
    pub fn transition_count(&self) -> usize {
        self.graph.all_edges().map(|(_, _, labels)| labels.len()).sum()
    }

    /// All transitions, sorted by source, target and label.
    pub fn transitions(&self) -> Vec<(State, &NFAEdge<L>, State)> {
        self.graph
            .all_edges()
            .flat_map(|(from, to, labels)| labels.iter().map(move |label| (from, label, to)))
            .sorted_by(|a, b| (a.0, a.2, a.1).cmp(&(b.0, b.2, b.1)))
            .collect()
    }

    /// The labels of the transitions from `from` to `to`.
    pub fn labels_between(&self, from: State, to: State) -> Option<&BTreeSet<NFAEdge<L>>> {
        self.graph.edge_weight(from, to)
    }

    pub fn has_transition(&self, from: State, label: &NFAEdge<L>, to: State) -> bool {
        self.labels_between(from, to)
            .is_some_and(|labels| labels.contains(label))
    }

    pub fn add_state(&mut self) -> State {
        assert!(self.next_state < u32::MAX, "NFA state space exhausted");

        let state = State(self.next_state);
        self.next_state += 1;
        self.graph.add_node(state);
        state
    }

    /// Adds a transition, returning false if it was already present. Both
    /// states must exist.
    pub fn add_transition(&mut self, from: State, label: NFAEdge<L>, to: State) -> bool {
        assert!(self.contains_state(from), "Unknown state {:?}", from);
        assert!(self.contains_state(to), "Unknown state {:?}", to);

        if let NFAEdge::Symbol(symbol) = &label {
            insert_letter(&mut self.alphabet, symbol.clone());
        }

        match self.graph.edge_weight_mut(from, to) {
            Some(labels) => labels.insert(label),
            None => {
                self.graph.add_edge(from, to, BTreeSet::from([label]));
                true
            }
        }
    }

    pub fn remove_transition(&mut self, from: State, label: &NFAEdge<L>, to: State) -> bool {
        let Some(labels) = self.graph.edge_weight_mut(from, to) else {
            return false;
        };

        let removed = labels.remove(label);
        if labels.is_empty() {
            self.graph.remove_edge(from, to);
        }
        removed
    }

    /// Removes a state together with all its transitions.
    pub(crate) fn remove_state(&mut self, state: State) {
        assert!(
            state != self.start && state != self.final_state,
            "Cannot remove the start or final state"
        );
        self.graph.remove_node(state);
    }

    /// The states reachable from `state` by a single transition with `label`.
    pub fn targets(&self, state: State, label: &NFAEdge<L>) -> Vec<State> {
        self.graph
            .neighbors_directed(state, Direction::Outgoing)
            .filter(|&next| self.has_transition(state, label, next))
            .collect()
    }

    /// The transitions entering and leaving `state`, as `(source, label)` and
    /// `(target, label)` pairs. Self-loops appear in both lists.
    #[allow(clippy::type_complexity)]
    pub fn in_out_sets(
        &self,
        state: State,
    ) -> (Vec<(State, &NFAEdge<L>)>, Vec<(State, &NFAEdge<L>)>) {
        let incoming = self
            .graph
            .neighbors_directed(state, Direction::Incoming)
            .sorted()
            .flat_map(|source| {
                self.graph
                    .edge_weight(source, state)
                    .into_iter()
                    .flatten()
                    .map(move |label| (source, label))
            })
            .collect();
        let outgoing = self
            .graph
            .neighbors_directed(state, Direction::Outgoing)
            .sorted()
            .flat_map(|target| {
                self.graph
                    .edge_weight(state, target)
                    .into_iter()
                    .flatten()
                    .map(move |label| (target, label))
            })
            .collect();

        (incoming, outgoing)
    }

    /// All states reachable from `state` using only ε-transitions. `state`
    /// itself is part of the result only if `include_state` is set or it lies
    /// on an ε-cycle.
    pub fn eps_closure(&self, state: State, include_state: bool) -> BTreeSet<State> {
        let mut closure = BTreeSet::new();
        if include_state {
            closure.insert(state);
        }

        let mut stack = vec![state];
        while let Some(current) = stack.pop() {
            for next in self.targets(current, &NFAEdge::Epsilon) {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// The states reachable from `state` by reading `symbol`. With
    /// `include_epsilon` the ε-closures before and after the symbol are taken
    /// into account.
    pub fn next_states(&self, state: State, symbol: &L, include_epsilon: bool) -> BTreeSet<State> {
        if self.alphabet.binary_search(symbol).is_err() {
            return BTreeSet::new();
        }

        let label = NFAEdge::Symbol(symbol.clone());
        if !include_epsilon {
            return self.targets(state, &label).into_iter().collect();
        }

        self.eps_closure(state, true)
            .into_iter()
            .flat_map(|source| self.targets(source, &label))
            .flat_map(|target| self.eps_closure(target, true))
            .collect()
    }

    /// Checks if a set of states contains the final state.
    pub fn is_accepting_set<'a>(&self, states: impl IntoIterator<Item = &'a State>) -> bool {
        states.into_iter().any(|s| *s == self.final_state)
    }

    /// Relabels every symbol, keeping the structure and state handles.
    pub fn map_labels<M: Letter>(&self, f: impl Fn(&L) -> M) -> NFA<M> {
        let mut graph = DiGraphMap::new();
        for state in self.graph.nodes() {
            graph.add_node(state);
        }
        for (from, to, labels) in self.graph.all_edges() {
            graph.add_edge(
                from,
                to,
                labels.iter().map(|label| label.map(&f)).collect(),
            );
        }

        NFA {
            graph,
            alphabet: normalize_alphabet(self.alphabet.iter().map(&f).collect()),
            start: self.start,
            final_state: self.final_state,
            next_state: self.next_state,
        }
    }

    /// Renumbers the states to `0..state_count`. The start state becomes 0,
    /// the remaining states keep their relative order.
    pub fn renumber(&mut self) {
        let order = std::iter::once(self.start)
            .chain(self.states().into_iter().filter(|s| *s != self.start))
            .collect_vec();
        let remap: HashMap<State, State> = order
            .iter()
            .enumerate()
            .map(|(index, state)| (*state, State::new(index)))
            .collect();

        let mut graph = DiGraphMap::new();
        for state in &order {
            graph.add_node(remap[state]);
        }
        for (from, to, labels) in self.graph.all_edges() {
            graph.add_edge(remap[&from], remap[&to], labels.clone());
        }

        self.graph = graph;
        self.start = remap[&self.start];
        self.final_state = remap[&self.final_state];
        self.next_state = order.len() as u32;
    }
}

impl<L: Letter> Alphabet for NFA<L> {
    type Letter = L;

    fn alphabet(&self) -> &[L] {
        &self.alphabet
    }
}

impl<L: Letter> Language for NFA<L> {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a L>) -> bool
    where
        L: 'a,
    {
        let mut current_states = self.eps_closure(self.start, true);

        for symbol in input {
            current_states = current_states
                .iter()
                .flat_map(|&state| self.next_states(state, symbol, true))
                .collect();

            if current_states.is_empty() {
                return false;
            }
        }

        self.is_accepting_set(&current_states)
    }
}

impl<L: Letter> AutomatonView for NFA<L> {
    type Label = NFAEdge<L>;

    fn view_states(&self) -> Vec<State> {
        self.states()
    }

    fn view_start(&self) -> State {
        self.start
    }

    fn view_is_final(&self, state: State) -> bool {
        state == self.final_state
    }

    fn view_edges(&self) -> Vec<(State, State, Vec<&NFAEdge<L>>)> {
        self.graph
            .all_edges()
            .map(|(from, to, labels)| (from, to, labels.iter().collect_vec()))
            .sorted_by_key(|(from, to, _)| (*from, *to))
            .collect()
    }
}
