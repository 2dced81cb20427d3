use std::{fmt::Debug, hash::Hash};

use serde::{Deserialize, Serialize};

pub mod dfa;
pub mod index_map;
pub mod nfa;
pub mod render;

/// An opaque handle for a state of an automaton.
///
/// NFAs allocate handles monotonically and never hand out the same handle
/// twice, except when explicitly renumbering. DFA states are always the
/// compact range `0..state_count`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct State(pub u32);

impl State {
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "State index {} does not fit into the state space",
            index
        );
        State(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can be used as an input symbol of an automaton.
pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

pub trait Alphabet {
    type Letter: Letter;

    /// The alphabet, sorted and free of duplicates.
    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}

/// A pure read of the structure of an automaton. This is everything a
/// renderer needs, see [render::to_graphviz].
pub trait AutomatonView: Alphabet {
    /// The label type carried by the edges.
    type Label: Debug;

    fn view_states(&self) -> Vec<State>;
    fn view_start(&self) -> State;
    fn view_is_final(&self, state: State) -> bool;
    /// All edges grouped by their (source, target) pair, sorted by the pair.
    fn view_edges(&self) -> Vec<(State, State, Vec<&Self::Label>)>;
}

/// Inserts a letter into a sorted, duplicate free alphabet.
pub(crate) fn insert_letter<L: Letter>(alphabet: &mut Vec<L>, letter: L) {
    if let Err(position) = alphabet.binary_search(&letter) {
        alphabet.insert(position, letter);
    }
}

pub(crate) fn normalize_alphabet<L: Letter>(mut alphabet: Vec<L>) -> Vec<L> {
    alphabet.sort();
    alphabet.dedup();
    alphabet
}

#[test]
fn test_insert_letter_keeps_alphabet_sorted() {
    let mut alphabet = normalize_alphabet(vec!['c', 'a', 'c']);
    insert_letter(&mut alphabet, 'b');
    insert_letter(&mut alphabet, 'a');
    assert_eq!(alphabet, vec!['a', 'b', 'c']);
}
