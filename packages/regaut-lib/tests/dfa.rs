use itertools::Itertools;
use regaut_lib::{
    automaton::{Alphabet, Language, State, dfa::DFA},
    error::AutomatonError,
    regex::compiler::parse_regex_as_nfa,
    validation::same_language::assert_same_language,
};

fn word(s: &str) -> Vec<char> {
    s.chars().collect_vec()
}

/// `(ab)*` over `{a, b}`, partial.
fn ab_star() -> DFA<char> {
    DFA::from_parts([0, 1], ['a', 'b'], [(0, 'a', 1), (1, 'b', 0)], 0, [0]).unwrap()
}

#[test]
fn test_dfa() {
    let dfa = ab_star();

    assert!(dfa.accepts(&word("")));
    assert!(dfa.accepts(&word("ababab")));
    assert!(!dfa.accepts(&word("ababa")));
    assert!(!dfa.accepts(&word("bb")));
    assert!(!dfa.is_complete());
}

#[test]
fn test_from_parts_validation() {
    assert_eq!(
        DFA::<char>::from_parts([0, 1], [], [], 2, []).unwrap_err(),
        AutomatonError::StartNotInStates(2)
    );
    assert_eq!(
        DFA::<char>::from_parts([0, 1], [], [], 0, [4]).unwrap_err(),
        AutomatonError::FinalNotInStates(4)
    );
    assert_eq!(
        DFA::from_parts([0, 1], [], [(0, 'a', 9)], 0, []).unwrap_err(),
        AutomatonError::UnknownTransitionState(9)
    );
    assert!(matches!(
        DFA::from_parts([0, 1], [], [(0, 'a', 1), (0, 'a', 0)], 0, []).unwrap_err(),
        AutomatonError::NonDeterministic { state: 0, .. }
    ));
}

#[test]
fn test_from_parts_compacts_ids() {
    let dfa = DFA::from_parts([10, 20, 30], [], [(10, 'x', 30)], 10, [30]).unwrap();

    assert_eq!(dfa.states(), vec![State(0), State(1), State(2)]);
    assert_eq!(dfa.successor(State(0), &'x'), Some(State(2)));
    assert_eq!(dfa.final_states(), vec![State(2)]);
}

#[test]
fn test_complete() {
    let dfa = ab_star();
    let complete = dfa.complete();

    assert!(complete.is_complete());
    assert_eq!(complete.state_count(), 3);
    assert_eq!(complete.states().iter().filter(|s| complete.is_trap(**s)).count(), 1);
    assert_same_language(&dfa, &complete, 6);

    // completing twice changes nothing
    assert_eq!(complete.complete().state_count(), 3);
}

#[test]
fn test_subset_construction_marks_trap() {
    let nfa = parse_regex_as_nfa("ab").unwrap();

    let partial = nfa.to_dfa(false);
    let complete = nfa.to_dfa(true);

    assert_eq!(partial.state_count(), 3);
    assert_eq!(complete.state_count(), 4);
    assert!(complete.is_complete());
    assert!(complete.states().iter().any(|s| complete.is_trap(*s)));
    assert_eq!(partial.start(), State(0));
    assert_same_language(&partial, &complete, 5);
}

#[test]
fn test_to_nfa() {
    let dfa = ab_star();
    let nfa = dfa.to_nfa();

    assert_eq!(nfa.state_count(), dfa.state_count() + 1);
    assert_eq!(nfa.final_state(), State(2));
    assert_eq!(nfa.alphabet(), dfa.alphabet());
    assert_same_language(&dfa, &nfa, 6);
}

#[test]
fn test_empty_dfa() {
    let dfa = DFA::new(vec!['a']);

    assert_eq!(dfa.state_count(), 1);
    assert!(!dfa.accepts(&word("")));
    assert!(!dfa.accepts(&word("a")));
}
