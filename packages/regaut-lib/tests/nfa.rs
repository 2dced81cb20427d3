use itertools::Itertools;
use regaut_lib::{
    automaton::{
        Alphabet, Language, State,
        nfa::{NFA, NFAEdge, elimination::RegexStringCombiner},
    },
    error::AutomatonError,
    regex::compiler::parse_regex_as_nfa,
    validation::same_language::{assert_language_matches, assert_same_language},
};

fn word(s: &str) -> Vec<char> {
    s.chars().collect_vec()
}

#[test]
fn test_from_parts_validation() {
    let nfa = NFA::from_parts([0, 1, 2], [], [(0, NFAEdge::Symbol('a'), 1)], 0, 2).unwrap();
    assert_eq!(nfa.alphabet(), &['a']);
    assert_eq!(nfa.state_count(), 3);

    assert_eq!(
        NFA::<char>::from_parts([0, 1], [], [], 5, 1).unwrap_err(),
        AutomatonError::StartNotInStates(5)
    );
    assert_eq!(
        NFA::<char>::from_parts([0, 1], [], [], 0, 7).unwrap_err(),
        AutomatonError::FinalNotInStates(7)
    );
    assert_eq!(
        NFA::from_parts([0, 1], [], [(0, NFAEdge::Symbol('a'), 3)], 0, 1).unwrap_err(),
        AutomatonError::UnknownTransitionState(3)
    );
}

#[test]
fn test_eps_closure_and_next_states() {
    // 0 -ε-> 1 -a-> 2 -ε-> 3
    let nfa = NFA::from_parts(
        [0, 1, 2, 3],
        ['a', 'b'],
        [
            (0, NFAEdge::Epsilon, 1),
            (1, NFAEdge::Symbol('a'), 2),
            (2, NFAEdge::Epsilon, 3),
        ],
        0,
        3,
    )
    .unwrap();

    assert_eq!(
        nfa.eps_closure(State(0), true).into_iter().collect_vec(),
        vec![State(0), State(1)]
    );
    assert_eq!(
        nfa.eps_closure(State(0), false).into_iter().collect_vec(),
        vec![State(1)]
    );
    assert_eq!(
        nfa.next_states(State(1), &'a', true).into_iter().collect_vec(),
        vec![State(2), State(3)]
    );
    assert_eq!(
        nfa.next_states(State(1), &'a', false).into_iter().collect_vec(),
        vec![State(2)]
    );
    assert!(nfa.next_states(State(1), &'z', true).is_empty());
    assert!(nfa.accepts(&word("a")));
    assert!(!nfa.accepts(&word("b")));
}

#[test]
fn test_combinators() {
    let a = NFA::literal('a');
    let b = NFA::literal('b');

    let ab = a.clone().concat(b.clone());
    assert_language_matches(&ab, 4, |w| w == ['a', 'b']);

    let a_or_b = a.clone().union(b.clone());
    assert_language_matches(&a_or_b, 3, |w| w == ['a'] || w == ['b']);

    let a_star = a.clone().star();
    assert_language_matches(&a_star, 5, |w| w.iter().all(|c| *c == 'a'));

    let a_plus = a.clone().plus();
    assert_language_matches(&a_plus, 5, |w| !w.is_empty() && w.iter().all(|c| *c == 'a'));

    let a_opt = a.opt();
    assert_language_matches(&a_opt, 3, |w| w.is_empty() || w == ['a']);
}

#[test]
fn test_combinators_keep_terminals_distinct() {
    let nested = NFA::literal('a').star().union(NFA::literal('b').plus());

    assert_ne!(nested.start(), nested.final_state());
    assert!(nested.accepts(&word("")));
    assert!(nested.accepts(&word("aaa")));
    assert!(nested.accepts(&word("bb")));
    assert!(!nested.accepts(&word("ab")));
}

#[test]
fn test_accepts_long_input() {
    let nfa = parse_regex_as_nfa("(a|b)*a(a|b)").unwrap();
    let mut input = vec!['b'; 10_000];
    input.extend(['a', 'b']);

    assert!(nfa.accepts(&input));
}

#[test]
fn test_rip_safety() {
    let combiner = RegexStringCombiner;

    // 0 -a-> 1 -b-> 2, symbols on both sides of 1
    let mut joined = NFA::from_parts(
        [0, 1, 2],
        [],
        [
            (0, NFAEdge::Symbol("a".to_string()), 1),
            (1, NFAEdge::Symbol("b".to_string()), 2),
        ],
        0,
        2,
    )
    .unwrap();
    let before = joined.clone();
    assert!(joined.rip(State(1), true, &combiner).is_none());
    assert_eq!(joined.transitions(), before.transitions());

    // 0 -ε-> 1 -b-> 2
    let mut epsilon_side = NFA::from_parts(
        [0, 1, 2],
        [],
        [
            (0, NFAEdge::Epsilon, 1),
            (1, NFAEdge::Symbol("b".to_string()), 2),
        ],
        0,
        2,
    )
    .unwrap();
    assert!(epsilon_side.rip(State(1), true, &combiner).is_some());
    assert!(!epsilon_side.contains_state(State(1)));
    assert!(epsilon_side.accepts(&["b".to_string()]));

    // a symbol self loop cannot be ripped safely
    let mut looping = NFA::from_parts(
        [0, 1, 2],
        [],
        [
            (0, NFAEdge::Epsilon, 1),
            (1, NFAEdge::Symbol("a".to_string()), 1),
            (1, NFAEdge::Epsilon, 2),
        ],
        0,
        2,
    )
    .unwrap();
    assert!(looping.rip(State(1), true, &combiner).is_none());
    assert!(looping.rip(State(1), false, &combiner).is_some());
    assert!(looping.has_transition(
        State(0),
        &NFAEdge::Symbol("(a)*".to_string()),
        State(2)
    ));
}

#[test]
#[should_panic]
fn test_rip_start_panics() {
    let mut nfa = NFA::literal("a".to_string());
    let start = nfa.start();
    nfa.rip(start, false, &RegexStringCombiner);
}

#[test]
fn test_union_edges() {
    let mut nfa = NFA::from_parts(
        [0, 1],
        [],
        [
            (0, NFAEdge::Symbol("a".to_string()), 1),
            (0, NFAEdge::Symbol("b".to_string()), 1),
            (0, NFAEdge::Epsilon, 1),
        ],
        0,
        1,
    )
    .unwrap();
    nfa.union_edges(&RegexStringCombiner);

    assert_eq!(nfa.transition_count(), 1);
    let labels = nfa.labels_between(State(0), State(1)).unwrap();
    assert_eq!(
        labels.iter().next(),
        Some(&NFAEdge::Symbol("(a|b)?".to_string()))
    );
}

#[test]
fn test_renumber_keeps_language() {
    let original = parse_regex_as_nfa("a(b|c)*").unwrap();
    let mut renumbered = original.clone();
    renumbered.renumber();

    assert_eq!(renumbered.start(), State(0));
    assert_eq!(
        renumbered.states(),
        (0..original.state_count()).map(State::new).collect_vec()
    );
    assert_same_language(&original, &renumbered, 5);
}

#[test]
fn test_to_dfa_is_deterministic() {
    for regex in ["(a|b)*abb", "a*|b*", "(ab|a)(bb|b)", ""] {
        let nfa = parse_regex_as_nfa(regex).unwrap();

        for complete in [false, true] {
            let dfa = nfa.to_dfa(complete);
            let pairs = dfa
                .transitions()
                .into_iter()
                .map(|(from, symbol, _)| (from, *symbol))
                .collect_vec();
            assert_eq!(pairs.len(), pairs.iter().unique().count(), "{}", regex);
            if complete {
                assert!(dfa.is_complete(), "{}", regex);
            }

            assert_same_language(&nfa, &dfa, 6);
        }
    }
}
