use regaut_lib::{
    automaton::{
        State,
        dfa::minimization::Minimizable,
        nfa::{NFA, NFAEdge},
    },
    config::{EliminationConfig, EliminationOrder},
    elimination::{StateEliminator, synthesize, synthesize_string},
    regex::{
        compiler::{construct_nfa, construct_string, parse_regex_as_nfa},
        symbolic::PostfixCombiner,
    },
    validation::same_language::assert_same_language,
};

const REGEXES: [&str; 8] = [
    "a",
    "a|b",
    "a(aa)*b*",
    "(a|b)*abb",
    "(ab|ba)*",
    "a?b+c*",
    "((a|b)c)*|d",
    "(a*b)*a",
];

#[test]
fn test_alternation_of_two_letters() {
    let nfa = parse_regex_as_nfa("a|b").unwrap();
    let text = construct_string(&synthesize(&nfa, EliminationOrder::Heuristic).unwrap()).unwrap();

    assert!(text == "a|b" || text == "b|a", "{}", text);
}

#[test]
fn test_eliminate_leaves_two_states() {
    let nfa = parse_regex_as_nfa("(a|b)*abb")
        .unwrap()
        .map_labels(|c| c.to_string());
    let eliminator = StateEliminator::from_config(
        regaut_lib::automaton::nfa::elimination::RegexStringCombiner,
        &EliminationConfig::default(),
    );
    let reduced = eliminator.eliminate(nfa);

    assert_eq!(reduced.states(), vec![State(0), State(1)]);
    assert_eq!(reduced.start(), State(0));
    assert_eq!(reduced.final_state(), State(1));
    assert!(reduced.transition_count() <= 1);
}

#[test]
fn test_synthesized_regex_is_equivalent() {
    for regex in REGEXES {
        let nfa = parse_regex_as_nfa(regex).unwrap();

        for order in [EliminationOrder::Heuristic, EliminationOrder::Ascending] {
            let postfix = synthesize(&nfa, order).unwrap();
            let synthesized = construct_nfa(&postfix).unwrap();
            assert_same_language(&nfa, &synthesized, 6);

            let text = synthesize_string(&nfa, order).unwrap();
            let reparsed = parse_regex_as_nfa(&text).unwrap();
            assert_same_language(&nfa, &reparsed, 6);
        }
    }
}

#[test]
fn test_synthesis_from_minimized_dfa() {
    for regex in REGEXES {
        let nfa = parse_regex_as_nfa(regex).unwrap();
        let lifted = nfa.to_dfa(false).minimize().to_nfa();

        let postfix = synthesize(&lifted, EliminationOrder::Heuristic).unwrap();
        assert_same_language(&nfa, &construct_nfa(&postfix).unwrap(), 6);
    }
}

#[test]
fn test_expression_labels() {
    let eliminator = StateEliminator::new(PostfixCombiner, EliminationOrder::Heuristic);

    let empty = NFA::new(vec!['a']).map_labels(|c| regaut_lib::regex::symbolic::Annotated::Literal(*c));
    assert_eq!(eliminator.expression(empty), None);

    let epsilon = NFA::empty_word(vec!['a'])
        .map_labels(|c| regaut_lib::regex::symbolic::Annotated::Literal(*c));
    assert_eq!(eliminator.expression(epsilon), Some(NFAEdge::Epsilon));
}

#[test]
fn test_heuristic_is_not_worse_on_a_chain() {
    // a long chain with a fan out in the middle
    let nfa = parse_regex_as_nfa("ab(c|d|e|f)gh").unwrap();

    let heuristic = synthesize(&nfa, EliminationOrder::Heuristic).unwrap();
    let ascending = synthesize(&nfa, EliminationOrder::Ascending).unwrap();

    assert!(heuristic.literal_count() <= ascending.literal_count());
    assert_same_language(
        &construct_nfa(&heuristic).unwrap(),
        &construct_nfa(&ascending).unwrap(),
        7,
    );
}
