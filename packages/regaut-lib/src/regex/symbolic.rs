//! Symbolic edge labels for state elimination. Instead of gluing strings
//! together, labels are kept as postfix token sequences so the synthesized
//! regex can be simplified and rendered at the end.

use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        Letter,
        nfa::{NFAEdge, elimination::EdgeCombiner},
    },
    regex::{Operator, Postfix, Token, compiler::construct_string, escape},
};

/// An edge label that is either a plain input symbol or a whole regex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Annotated<S> {
    Literal(S),
    Expression(Postfix<S>),
}

impl<S: Clone> Annotated<S> {
    pub fn tokens(&self) -> Vec<Token<S>> {
        match self {
            Annotated::Literal(s) => vec![Token::Literal(s.clone())],
            Annotated::Expression(postfix) => postfix.tokens().to_vec(),
        }
    }
}

impl<S: Display> Display for Annotated<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Annotated::Literal(s) => write!(f, "{}", escape(&s.to_string())),
            Annotated::Expression(postfix) => match construct_string(postfix) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "{}", postfix),
            },
        }
    }
}

/// The postfix tokens of a label, ε being the empty sequence.
pub fn label_tokens<S: Clone>(label: &NFAEdge<Annotated<S>>) -> Vec<Token<S>> {
    match label {
        NFAEdge::Symbol(annotated) => annotated.tokens(),
        NFAEdge::Epsilon => Vec::new(),
    }
}

/// The label for a postfix token sequence, ε for the empty sequence.
pub fn tokens_label<S>(tokens: Vec<Token<S>>) -> NFAEdge<Annotated<S>> {
    if tokens.is_empty() {
        NFAEdge::Epsilon
    } else {
        NFAEdge::Symbol(Annotated::Expression(Postfix::new(tokens)))
    }
}

/// The quantifier equivalent to applying `outer` to an expression whose
/// top operator is the quantifier `inner`, e.g. `(E*)+` is `E*`.
pub const fn collapse_quantifiers(inner: Operator, outer: Operator) -> Option<Operator> {
    use Operator::{Optional, Plus, Star};

    match (inner, outer) {
        (Star, Star | Plus | Optional) => Some(Star),
        (Plus, Star | Optional) => Some(Star),
        (Plus, Plus) => Some(Plus),
        (Optional, Star | Plus) => Some(Star),
        (Optional, Optional) => Some(Optional),
        _ => None,
    }
}

/// Applies `operator` to all non-empty operands, in postfix form. A binary
/// operator joins `n` operands with `n - 1` applications. Operands of a
/// commutative operator are ordered by length, shortest first. Empty operands
/// stand for ε and are skipped. If no operand is left the result is empty.
///
/// Applying a quantifier to an expression that already ends in a quantifier
/// merges the two, see [collapse_quantifiers].
///
/// Panics if a unary operator gets more than one non-empty operand, or if
/// `operator` is a group token.
pub fn op_if_nonempty<S: Clone>(operator: Operator, mut operands: Vec<Vec<Token<S>>>) -> Vec<Token<S>> {
    assert!(
        operator.arity() > 0,
        "Group token {:?} cannot be applied",
        operator
    );

    if operator.is_commutative() {
        operands.sort_by_key(Vec::len);
    }

    let operands = operands.into_iter().filter(|o| !o.is_empty()).collect_vec();
    let count = operands.len();
    if count == 0 {
        return Vec::new();
    }
    assert!(
        operator.arity() == 2 || count == 1,
        "Invalid number of operands {} for {:?}",
        count,
        operator
    );

    let mut result = operands.into_iter().flatten().collect_vec();
    let mut applied = operator;
    if let Some(inner) = result.last().and_then(Token::operator)
        && let Some(collapsed) = collapse_quantifiers(inner, operator)
    {
        applied = collapsed;
        result.pop();
    }

    let applications = if operator.arity() == 1 { 1 } else { count - 1 };
    result.extend(std::iter::repeat_n(Token::Operator(applied), applications));
    result
}

/// Combines [Annotated] labels into postfix expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostfixCombiner;

impl<S: Letter> EdgeCombiner<Annotated<S>> for PostfixCombiner {
    fn combine_path(
        &self,
        pre: &NFAEdge<Annotated<S>>,
        loops: &[Annotated<S>],
        post: &NFAEdge<Annotated<S>>,
    ) -> NFAEdge<Annotated<S>> {
        let pre = label_tokens(pre);
        let post = label_tokens(post);
        let repeat = loops.iter().fold(Vec::new(), |repeat, label| {
            op_if_nonempty(Operator::Alternation, vec![label.tokens(), repeat])
        });

        let tokens = if pre == repeat {
            // with post == repeat as well this is `R+R`
            let plus = op_if_nonempty(Operator::Plus, vec![repeat]);
            op_if_nonempty(Operator::Concat, vec![plus, post])
        } else if post == repeat {
            let plus = op_if_nonempty(Operator::Plus, vec![repeat]);
            op_if_nonempty(Operator::Concat, vec![pre, plus])
        } else {
            let star = op_if_nonempty(Operator::Star, vec![repeat]);
            op_if_nonempty(Operator::Concat, vec![pre, star, post])
        };

        tokens_label(tokens)
    }

    fn combine_parallel(&self, labels: &[&NFAEdge<Annotated<S>>]) -> NFAEdge<Annotated<S>> {
        let mut union = Vec::new();
        let mut optional = false;

        for label in labels {
            let tokens = label_tokens(label);
            if tokens.is_empty() {
                optional = true;
            } else {
                union = op_if_nonempty(Operator::Alternation, vec![union, tokens]);
            }
        }

        if optional {
            union = op_if_nonempty(Operator::Optional, vec![union]);
        }

        tokens_label(union)
    }

    fn label_weight(&self, label: &NFAEdge<Annotated<S>>) -> usize {
        label_tokens(label).len()
    }
}

/// Renders a group of parallel labels as a single regex, `ε` for the empty
/// word.
pub fn postfix_edge_label<S: Letter + Display>(labels: &[&NFAEdge<Annotated<S>>]) -> String {
    let tokens = match PostfixCombiner.combine_parallel(labels) {
        NFAEdge::Symbol(annotated) => annotated.tokens(),
        NFAEdge::Epsilon => return "ε".to_string(),
    };

    let postfix = Postfix::new(tokens);
    construct_string(&postfix).unwrap_or_else(|_| postfix.to_string())
}
