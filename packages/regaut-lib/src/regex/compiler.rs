use std::{fmt::Display, marker::PhantomData};

use crate::{
    automaton::{Letter, nfa::NFA},
    error::ParseError,
    regex::{Operator, Postfix, Token, escape, parser::parse_regex},
};

/// An interpretation of postfix regexes. [evaluate] folds a postfix
/// sequence into a single value of the algebra.
pub trait PostfixAlgebra<S> {
    type Value;

    /// The value of the empty postfix, i.e. the empty word.
    fn empty(&self) -> Self::Value;
    fn literal(&self, symbol: &S) -> Self::Value;
    fn unary(&self, operator: Operator, operand: Self::Value) -> Self::Value;
    fn binary(&self, operator: Operator, left: Self::Value, right: Self::Value) -> Self::Value;
}

pub fn evaluate<S, A: PostfixAlgebra<S>>(
    postfix: &Postfix<S>,
    algebra: &A,
) -> Result<A::Value, ParseError> {
    if postfix.is_empty() {
        return Ok(algebra.empty());
    }

    let mut stack = Vec::new();
    for token in postfix.tokens() {
        let operator = match token {
            Token::Literal(symbol) => {
                stack.push(algebra.literal(symbol));
                continue;
            }
            Token::Operator(operator) => *operator,
        };

        let missing = ParseError::MissingOperand { operator };
        let value = match operator.arity() {
            1 => {
                let operand = stack.pop().ok_or(missing)?;
                algebra.unary(operator, operand)
            }
            2 => {
                let right = stack.pop().ok_or(missing.clone())?;
                let left = stack.pop().ok_or(missing)?;
                algebra.binary(operator, left, right)
            }
            _ => return Err(ParseError::StrayGroupToken { operator }),
        };
        stack.push(value);
    }

    let count = stack.len();
    match stack.pop() {
        Some(value) if count == 1 => Ok(value),
        _ => Err(ParseError::DanglingOperands { count }),
    }
}

/// Builds automata with the Thompson combinators of [NFA].
pub struct NfaAlgebra<S>(PhantomData<S>);

impl<S> Default for NfaAlgebra<S> {
    fn default() -> Self {
        NfaAlgebra(PhantomData)
    }
}

impl<S: Letter> PostfixAlgebra<S> for NfaAlgebra<S> {
    type Value = NFA<S>;

    fn empty(&self) -> NFA<S> {
        NFA::empty_word(vec![])
    }

    fn literal(&self, symbol: &S) -> NFA<S> {
        NFA::literal(symbol.clone())
    }

    fn unary(&self, operator: Operator, operand: NFA<S>) -> NFA<S> {
        match operator {
            Operator::Star => operand.star(),
            Operator::Plus => operand.plus(),
            _ => operand.opt(),
        }
    }

    fn binary(&self, operator: Operator, left: NFA<S>, right: NFA<S>) -> NFA<S> {
        match operator {
            Operator::Alternation => left.union(right),
            _ => left.concat(right),
        }
    }
}

/// Renders postfix regexes back into regex syntax, adding a group wherever
/// an operand binds weaker than the operator applied to it.
///
/// The parser groups chains of binary operators to the right, so a left
/// operand with the same operator is grouped as well. This keeps
/// `parse_regex(construct_string(p)) == p`.
pub struct StringAlgebra;

impl StringAlgebra {
    fn wrap(operand: (String, Option<Operator>), operator: Operator, left: bool) -> String {
        match operand {
            (text, Some(inner))
                if inner.precedence() < operator.precedence()
                    || (left && inner.arity() == 2 && inner.precedence() == operator.precedence()) =>
            {
                format!("({})", text)
            }
            (text, _) => text,
        }
    }
}

impl<S: Display> PostfixAlgebra<S> for StringAlgebra {
    /// The text together with its outermost operator.
    type Value = (String, Option<Operator>);

    fn empty(&self) -> Self::Value {
        (String::new(), None)
    }

    fn literal(&self, symbol: &S) -> Self::Value {
        (escape(&symbol.to_string()), None)
    }

    fn unary(&self, operator: Operator, operand: Self::Value) -> Self::Value {
        let text = format!("{}{}", Self::wrap(operand, operator, false), operator);
        (text, Some(operator))
    }

    fn binary(&self, operator: Operator, left: Self::Value, right: Self::Value) -> Self::Value {
        let separator = operator.symbol().map(String::from).unwrap_or_default();
        let text = format!(
            "{}{}{}",
            Self::wrap(left, operator, true),
            separator,
            Self::wrap(right, operator, false)
        );
        (text, Some(operator))
    }
}

pub fn construct_nfa<S: Letter>(postfix: &Postfix<S>) -> Result<NFA<S>, ParseError> {
    evaluate(postfix, &NfaAlgebra::default())
}

pub fn construct_string<S: Display>(postfix: &Postfix<S>) -> Result<String, ParseError> {
    evaluate(postfix, &StringAlgebra).map(|(text, _)| text)
}

pub fn parse_regex_as_nfa(regex: &str) -> Result<NFA<char>, ParseError> {
    construct_nfa(&parse_regex(regex)?)
}

pub fn parse_regex_as_string(regex: &str) -> Result<String, ParseError> {
    construct_string(&parse_regex(regex)?)
}
