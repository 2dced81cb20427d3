use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod symbolic;

/// The characters that have a meaning in regex syntax and have to be escaped
/// to be read as literals.
pub const SPECIAL_CHARACTERS: [char; 7] = ['\\', '(', ')', '|', '*', '+', '?'];

/// The closed set of regex operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    /// Implicit, binary concatenation.
    Concat,
    Alternation,
    Star,
    Plus,
    Optional,
    GroupOpen,
    GroupClose,
}

impl Operator {
    /// The number of operands the operator takes in postfix form.
    pub const fn arity(self) -> usize {
        match self {
            Operator::Concat | Operator::Alternation => 2,
            Operator::Star | Operator::Plus | Operator::Optional => 1,
            Operator::GroupOpen | Operator::GroupClose => 0,
        }
    }

    pub const fn precedence(self) -> u8 {
        match self {
            Operator::GroupOpen | Operator::GroupClose => 0,
            Operator::Alternation => 1,
            Operator::Concat => 2,
            Operator::Star | Operator::Plus | Operator::Optional => 3,
        }
    }

    /// Suffix operators apply to the operand right before them.
    pub const fn is_suffix(self) -> bool {
        matches!(self, Operator::Star | Operator::Plus | Operator::Optional)
    }

    pub const fn is_commutative(self) -> bool {
        matches!(self, Operator::Alternation)
    }

    /// The character of the operator in regex syntax. Concatenation has none.
    pub const fn symbol(self) -> Option<char> {
        match self {
            Operator::Concat => None,
            Operator::Alternation => Some('|'),
            Operator::Star => Some('*'),
            Operator::Plus => Some('+'),
            Operator::Optional => Some('?'),
            Operator::GroupOpen => Some('('),
            Operator::GroupClose => Some(')'),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "·"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token<S> {
    Literal(S),
    Operator(Operator),
}

impl<S> Token<S> {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            Token::Literal(_) => None,
        }
    }
}

impl<S: Display> Display for Token<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Literal(s) => write!(f, "{}", escape(&s.to_string())),
            Token::Operator(op) => write!(f, "{}", op),
        }
    }
}

/// A regex in postfix notation, e.g. `a b · c |` for `ab|c`. The empty
/// postfix stands for the empty word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Postfix<S>(pub Vec<Token<S>>);

impl<S> Postfix<S> {
    pub fn new(tokens: Vec<Token<S>>) -> Self {
        Postfix(tokens)
    }

    pub fn tokens(&self) -> &[Token<S>] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<Token<S>> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The outermost operator, which is always the last token.
    pub fn top_operator(&self) -> Option<Operator> {
        self.0.last().and_then(Token::operator)
    }

    pub fn literal_count(&self) -> usize {
        self.0
            .iter()
            .filter(|token| matches!(token, Token::Literal(_)))
            .count()
    }
}

impl<S: Display> Display for Postfix<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Escapes all special characters with a backslash.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
