use std::fmt::Display;

use crate::regex::Operator;

/// Errors produced when an automaton is built from explicit parts that do
/// not describe a valid automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The start state is not one of the states.
    StartNotInStates(u32),
    /// A final state is not one of the states.
    FinalNotInStates(u32),
    /// A transition leaves from or leads to an unknown state.
    UnknownTransitionState(u32),
    /// A state id too large to leave room for fresh states.
    StateIdOutOfRange(u32),
    /// Two transitions of a DFA leave the same state on the same symbol but
    /// lead to different states.
    NonDeterministic { state: u32, symbol: String },
}

impl Display for AutomatonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonError::StartNotInStates(s) => {
                write!(f, "start state {} must be in states", s)
            }
            AutomatonError::FinalNotInStates(s) => {
                write!(f, "final state {} must be in states", s)
            }
            AutomatonError::UnknownTransitionState(s) => {
                write!(f, "transition references unknown state {}", s)
            }
            AutomatonError::StateIdOutOfRange(s) => {
                write!(f, "state id {} is out of range", s)
            }
            AutomatonError::NonDeterministic { state, symbol } => write!(
                f,
                "state {} has more than one transition on symbol {}",
                state, symbol
            ),
        }
    }
}

impl std::error::Error for AutomatonError {}

/// Errors produced while lexing, parsing or evaluating a regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The regex ends with a backslash that escapes nothing.
    DanglingEscape { position: usize },
    /// The lexer could not make sense of the input at this byte offset.
    UnexpectedInput { position: usize },
    /// A group token made it into postfix form, where groups have no meaning.
    StrayGroupToken { operator: Operator },
    /// A closing parenthesis without an opening one, or the other way around.
    UnbalancedParenthesis { position: usize },
    /// An operator was applied with fewer operands than its arity.
    MissingOperand { operator: Operator },
    /// Evaluation ended with more than one value on the stack.
    DanglingOperands { count: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::DanglingEscape { position } => {
                write!(f, "dangling escape at position {}", position)
            }
            ParseError::UnexpectedInput { position } => {
                write!(f, "unexpected input at position {}", position)
            }
            ParseError::StrayGroupToken { operator } => {
                write!(f, "group token {:?} in postfix expression", operator)
            }
            ParseError::UnbalancedParenthesis { position } => {
                write!(f, "unbalanced parenthesis at position {}", position)
            }
            ParseError::MissingOperand { operator } => {
                write!(f, "operator {:?} is missing an operand", operator)
            }
            ParseError::DanglingOperands { count } => {
                write!(f, "{} operands are not joined by an operator", count)
            }
        }
    }
}

impl std::error::Error for ParseError {}
