use crate::{
    error::ParseError,
    regex::{
        Operator, Postfix, Token,
        lexer::{LexemeKind, tokenize},
    },
};

/// Parses a regex into postfix notation with the shunting-yard algorithm.
///
/// Concatenation is implicit in the input. A concatenation operator is
/// inserted whenever a literal or an opening group directly follows
/// something that can be concatenated to, namely a literal, a closing group
/// or a suffix operator.
pub fn parse_regex(regex: &str) -> Result<Postfix<char>, ParseError> {
    let mut output = Vec::new();
    let mut stack: Vec<(Operator, usize)> = Vec::new();
    let mut concatenate_next = false;

    for lexeme in tokenize(regex)? {
        if concatenate_next && matches!(lexeme.kind, LexemeKind::Open | LexemeKind::Literal(_)) {
            push_operator(Operator::Concat, lexeme.position, &mut stack, &mut output);
        }

        match lexeme.kind {
            LexemeKind::Open => {
                stack.push((Operator::GroupOpen, lexeme.position));
                concatenate_next = false;
            }
            LexemeKind::Close => {
                loop {
                    match stack.pop() {
                        Some((Operator::GroupOpen, _)) => break,
                        Some((op, _)) => output.push(Token::Operator(op)),
                        None => {
                            return Err(ParseError::UnbalancedParenthesis {
                                position: lexeme.position,
                            });
                        }
                    }
                }
                concatenate_next = true;
            }
            LexemeKind::Operator(op) => {
                push_operator(op, lexeme.position, &mut stack, &mut output);
                concatenate_next = op.is_suffix();
            }
            LexemeKind::Literal(c) => {
                output.push(Token::Literal(c));
                concatenate_next = true;
            }
        }
    }

    while let Some((op, position)) = stack.pop() {
        if op == Operator::GroupOpen {
            return Err(ParseError::UnbalancedParenthesis { position });
        }
        output.push(Token::Operator(op));
    }

    Ok(Postfix::new(output))
}

/// Pops all operators binding tighter than `op`. Suffix operators go straight
/// to the output, all others wait on the stack for their right operand.
fn push_operator(
    op: Operator,
    position: usize,
    stack: &mut Vec<(Operator, usize)>,
    output: &mut Vec<Token<char>>,
) {
    while let Some(&(top, _)) = stack.last() {
        if top.precedence() <= op.precedence() {
            break;
        }
        output.push(Token::Operator(top));
        stack.pop();
    }

    if op.is_suffix() {
        output.push(Token::Operator(op));
    } else {
        stack.push((op, position));
    }
}
