/// Splits regex text into lexemes.
///
/// Supported syntax: literals, backslash escapes, `|`, `*`, `+`, `?` and
/// groups. Non-capturing and named groups like `(?:...)`, `(?<name>...)`,
/// `(?<=...)` or `(?<!...)` are read as plain groups.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{anychar, char},
    combinator::{map, value},
    error::ParseError,
    sequence::preceded,
};

use crate::{error, regex::Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Literal(char),
    Open,
    Close,
    /// One of `|`, `*`, `+` and `?`.
    Operator(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    /// Byte offset into the regex.
    pub position: usize,
}

fn escaped<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, char, E> {
    preceded(char('\\'), anychar).parse(input)
}

fn group_open<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), E> {
    alt((
        value((), alt((tag("(?<="), tag("(?<!")))),
        value((), (tag("(?<"), take_until(">"), char('>'))),
        value((), (tag("(?"), anychar)),
        value((), char('(')),
    ))
    .parse(input)
}

fn operator<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Operator, E> {
    alt((
        value(Operator::Alternation, char('|')),
        value(Operator::Star, char('*')),
        value(Operator::Plus, char('+')),
        value(Operator::Optional, char('?')),
    ))
    .parse(input)
}

fn lexeme<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, LexemeKind, E> {
    alt((
        map(escaped, LexemeKind::Literal),
        value(LexemeKind::Open, group_open),
        value(LexemeKind::Close, char(')')),
        map(operator, LexemeKind::Operator),
        map(anychar, LexemeKind::Literal),
    ))
    .parse(input)
}

pub fn tokenize(regex: &str) -> Result<Vec<Lexeme>, error::ParseError> {
    let mut lexemes = Vec::new();
    let mut rest = regex;

    while !rest.is_empty() {
        let position = regex.len() - rest.len();
        if rest == "\\" {
            return Err(error::ParseError::DanglingEscape { position });
        }

        match lexeme::<nom::error::Error<&str>>(rest) {
            Ok((remaining, kind)) => {
                lexemes.push(Lexeme { kind, position });
                rest = remaining;
            }
            Err(_) => return Err(error::ParseError::UnexpectedInput { position }),
        }
    }

    Ok(lexemes)
}

#[test]
fn test_escaped() {
    let (rest, c) = escaped::<nom::error::Error<&str>>("\\*a").unwrap();
    assert_eq!(c, '*');
    assert_eq!(rest, "a");
}

#[test]
fn test_group_open_variants() {
    for (input, rest) in [
        ("(a", "a"),
        ("(?:a", "a"),
        ("(?<name>a", "a"),
        ("(?<=a", "a"),
        ("(?<!a", "a"),
        ("(?=a", "a"),
    ] {
        let (remaining, _) = group_open::<nom::error::Error<&str>>(input).unwrap();
        assert_eq!(remaining, rest, "input {}", input);
    }
}

#[test]
fn test_tokenize() {
    let lexemes = tokenize("a\\|(b)*").unwrap();
    let kinds = lexemes.iter().map(|l| l.kind).collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec![
            LexemeKind::Literal('a'),
            LexemeKind::Literal('|'),
            LexemeKind::Open,
            LexemeKind::Literal('b'),
            LexemeKind::Close,
            LexemeKind::Operator(Operator::Star),
        ]
    );
    assert_eq!(lexemes[2].position, 3);
}

#[test]
fn test_tokenize_dangling_escape() {
    assert_eq!(
        tokenize("ab\\"),
        Err(error::ParseError::DanglingEscape { position: 2 })
    );
}
