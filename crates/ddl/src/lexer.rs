//! A `nom`-based tokenizer for the document definition language.
//!
//! The token set is deliberately small: identifiers (keywords and bare
//! words), integer literals, quoted string literals, braces, parentheses and
//! commas. `//` starts a comment that runs to the end of the line. String
//! literals have no escape mechanism and may span several lines.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    character::complete::{alpha1, char, digit1, multispace1, not_line_ending},
    combinator::{map, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use pagescript_types::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Ident(String),
    Integer(String),
    Str(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "'{}'", s),
            TokenKind::Integer(s) => write!(f, "number {}", s),
            TokenKind::Str(_) => f.write_str("quoted string"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
        }
    }
}

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: usize,
}

impl Token {
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(s) if s.eq_ignore_ascii_case(word))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: usize },
}

impl LexError {
    fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            LexError::UnterminatedString { .. } => DiagnosticKind::UnsupportedInput,
            LexError::UnexpectedChar { .. } => DiagnosticKind::GrammarMismatch,
        }
    }
}

// --- Combinators ---

fn trivia(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, preceded(tag("//"), not_line_ending)))),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, TokenKind> {
    map(
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        |s: &str| TokenKind::Str(s.to_string()),
    )
    .parse(input)
}

fn integer(input: &str) -> IResult<&str, TokenKind> {
    map(digit1, |s: &str| TokenKind::Integer(s.to_string())).parse(input)
}

fn identifier(input: &str) -> IResult<&str, TokenKind> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')),
        )),
        |s: &str| TokenKind::Ident(s.to_string()),
    )
    .parse(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LBrace, char('{')),
        value(TokenKind::RBrace, char('}')),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::Comma, char(',')),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, TokenKind> {
    alt((string_literal, integer, identifier, punctuation)).parse(input)
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

/// Splits `source` into tokens. Characters that start no token are reported
/// and skipped; an unterminated string literal is reported and ends the
/// token stream.
pub fn tokenize(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut rest = source;

    loop {
        if let Ok((after, ())) = trivia(rest) {
            rest = after;
        }
        if rest.is_empty() {
            break;
        }
        let start = source.len() - rest.len();
        match token(rest) {
            Ok((after, kind)) => {
                let end = source.len() - after.len();
                tokens.push(Token {
                    kind,
                    span: Span { start, end },
                    line: line_of(source, start),
                });
                rest = after;
            }
            Err(_) => {
                let line = line_of(source, start);
                let error = if rest.starts_with('"') {
                    LexError::UnterminatedString { line }
                } else {
                    let ch = rest.chars().next().unwrap_or_default();
                    LexError::UnexpectedChar { ch, line }
                };
                diagnostics.push(error.diagnostic_kind(), error.to_string());
                match error {
                    LexError::UnterminatedString { .. } => break,
                    LexError::UnexpectedChar { ch, .. } => rest = &rest[ch.len_utf8()..],
                }
            }
        }
    }

    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_add_instruction() {
        assert_eq!(
            kinds(r#"add text(text size "14") "Hello""#),
            vec![
                TokenKind::Ident("add".into()),
                TokenKind::Ident("text".into()),
                TokenKind::LParen,
                TokenKind::Ident("text".into()),
                TokenKind::Ident("size".into()),
                TokenKind::Str("14".into()),
                TokenKind::RParen,
                TokenKind::Str("Hello".into()),
            ]
        );
    }

    #[test]
    fn test_hyphenated_keywords_and_integers() {
        assert_eq!(
            kinds("create page 12 { add background-image \"bg.png\" }"),
            vec![
                TokenKind::Ident("create".into()),
                TokenKind::Ident("page".into()),
                TokenKind::Integer("12".into()),
                TokenKind::LBrace,
                TokenKind::Ident("add".into()),
                TokenKind::Ident("background-image".into()),
                TokenKind::Str("bg.png".into()),
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_multiline_string_and_lines() {
        let (tokens, diags) = tokenize("title \"A\"\n\nadd text \"one\n  two\"\nx");
        assert!(diags.is_empty());
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[4].kind, TokenKind::Str("one\n  two".into()));
        assert_eq!(tokens[4].line, 3);
        assert_eq!(tokens[5].line, 5);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("// heading\ntitle \"T\" // trailing\n"),
            vec![TokenKind::Ident("title".into()), TokenKind::Str("T".into())]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let (tokens, _) = tokenize("add  \"hi\"x");
        assert_eq!(tokens[1].span, Span { start: 5, end: 9 });
        assert_eq!(tokens[2].span.start, tokens[1].span.end);
    }

    #[test]
    fn test_unexpected_character_is_reported_and_skipped() {
        let (tokens, diags) = tokenize("title @ \"Report\"");
        assert_eq!(tokens.len(), 2);
        assert!(diags.has_kind(DiagnosticKind::GrammarMismatch));
    }

    #[test]
    fn test_unterminated_string_stops_tokenizing() {
        let (tokens, diags) = tokenize("title \"Report\nadd text \"x\"");
        // `"Report\nadd text "` is a complete literal; the trailing quote is not.
        assert_eq!(tokens.len(), 3);
        assert!(diags.has_kind(DiagnosticKind::UnsupportedInput));
    }
}
