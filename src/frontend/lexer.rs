use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value},
    multi::many1_count,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;
use tracing::{debug, trace};

use super::token::{SourcePosition, Token, TokenKind};

/// Characters that make up a symbol run. Delimiters are handled as terminals.
pub const SYMBOL_CHARACTERS: &str = "<>.,:;-!@#$%^&*~=+/?|";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// No matcher accepts the input at `offset`.
    #[error("unrecognized item {:?} at line {}, column {}", .found, .line + 1, .column + 1)]
    UnrecognizedItem {
        found: char,
        offset: usize,
        line: usize,
        column: usize,
    },
}

impl TokenizeError {
    /// Character offset of the failure in the source.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnrecognizedItem { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Let identifiers continue with digits after the leading letter.
    pub identifier_digits: bool,
}

fn match_comment_marker(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LineComment, tag("//")),
        value(TokenKind::MultilineCommentStart, tag("/*")),
        value(TokenKind::MultilineCommentEnd, tag("*/")),
    ))(input)
}

/// Exact literals, longest first.
fn match_terminal(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Tab, tag("    ")),
        value(TokenKind::Newline, tag("\r\n")),
        match_comment_marker,
        value(TokenKind::Space, tag(" ")),
        value(TokenKind::Tab, tag("\t")),
        value(TokenKind::Newline, tag("\n")),
        value(TokenKind::OpenParen, tag("(")),
        value(TokenKind::CloseParen, tag(")")),
        value(TokenKind::OpenBracket, tag("[")),
        value(TokenKind::CloseBracket, tag("]")),
        value(TokenKind::OpenBrace, tag("{")),
        value(TokenKind::CloseBrace, tag("}")),
    ))(input)
}

fn match_identifier(input: &str, trailing_digits: bool) -> IResult<&str, TokenKind> {
    let (input, ident) = if trailing_digits {
        recognize(pair(
            satisfy(char::is_alphabetic),
            take_while(|c: char| c.is_alphabetic() || c.is_ascii_digit()),
        ))(input)?
    } else {
        take_while1(char::is_alphabetic)(input)?
    };
    Ok((input, TokenKind::Identifier(ident.to_string())))
}

/// A symbol run stops in front of a comment marker, so `+//` is `+` then `//`.
fn match_symbol(input: &str) -> IResult<&str, TokenKind> {
    map(
        recognize(many1_count(preceded(
            not(match_comment_marker),
            satisfy(|c| SYMBOL_CHARACTERS.contains(c)),
        ))),
        |symbol: &str| TokenKind::Symbol(symbol.to_string()),
    )(input)
}

/// Refuses a digit run followed by `.`, leaving it to `match_float`.
fn match_int(input: &str) -> IResult<&str, TokenKind> {
    let (input, value) = terminated(
        map_res(digit1, |digits: &str| digits.parse::<i64>()),
        not(char('.')),
    )(input)?;
    Ok((input, TokenKind::Int(value)))
}

fn match_float(input: &str) -> IResult<&str, TokenKind> {
    let (input, (original, value)) = map_res(
        recognize(tuple((
            digit1,
            opt(pair(char('.'), digit0)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |original: &str| original.parse::<f64>().map(|value| (original, value)),
    )(input)?;
    Ok((input, TokenKind::Float { value, original: original.to_string() }))
}

/// Turns source text into `Token` values.
///
/// A tokenizer owns its scan state and is consumed by `tokenize`, so every
/// scan needs a fresh instance.
#[derive(Debug)]
pub struct Tokenizer<'s> {
    options: TokenizerOptions,
    rest: &'s str,
    offset: usize,
    line: usize,
    column_start: usize,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    pub fn with_options(source: &'s str, options: TokenizerOptions) -> Self {
        Self {
            options,
            rest: source,
            offset: 0,
            line: 0,
            column_start: 0,
        }
    }

    /// Scans the whole source. Fails on the first unrecognized item without
    /// returning the tokens produced so far.
    pub fn tokenize(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        while !self.rest.is_empty() {
            let start = self.offset;
            let Some((rest, kind)) = self.match_token(self.rest) else {
                let err = TokenizeError::UnrecognizedItem {
                    found: self.rest.chars().next().unwrap_or_default(),
                    offset: start,
                    line: self.line,
                    column: start - self.column_start,
                };
                debug!(target: "lexcomb::lexer", %err, scanned = tokens.len(), "tokenizing aborted");
                return Err(err);
            };
            let consumed = &self.rest[..self.rest.len() - rest.len()];
            let end = start + consumed.chars().count();
            self.rest = rest;
            self.offset = end;

            let token = Token::at(kind, self.source_position(start..end));
            trace!(target: "lexcomb::lexer", kind = token.kind.name(), position = %token.position, "token");
            if token.kind == TokenKind::Newline {
                self.column_start = end;
                self.line += 1;
            }
            tokens.push(token);
        }
        debug!(target: "lexcomb::lexer", count = tokens.len(), lines = self.line + 1, "tokenizing finished");
        Ok(tokens)
    }

    fn match_token<'i>(&self, input: &'i str) -> Option<(&'i str, TokenKind)> {
        match_terminal(input)
            .or_else(|_| match_identifier(input, self.options.identifier_digits))
            .or_else(|_| match_symbol(input))
            .or_else(|_| match_int(input))
            .or_else(|_| match_float(input))
            .ok()
    }

    fn source_position(&self, range: std::ops::Range<usize>) -> SourcePosition {
        let columns = (range.start - self.column_start)..(range.end - self.column_start);
        SourcePosition::new(range, self.line, columns)
    }
}

/// Tokenizes `source` with the default options.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(source).tokenize()
}

#[cfg(test)]
use rstest::rstest;

#[cfg(test)]
fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|token| token.kind).collect()
}

#[cfg(test)]
fn ident(s: &str) -> TokenKind {
    TokenKind::Identifier(s.to_string())
}

#[cfg(test)]
fn symbol(s: &str) -> TokenKind {
    TokenKind::Symbol(s.to_string())
}

#[test]
fn test_float() {
    let tokens = tokenize("12.34").unwrap();
    assert_eq!(tokens.len(), 1);
    match &tokens[0].kind {
        TokenKind::Float { value, original } => {
            assert_eq!(*value, 12.34);
            assert_eq!(original, "12.34");
        }
        other => panic!("expected float, found {:?}", other),
    }
    assert_eq!(tokens[0].position, SourcePosition::new(0..5, 0, 0..5));
}

#[test]
fn test_int_float_lookahead() {
    let tokens = tokenize("1.5").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(matches!(
        &tokens[0].kind,
        TokenKind::Float { value, original } if *value == 1.5 && original == "1.5"
    ));
}

#[test]
fn test_lines_and_columns() {
    let tokens = tokenize("123\nabc").unwrap();
    assert_eq!(tokens, vec![
        Token::new(TokenKind::Int(123)),
        Token::new(TokenKind::Newline),
        Token::new(ident("abc")),
    ]);
    assert_eq!(tokens[0].position, SourcePosition::new(0..3, 0, 0..3));
    assert_eq!(tokens[1].position, SourcePosition::new(3..4, 0, 3..4));
    assert_eq!(tokens[2].position, SourcePosition::new(4..7, 1, 0..3));
}

#[test]
fn test_columns_after_indentation() {
    let tokens = tokenize("ab\n  cd\n\nx").unwrap();
    let positions: Vec<_> = tokens.iter().map(|token| token.position.clone()).collect();
    assert_eq!(positions, vec![
        SourcePosition::new(0..2, 0, 0..2),
        SourcePosition::new(2..3, 0, 2..3),
        SourcePosition::new(3..4, 1, 0..1),
        SourcePosition::new(4..5, 1, 1..2),
        SourcePosition::new(5..7, 1, 2..4),
        SourcePosition::new(7..8, 1, 4..5),
        SourcePosition::new(8..9, 2, 0..1),
        SourcePosition::new(9..10, 3, 0..1),
    ]);
}

#[test]
fn test_crlf_is_one_newline() {
    let tokens = tokenize("a\r\nb").unwrap();
    assert_eq!(tokens, vec![Token::new(ident("a")), Token::new(TokenKind::Newline), Token::new(ident("b"))]);
    assert_eq!(tokens[1].position, SourcePosition::new(1..3, 0, 1..3));
    assert_eq!(tokens[2].position, SourcePosition::new(3..4, 1, 0..1));
}

#[test]
fn test_positions_count_characters() {
    let tokens = tokenize("héllo wörld").unwrap();
    assert_eq!(kinds("héllo wörld"), vec![ident("héllo"), TokenKind::Space, ident("wörld")]);
    assert_eq!(tokens[2].position, SourcePosition::new(6..11, 0, 6..11));
}

#[test]
fn test_unrecognized_item() {
    let err = tokenize("abc `def`").unwrap_err();
    assert_eq!(err, TokenizeError::UnrecognizedItem { found: '`', offset: 4, line: 0, column: 4 });
    assert_eq!(err.offset(), 4);
    assert_eq!(err.to_string(), "unrecognized item '`' at line 1, column 5");

    let err = tokenize("a\n  \u{1F600}").unwrap_err();
    assert_eq!(err, TokenizeError::UnrecognizedItem { found: '\u{1F600}', offset: 4, line: 1, column: 2 });
}

#[test]
fn test_empty_source() {
    assert!(tokenize("").unwrap().is_empty());
}

#[test]
fn test_identifier_digits_option() {
    assert_eq!(kinds("abc1"), vec![ident("abc"), TokenKind::Int(1)]);

    let options = TokenizerOptions { identifier_digits: true };
    let tokens = Tokenizer::with_options("abc1 2x", options).tokenize().unwrap();
    let kinds: Vec<_> = tokens.into_iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![ident("abc1"), TokenKind::Space, TokenKind::Int(2), ident("x")]);
}

#[cfg(test)]
#[rstest]
#[case("//", vec![TokenKind::LineComment])]
#[case("/*", vec![TokenKind::MultilineCommentStart])]
#[case("*/", vec![TokenKind::MultilineCommentEnd])]
#[case("()[]{}", vec![
    TokenKind::OpenParen, TokenKind::CloseParen,
    TokenKind::OpenBracket, TokenKind::CloseBracket,
    TokenKind::OpenBrace, TokenKind::CloseBrace,
])]
#[case("    ", vec![TokenKind::Tab])]
#[case("   ", vec![TokenKind::Space, TokenKind::Space, TokenKind::Space])]
#[case("\t", vec![TokenKind::Tab])]
#[case("x<=y", vec![ident("x"), symbol("<="), ident("y")])]
#[case("a.(b)", vec![ident("a"), symbol("."), TokenKind::OpenParen, ident("b"), TokenKind::CloseParen])]
#[case("x+//c", vec![ident("x"), symbol("+"), TokenKind::LineComment, ident("c")])]
#[case("**/", vec![symbol("*"), TokenKind::MultilineCommentEnd])]
#[case("a/*b*/", vec![ident("a"), TokenKind::MultilineCommentStart, ident("b"), TokenKind::MultilineCommentEnd])]
#[case("-5", vec![symbol("-"), TokenKind::Int(5)])]
#[case("1abc", vec![TokenKind::Int(1), ident("abc")])]
#[case("1e5", vec![TokenKind::Int(1), ident("e"), TokenKind::Int(5)])]
#[case("007", vec![TokenKind::Int(7)])]
#[case("1//c", vec![TokenKind::Int(1), TokenKind::LineComment, ident("c")])]
fn test_token_kinds(#[case] source: &str, #[case] expected: Vec<TokenKind>) {
    assert_eq!(kinds(source), expected);
}

#[cfg(test)]
#[rstest]
#[case("12.", 12.0)]
#[case("1.5e3", 1500.0)]
#[case("2.50", 2.5)]
#[case("99999999999999999999", 1e20)]
fn test_float_original_text(#[case] source: &str, #[case] expected: f64) {
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 1);
    match &tokens[0].kind {
        TokenKind::Float { value, original } => {
            assert_eq!(*value, expected);
            assert_eq!(original, source);
        }
        other => panic!("expected float, found {:?}", other),
    }
}

#[test]
fn test_display_regenerates_source() {
    let source = "f(x) = [1.50, 2] // c\n{ y }";
    let regenerated: String = tokenize(source).unwrap().iter().map(|token| token.to_string()).collect();
    assert_eq!(regenerated, source);
}
