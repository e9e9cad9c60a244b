use lexcomb::frontend::{
    eof, lazy, satisfy, token, tokenize, zero_or_more, one_or_more, Parser, SourcePosition, Token,
    TokenKind,
};
use rstest::rstest;

fn ws<'a>() -> Parser<'a, Token, Vec<Token>> {
    zero_or_more(satisfy(|t: &Token| t.is_whitespace()))
}

fn lexeme<'a, R: Clone + 'a>(parser: Parser<'a, Token, R>) -> Parser<'a, Token, R> {
    parser.then_ignore(ws())
}

fn symbol<'a>(s: &str) -> Parser<'a, Token, Token> {
    lexeme(token(Token::new(TokenKind::Symbol(s.to_string()))))
}

fn number<'a>() -> Parser<'a, Token, i64> {
    lexeme(satisfy(|t: &Token| matches!(t.kind, TokenKind::Int(_)))).map(|t| match t.kind {
        TokenKind::Int(value) => value,
        _ => unreachable!(),
    })
}

fn fold(first: i64, rest: Vec<(char, i64)>) -> i64 {
    rest.into_iter().fold(first, |acc, (op, value)| match op {
        '+' => acc + value,
        '-' => acc - value,
        '*' => acc * value,
        _ => acc / value,
    })
}

fn expr<'a>() -> Parser<'a, Token, i64> {
    let op = symbol("+").to('+') | symbol("-").to('-');
    (term() + zero_or_more(op + term())).map(|(first, rest)| fold(first, rest))
}

fn term<'a>() -> Parser<'a, Token, i64> {
    let op = symbol("*").to('*') | symbol("/").to('/');
    (factor() + zero_or_more(op + factor())).map(|(first, rest)| fold(first, rest))
}

fn factor<'a>() -> Parser<'a, Token, i64> {
    let open = lexeme(token(Token::new(TokenKind::OpenParen)));
    let close = lexeme(token(Token::new(TokenKind::CloseParen)));
    number() | open.ignore_then(lazy(|| expr())).then_ignore(close)
}

fn evaluate(source: &str) -> Vec<i64> {
    let tokens = tokenize(source).unwrap();
    let program = ws().ignore_then(expr()).then_ignore(eof());
    program.parse_complete(&tokens).collect()
}

#[rstest]
#[case("1 + 2 * (3 - 1)", vec![5])]
#[case(" 7 ", vec![7])]
#[case("((4))", vec![4])]
#[case("8 / 2 / 2", vec![2])]
#[case("2*(1+1)*3", vec![12])]
#[case("1 + * 2", vec![])]
#[case("(1", vec![])]
#[case("", vec![])]
fn test_arithmetic(#[case] source: &str, #[case] expected: Vec<i64>) {
    assert_eq!(evaluate(source), expected);
}

#[test]
fn test_matched_tokens_keep_positions() {
    let tokens = tokenize("  foo").unwrap();
    let ident = ws().ignore_then(satisfy(|t: &Token| matches!(t.kind, TokenKind::Identifier(_))));
    let found = ident.first(&tokens).unwrap();
    assert_eq!(found.kind, TokenKind::Identifier("foo".to_string()));
    assert_eq!(found.position, SourcePosition::new(2..5, 0, 2..5));
}

#[test]
fn test_ambiguous_split_is_surfaced() {
    let tokens = tokenize("a b c").unwrap();
    let word = lexeme(satisfy(|t: &Token| matches!(t.kind, TokenKind::Identifier(_))));
    let split = one_or_more(word.clone()) + zero_or_more(word);
    let sizes: Vec<_> = split
        .parse_complete(&tokens)
        .map(|(left, right)| (left.len(), right.len()))
        .collect();
    assert_eq!(sizes, vec![(3, 0), (2, 1), (1, 2)]);
}

#[test]
fn test_line_comment_grammar() {
    let tokens = tokenize("x // note\ny").unwrap();
    let comment = token(Token::new(TokenKind::LineComment))
        .ignore_then(zero_or_more(satisfy(|t: &Token| t.kind != TokenKind::Newline)))
        .then_ignore(token(Token::new(TokenKind::Newline)));
    let ident = satisfy(|t: &Token| matches!(t.kind, TokenKind::Identifier(_)));
    let line = lexeme(ident.clone()).then_ignore(comment) + ident;
    let (first, second) = line.first(&tokens).unwrap();
    assert_eq!(first.to_string(), "x");
    assert_eq!(second.position.line, 1);
}
