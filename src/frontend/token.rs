use std::fmt;
use std::ops::Range;

/// Position of a `Token` in the source text.
///
/// Every offset counts characters (Unicode scalar values), 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    /// Absolute character range in the source.
    pub range: Range<usize>,
    /// Line of the token.
    pub line: usize,
    /// Character range relative to the start of `line`.
    pub columns: Range<usize>,
}

impl SourcePosition {
    pub fn new(range: Range<usize>, line: usize, columns: Range<usize>) -> Self {
        debug_assert_eq!(range.len(), columns.len(), "range and columns must have equal length");
        Self { range, line, columns }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "range: {:?}; line: {}; columns: {:?}", self.range, self.line, self.columns)
        } else {
            write!(f, "{:?}", self.range)
        }
    }
}

#[derive(Debug, Clone)]
pub enum TokenKind {
    /// Float literal. `original` is the exact text in the source, kept for regeneration.
    Float { value: f64, original: String },
    // Literals
    Int(i64),
    Identifier(String),
    Symbol(String),
    // Whitespace
    Newline,
    Tab,
    Space,
    // Comment markers
    LineComment,
    MultilineCommentStart,
    MultilineCommentEnd,
    // Delimiters
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

/// Floats compare by their original text, so `1.50` and `1.5` are different tokens.
impl PartialEq for TokenKind {
    fn eq(&self, other: &Self) -> bool {
        use TokenKind::*;
        match (self, other) {
            (Float { original: lhs, .. }, Float { original: rhs, .. }) => lhs == rhs,
            (Int(lhs), Int(rhs)) => lhs == rhs,
            (Identifier(lhs), Identifier(rhs)) => lhs == rhs,
            (Symbol(lhs), Symbol(rhs)) => lhs == rhs,
            (Newline, Newline)
            | (Tab, Tab)
            | (Space, Space)
            | (LineComment, LineComment)
            | (MultilineCommentStart, MultilineCommentStart)
            | (MultilineCommentEnd, MultilineCommentEnd)
            | (OpenParen, OpenParen)
            | (CloseParen, CloseParen)
            | (OpenBracket, OpenBracket)
            | (CloseBracket, CloseBracket)
            | (OpenBrace, OpenBrace)
            | (CloseBrace, CloseBrace) => true,
            _ => false,
        }
    }
}

impl Eq for TokenKind {}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind::*;
        match self {
            Float { original, .. } => write!(f, "{}", original),
            Int(value) => write!(f, "{}", value),
            Identifier(ident) => write!(f, "{}", ident),
            Symbol(symbol) => write!(f, "{}", symbol),
            Newline => writeln!(f),
            Tab => write!(f, "\t"),
            Space => write!(f, " "),
            LineComment => write!(f, "//"),
            MultilineCommentStart => write!(f, "/*"),
            MultilineCommentEnd => write!(f, "*/"),
            OpenParen => write!(f, "("),
            CloseParen => write!(f, ")"),
            OpenBracket => write!(f, "["),
            CloseBracket => write!(f, "]"),
            OpenBrace => write!(f, "{{"),
            CloseBrace => write!(f, "}}"),
        }
    }
}

impl TokenKind {
    /// Short name of the variant, used in token dumps.
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Float { .. } => "float",
            Int(_) => "int",
            Identifier(_) => "identifier",
            Symbol(_) => "symbol",
            Newline => "newline",
            Tab => "tab",
            Space => "space",
            LineComment => "line-comment",
            MultilineCommentStart => "multiline-comment-start",
            MultilineCommentEnd => "multiline-comment-end",
            OpenParen => "open-paren",
            CloseParen => "close-paren",
            OpenBracket => "open-bracket",
            CloseBracket => "close-bracket",
            OpenBrace => "open-brace",
            CloseBrace => "close-brace",
        }
    }
}

/// A `TokenKind` tagged with where it was found.
///
/// Equality only looks at `kind`, so a token built with `Token::new` can be
/// used as a pattern against tokens coming out of the tokenizer.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
}

impl Token {
    /// Token without a source context, e.g. `Token::new(TokenKind::Identifier("ID1".into()))`.
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, position: SourcePosition::default() }
    }

    pub fn at(kind: TokenKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Tab | TokenKind::Space)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Token::new(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[test]
fn test_float_equality_uses_original_text() {
    let lhs = TokenKind::Float { value: 1.5, original: "1.5".to_string() };
    let rhs = TokenKind::Float { value: 1.5, original: "1.50".to_string() };
    assert_ne!(lhs, rhs);
    assert_eq!(lhs, TokenKind::Float { value: 0.0, original: "1.5".to_string() });
}

#[test]
fn test_token_equality_ignores_position() {
    let positioned = Token::at(
        TokenKind::Identifier("ID".to_string()),
        SourcePosition::new(4..6, 1, 0..2),
    );
    assert_eq!(positioned, Token::new(TokenKind::Identifier("ID".to_string())));
    assert_ne!(positioned, Token::new(TokenKind::Symbol("ID".to_string())));
    assert_ne!(TokenKind::Int(1), TokenKind::Identifier("1".to_string()));
}

#[test]
fn test_whitespace() {
    assert!(Token::new(TokenKind::Space).is_whitespace());
    assert!(Token::new(TokenKind::Tab).is_whitespace());
    assert!(!Token::new(TokenKind::Newline).is_whitespace());
    assert!(!Token::new(TokenKind::LineComment).is_whitespace());
}

#[test]
fn test_position_display() {
    let position = SourcePosition::new(4..7, 1, 0..3);
    assert_eq!(position.to_string(), "4..7");
    assert_eq!(format!("{:#}", position), "range: 4..7; line: 1; columns: 0..3");
}
