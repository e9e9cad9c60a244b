use std::fmt;

use colored::Colorize;
use itertools::Itertools;

use crate::frontend::token::{Token, TokenKind};

/// One-token-per-line dump of a token list.
pub struct TokenListing<'a> {
    pub tokens: &'a [Token],
    /// Append `range; line; columns` to every line.
    pub positions: bool,
    /// Leave out `Space` and `Tab` tokens.
    pub skip_whitespace: bool,
}

impl<'a> TokenListing<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, positions: false, skip_whitespace: false }
    }

    fn visible(&self) -> impl Iterator<Item = &'a Token> + '_ {
        self.tokens
            .iter()
            .filter(move |token| !(self.skip_whitespace && token.is_whitespace()))
    }
}

fn payload(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Float { value, original } => Some(format!("{} ({})", original, value)),
        TokenKind::Int(_) | TokenKind::Identifier(_) | TokenKind::Symbol(_) => Some(kind.to_string()),
        _ => None,
    }
}

impl<'a> fmt::Display for TokenListing<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.visible().format_with("\n", |token, f| {
            let name = format!("{:<24}", token.kind.name());
            let payload = payload(&token.kind).unwrap_or_default();
            if self.positions {
                f(&format_args!("{}{:<16} {}", name.cyan(), payload.bold(), format!("{:#}", token.position).dimmed()))
            } else {
                f(&format_args!("{}{}", name.cyan(), payload.bold()))
            }
        });
        write!(f, "{}", lines)
    }
}

#[test]
fn test_listing_skips_whitespace() {
    colored::control::set_override(false);
    let tokens = crate::frontend::tokenize("a 1.50").unwrap();
    let mut listing = TokenListing::new(&tokens);
    listing.skip_whitespace = true;
    let text = listing.to_string();
    let lines: Vec<_> = text.lines().map(str::trim_end).collect();
    assert_eq!(lines, vec![
        format!("{:<24}a", "identifier"),
        format!("{:<24}1.50 (1.5)", "float"),
    ]);
}
