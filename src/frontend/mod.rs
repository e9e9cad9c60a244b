pub mod token;
pub mod lexer;
pub mod parser;
pub mod combinators;

pub use combinators::{apply, one_or_more, sequence, zero_or_more};
pub use lexer::{tokenize, TokenizeError, Tokenizer, TokenizerOptions};
pub use parser::{curry2, curry3, eof, fail, lazy, pure, satisfy, token, Parser, Results};
pub use token::{SourcePosition, Token, TokenKind};
