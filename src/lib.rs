//! Tokenizer and backtracking parser combinators for language front-ends.
//!
//! `frontend::lexer` turns source text into position-tagged `Token`s;
//! `frontend::parser` and `frontend::combinators` build grammars over any
//! token type, producing every interpretation of an ambiguous input lazily.

pub mod frontend;
pub mod utils;
