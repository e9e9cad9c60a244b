use std::io;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::frontend::lexer::TokenizeError;

/// Prints `err` against `source` on stderr, pointing at the offending character.
pub fn report_tokenize_error(filename: &str, source: &str, err: &TokenizeError) -> io::Result<()> {
    let offset = err.offset();
    match err {
        TokenizeError::UnrecognizedItem { found, .. } => {
            Report::build(ReportKind::Error, filename, offset)
                .with_message("unrecognized item")
                .with_label(
                    Label::new((filename, offset..offset + 1))
                        .with_message(format!("{:?} does not start any token", found))
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((filename, Source::from(source)))
        }
    }
}
