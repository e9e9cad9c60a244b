use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lexcomb::{
    frontend::lexer::{Tokenizer, TokenizerOptions},
    utils::{
        diagnostic::report_tokenize_error,
        display_helper::TokenListing,
    },
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(name = "lexcomb")]
#[command(bin_name = "lexcomb")]
pub struct Args {
    /// Specify the input file
    #[clap(value_parser=clap::value_parser!(PathBuf))]
    file: PathBuf,

    /// Let identifiers continue with digits after the first letter
    #[clap(long)]
    identifier_digits: bool,

    /// Print the range, line and columns of every token
    #[clap(short, long)]
    positions: bool,

    /// Leave space and tab tokens out of the listing
    #[clap(long)]
    skip_whitespace: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), ()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let filename = args.file.display().to_string();
    let src = std::fs::read_to_string(&args.file)
        .inspect_err(| err | {
            eprintln!("{} cannot read '{}': {}", "error:".red().bold(), filename.bold(), err)
        })
        .map_err(| _ | () )?;
    info!(file = %filename, chars = src.chars().count(), "tokenizing");

    let options = TokenizerOptions {
        identifier_digits: args.identifier_digits,
    };
    let tokens = Tokenizer::with_options(&src, options)
        .tokenize()
        .inspect_err(| lex_err | {
            if report_tokenize_error(&filename, &src, lex_err).is_err() {
                eprintln!("{} {}", "error:".red().bold(), lex_err);
            }
        })
        .map_err(| _ | () )?;

    let listing = TokenListing {
        tokens: &tokens,
        positions: args.positions,
        skip_whitespace: args.skip_whitespace,
    };
    println!("{}", listing);
    Ok(())
}
