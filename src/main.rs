use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, builder::RangedU64ValueParser};

#[macro_use]
mod ast;
mod environment;
mod error;
mod infix;
mod interpreter;
mod loader;
mod parser;
mod session;
mod tokeniser;

use environment::Environment;
use session::Session;

/// Evaluate postfix integer expressions read from standard input.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File of `<name> <integer>` records to define before the session starts.
    symbol_file: Option<PathBuf>,

    /// Deepest expression the parser will accept.
    #[arg(
        long,
        default_value_t = parser::DEFAULT_MAX_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_depth: usize,

    /// Don't print the symbol table before and after the session.
    #[arg(long)]
    no_dump: bool,

    /// Log parser and evaluator activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut env = Environment::new();
    if let Some(path) = &args.symbol_file {
        loader::load_symbols(path, &mut env)?;
    }

    let stdout = io::stdout();
    if !args.no_dump {
        env.dump(&mut stdout.lock())
            .context("Failed to write the symbol table")?;
    }

    let config = parser::ParserConfig {
        max_depth: args.max_depth,
    };
    let mut session = Session::new(env, config, io::stdin().lock(), stdout.lock(), io::stderr());
    session.run().context("Session I/O failed")?;
    let env = session.into_env();
    if env.is_empty() {
        log::info!("Session ended with no symbols defined");
    } else {
        log::info!("Session ended with {} symbol(s) defined", env.len());
    }

    if !args.no_dump {
        env.dump(&mut stdout.lock())
            .context("Failed to write the symbol table")?;
    }

    Ok(())
}
