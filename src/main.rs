//! Citeval - evaluate cited answers to questions about a code corpus
//!
//! Reads a columnar JSON dataset, grades each candidate answer with an LLM
//! judge, scores its citations against the ground truth, and writes the
//! augmented dataset next to the input.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use citeval_core::error::{CitevalError, ExitCode as CitevalExitCode};
use citeval_core::logging;
use cli::Cli;

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    // Initialize structured logging
    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(CitevalExitCode::Success as u8),
        Err(e) => {
            let exit_code = e.exit_code();
            match &e {
                // Input diagnostics are printed as-is
                CitevalError::MissingInput | CitevalError::NotAFile { .. } => eprintln!("{}", e),
                CitevalError::Interrupted if cli.quiet => {}
                _ => eprintln!("error: {}", e),
            }
            ExitCode::from(exit_code as u8)
        }
    }
}
