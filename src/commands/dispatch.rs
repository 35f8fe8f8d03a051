//! Command dispatch logic for citeval
use std::time::Instant;

use citeval_core::error::{CitevalError, Result};

use crate::cli::Cli;
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let Some(path) = cli.file.as_deref() else {
        return Err(CitevalError::MissingInput);
    };

    if !path.is_file() {
        return Err(CitevalError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(elapsed = ?start.elapsed(), path = %path.display(), "resolve_input");

    match cli.show_prompt {
        Some(row) => commands::show_prompt::execute(path, row),
        None => commands::evaluate::execute(cli, path, start),
    }
}
