//! CLI argument parsing for citeval
//!
//! One positional dataset path plus judge, concurrency and logging flags.

pub mod parse;

use std::path::PathBuf;

use clap::Parser;

use parse::{parse_jobs, parse_log_level};

/// Citeval - score cited answers against a ground-truth dataset
#[derive(Parser, Debug)]
#[command(name = "citeval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset to evaluate (JSON object of equal-length string lists)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Judge configuration file (TOML)
    #[arg(long, value_name = "PATH", env = "CITEVAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Judge model name
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible judge API
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Rows evaluated concurrently
    #[arg(long, short = 'j', default_value_t = 1, value_parser = parse_jobs)]
    pub jobs: usize,

    /// Skip the judge; compute citation metrics only
    #[arg(long)]
    pub no_judge: bool,

    /// Print the judge prompt for one row (0-based) and exit
    #[arg(long, value_name = "ROW")]
    pub show_prompt: Option<usize>,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    /// Debug-level logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Log filter: a level (error, warn, info, debug, trace) or full directives
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
