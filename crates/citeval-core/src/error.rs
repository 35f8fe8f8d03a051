//! Error types and exit codes for citeval
//!
//! Exit codes:
//! - 0: Success (including a dataset that failed validation; nothing is written)
//! - 1: Generic failure (missing input file, IO, malformed JSON)
//! - 2: Usage error (bad flags/values)
//! - 130: Interrupted (completed rows were still written)

mod macros;

use std::path::PathBuf;

use thiserror::Error;

use crate::judge::JudgeError;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Run interrupted by the user (130)
    Interrupted = 130,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during citeval operations
#[derive(Error, Debug)]
pub enum CitevalError {
    // Usage errors (exit code 2)
    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("Usage: citeval <file_path>")]
    MissingInput,

    #[error("'{}' is NOT a regular file or does not exist.", path.display())]
    NotAFile { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("judge error: {0}")]
    Judge(#[from] JudgeError),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("evaluation interrupted; completed rows were saved")]
    Interrupted,
}

impl CitevalError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        CitevalError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        CitevalError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CitevalError::InvalidValue { .. } => ExitCode::Usage,

            CitevalError::MissingInput
            | CitevalError::NotAFile { .. }
            | CitevalError::Io(_)
            | CitevalError::Json(_)
            | CitevalError::Toml(_)
            | CitevalError::Judge(_)
            | CitevalError::FailedOperationWithTarget { .. } => ExitCode::Failure,

            CitevalError::Interrupted => ExitCode::Interrupted,
        }
    }
}

/// Result type alias for citeval operations
pub type Result<T> = std::result::Result<T, CitevalError>;
