//! LLM-as-judge answer grading.
//!
//! The evaluator only needs one capability from a judge: turn a prompt into a
//! reasoning trace and a final verdict. [`HttpJudge`] provides it over an
//! OpenAI-compatible chat-completions API; tests substitute their own
//! implementation of [`Judge`].
//!
//! # Example
//!
//! ```rust,no_run
//! use citeval_core::config::JudgeConfig;
//! use citeval_core::judge::{build_judge_prompt, parse_score, HttpJudge, Judge};
//!
//! let judge = HttpJudge::new(JudgeConfig::default()).unwrap();
//! let prompt = build_judge_prompt("Q?", "canonical", "1. Says X (10 points):", "candidate");
//! let verdict = judge.judge(&prompt).unwrap();
//! println!("score: {:?}", parse_score(&verdict.verdict));
//! ```

pub mod client;
pub mod prompt;
pub mod score;

pub use client::HttpJudge;
pub use prompt::{build_judge_prompt, detect_criteria};
pub use score::parse_score;

use thiserror::Error;

/// What a judge returns for one prompt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JudgeVerdict {
    /// Reasoning trace, empty when the model does not expose one
    pub reasoning: String,
    /// Final response text, expected to open with the score line
    pub verdict: String,
}

/// Grades an answer prompt.
///
/// Implementations must be shareable across worker threads.
pub trait Judge: Send + Sync {
    fn judge(&self, prompt: &str) -> Result<JudgeVerdict, JudgeError>;
}

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("API key not set (looked in {var} and CITEVAL_API_KEY)")]
    MissingApiKey { var: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("judge API request failed: {code} - {body}")]
    Status { code: u16, body: String },

    #[error("invalid judge API response format: {0}")]
    MalformedResponse(String),
}

impl JudgeError {
    /// Transport failures, rate limiting and server errors are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            JudgeError::Transport(_) => true,
            JudgeError::Status { code, .. } => *code == 429 || (500..600).contains(code),
            JudgeError::MissingApiKey { .. } | JudgeError::MalformedResponse(_) => false,
        }
    }
}
