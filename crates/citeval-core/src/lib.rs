//! Citeval Core Library
//!
//! Scores question-answering runs over a code corpus: citation retrieval
//! metrics under three match predicates, and LLM-judged answer grading.

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod judge;
pub mod logging;
pub mod matching;
pub mod metrics;
pub mod segment;
