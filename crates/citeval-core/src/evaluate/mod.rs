//! Evaluation orchestration
//!
//! Each row is judged and scored independently into an owned [`RowResult`].
//! Rows run sequentially or on a bounded pool of scoped worker threads; the
//! results are merged into the record's columns only after every worker has
//! finished, following the fixed [`OutputSchema`].

mod schema;
mod summary;

pub use schema::{
    OutputSchema, EVALUATION_OUTPUT, EVALUATION_OUTPUT_THINKING, EVALUATION_PROMPT,
    EVALUATION_SCORE,
};
pub use summary::Summary;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use serde_json::Value;

use crate::dataset::{Dataset, Row};
use crate::judge::{build_judge_prompt, parse_score, Judge};
use crate::metrics::MetricTable;
use crate::trace_time;

/// Score cell written for rows whose judge call failed
pub const JUDGE_ERROR: &str = "JUDGE_ERROR";

/// What ended up in a row's `EvaluationScore` cell
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreCell {
    /// Number captured from the score line, as written
    Parsed(String),
    /// No score line; the raw verdict is stored instead
    Unparsed(String),
    JudgeFailed,
    /// Judging disabled for this run
    Skipped,
}

impl ScoreCell {
    pub fn render(&self) -> String {
        match self {
            ScoreCell::Parsed(score) => score.clone(),
            ScoreCell::Unparsed(raw) => raw.clone(),
            ScoreCell::JudgeFailed => JUDGE_ERROR.to_string(),
            ScoreCell::Skipped => String::new(),
        }
    }

    /// Numeric value, when the captured score is a number.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            ScoreCell::Parsed(score) => score.parse().ok(),
            _ => None,
        }
    }
}

/// Everything derived for one row
#[derive(Debug, Clone)]
pub struct RowResult {
    pub index: usize,
    pub prompt: String,
    pub output: String,
    pub reasoning: String,
    pub score: ScoreCell,
    pub metrics: MetricTable,
}

#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Worker threads; 1 runs rows in order on the calling thread
    pub jobs: usize,
    /// Set to stop scheduling new rows
    pub cancel: Arc<AtomicBool>,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl EvaluateOptions {
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum EvaluationOutcome {
    /// Validation failed; the record is returned as given
    Invalid { record: Value, reason: String },
    Completed {
        record: Value,
        summary: Summary,
        /// Some rows never ran and carry empty derived cells
        interrupted: bool,
    },
}

/// Judge and score one row.
///
/// Judge failures are recorded in the result rather than returned.
pub fn evaluate_row(row: Row<'_>, judge: Option<&dyn Judge>) -> RowResult {
    let start = Instant::now();
    let prompt = build_judge_prompt(
        row.question,
        row.answer,
        row.evaluation,
        row.candidate_answer,
    );

    let (output, reasoning, score) = match judge {
        None => (String::new(), String::new(), ScoreCell::Skipped),
        Some(judge) => match judge.judge(&prompt) {
            Ok(verdict) => {
                let score = match parse_score(&verdict.verdict) {
                    Some(score) => ScoreCell::Parsed(score.to_string()),
                    None => {
                        tracing::warn!(row = row.index, "judge verdict has no score line");
                        ScoreCell::Unparsed(verdict.verdict.clone())
                    }
                };
                (verdict.verdict, verdict.reasoning, score)
            }
            Err(e) => {
                tracing::warn!(row = row.index, error = %e, "judge call failed");
                (
                    format!("judge call failed: {e}"),
                    String::new(),
                    ScoreCell::JudgeFailed,
                )
            }
        },
    };

    let metrics = MetricTable::compute(&row.predictions(), &row.truths());
    trace_time!(start, "evaluate_row", row = row.index);

    RowResult {
        index: row.index,
        prompt,
        output,
        reasoning,
        score,
        metrics,
    }
}

/// Validate, evaluate every row and merge the results into the record.
pub fn evaluate(
    record: Value,
    judge: Option<&dyn Judge>,
    options: &EvaluateOptions,
) -> EvaluationOutcome {
    evaluate_with_progress(record, judge, options, None)
}

/// Like [`evaluate`], reporting `(completed, total, row)` after each row
/// finishes. The callback runs on the calling thread, in completion order.
pub fn evaluate_with_progress(
    record: Value,
    judge: Option<&dyn Judge>,
    options: &EvaluateOptions,
    progress: Option<&mut dyn FnMut(usize, usize, &RowResult)>,
) -> EvaluationOutcome {
    let mut dataset = match Dataset::from_record(record) {
        Ok(dataset) => dataset,
        Err(invalid) => {
            return EvaluationOutcome::Invalid {
                record: invalid.record,
                reason: invalid.reason,
            }
        }
    };

    let start = Instant::now();
    tracing::info!(rows = dataset.len(), jobs = options.jobs, "evaluating dataset");

    let results = run_rows(&dataset, judge, options, progress);
    let interrupted = results.iter().any(Option::is_none);
    if interrupted {
        tracing::warn!(
            completed = results.iter().flatten().count(),
            total = results.len(),
            "evaluation interrupted, keeping completed rows"
        );
    }

    let summary = Summary::from_results(&results);
    OutputSchema::new().merge(&mut dataset, &results);
    trace_time!(start, "evaluate", rows = results.len());

    EvaluationOutcome::Completed {
        record: dataset.into_record(),
        summary,
        interrupted,
    }
}

/// Results indexed by row; `None` for rows skipped after cancellation.
fn run_rows(
    dataset: &Dataset,
    judge: Option<&dyn Judge>,
    options: &EvaluateOptions,
    mut progress: Option<&mut dyn FnMut(usize, usize, &RowResult)>,
) -> Vec<Option<RowResult>> {
    let len = dataset.len();
    let mut results: Vec<Option<RowResult>> = (0..len).map(|_| None).collect();
    let jobs = options.jobs.clamp(1, len.max(1));
    let mut completed = 0;

    if jobs == 1 {
        for row in dataset.rows() {
            if options.cancelled() {
                break;
            }
            tracing::debug!(row = row.index, "evaluating row");
            let result = evaluate_row(row, judge);
            completed += 1;
            if let Some(cb) = progress.as_mut() {
                cb(completed, len, &result);
            }
            results[row.index] = Some(result);
        }
        return results;
    }

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for worker in 0..jobs {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || loop {
                if options.cancelled() {
                    break;
                }
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(row) = dataset.row(index) else {
                    break;
                };
                tracing::debug!(row = index, worker, "evaluating row");
                if tx.send(evaluate_row(row, judge)).is_err() {
                    break;
                }
            });
        }
        // Workers hold the only senders now; the loop ends when they all exit
        drop(tx);

        for result in rx {
            completed += 1;
            if let Some(cb) = progress.as_mut() {
                cb(completed, len, &result);
            }
            let index = result.index;
            results[index] = Some(result);
        }
    });

    results
}
