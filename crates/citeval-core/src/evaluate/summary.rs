use super::{RowResult, ScoreCell};
use crate::matching::MatchKind;
use crate::metrics::{column_name, Metric};

/// Run-level aggregates over the completed rows
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: usize,
    pub completed: usize,
    /// Rows with a numeric judge score
    pub scored: usize,
    pub unparsed: usize,
    pub judge_failures: usize,
    pub mean_score: Option<f64>,
    /// Mean of each metric column, in output column order
    pub metric_means: Vec<(String, f64)>,
}

impl Summary {
    pub fn from_results(results: &[Option<RowResult>]) -> Self {
        let completed: Vec<&RowResult> = results.iter().flatten().collect();

        let scores: Vec<f64> = completed.iter().filter_map(|r| r.score.numeric()).collect();
        let mean_score = mean(&scores);
        let unparsed = completed
            .iter()
            .filter(|r| matches!(r.score, ScoreCell::Unparsed(_)))
            .count();
        let judge_failures = completed
            .iter()
            .filter(|r| r.score == ScoreCell::JudgeFailed)
            .count();

        let mut metric_means = Vec::with_capacity(MatchKind::ALL.len() * Metric::ALL.len());
        for kind in MatchKind::ALL {
            for metric in Metric::ALL {
                let values: Vec<f64> = completed.iter().map(|r| r.metrics.get(metric, kind)).collect();
                metric_means.push((column_name(metric, kind), mean(&values).unwrap_or(0.0)));
            }
        }

        Summary {
            rows: results.len(),
            completed: completed.len(),
            scored: scores.len(),
            unparsed,
            judge_failures,
            mean_score,
            metric_means,
        }
    }

    pub fn metric_mean(&self, column: &str) -> Option<f64> {
        self.metric_means
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
