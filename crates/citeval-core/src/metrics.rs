//! Set-overlap metrics between predicted and ground-truth citations
//!
//! Every metric takes the predicted list, the ground-truth list and a
//! [`MatchKind`]. Lists hold serialized segments, already trimmed.
//!
//! Ground truth carries no order. Predictions carry an order, but it is
//! treated as one arbitrary draw, so reciprocal rank is reported as an
//! expectation over every ordering of the predictions (see [`expected_mrr`]).

use std::fmt;

use crate::matching::{is_hit, MatchKind};

/// The five retrieval statistics, in output column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Mrr,
    Precision,
    Recall,
    F1,
    Jaccard,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Mrr,
        Metric::Precision,
        Metric::Recall,
        Metric::F1,
        Metric::Jaccard,
    ];

    /// Column prefix used in evaluated datasets
    pub fn column_label(&self) -> &'static str {
        match self {
            Metric::Mrr => "MRR",
            Metric::Precision => "Precision",
            Metric::Recall => "Recall",
            Metric::F1 => "f1",
            Metric::Jaccard => "Jaccard",
        }
    }

    pub fn compute(&self, predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
        match self {
            Metric::Mrr => expected_mrr(predictions, truths, kind),
            Metric::Precision => precision(predictions, truths, kind),
            Metric::Recall => recall(predictions, truths, kind),
            Metric::F1 => f1_score(predictions, truths, kind),
            Metric::Jaccard => jaccard(predictions, truths, kind),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_label())
    }
}

/// Output column name for a metric under a predicate, e.g. `MRR:Strict_Match`
pub fn column_name(metric: Metric, kind: MatchKind) -> String {
    format!("{}:{}", metric.column_label(), kind.column_label())
}

fn prediction_hits(predictions: &[String], truths: &[String], kind: MatchKind) -> usize {
    predictions
        .iter()
        .filter(|pred| is_hit(pred, truths, |p, t| kind.matches(p, t)))
        .count()
}

fn truth_hits(predictions: &[String], truths: &[String], kind: MatchKind) -> usize {
    truths
        .iter()
        .filter(|truth| is_hit(truth, predictions, |t, p| kind.matches(p, t)))
        .count()
}

/// Expected reciprocal rank of the first hit over all orderings of the
/// predictions.
///
/// With `m` predictions of which `h` are hits, the first hit sits at
/// position `k` with probability `C(m-k, h-1) / C(m, h)`, for
/// `k = 1..=m-h+1`. The probabilities are walked with the ratio
///
/// ```text
/// P(k+1) / P(k) = (m - k - h + 1) / (m - k),   P(1) = h / m
/// ```
///
/// which is the same identity without forming the binomials, so it stays
/// finite for large `m`.
pub fn expected_mrr(predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
    let m = predictions.len();
    if m == 0 {
        return 0.0;
    }
    let h = prediction_hits(predictions, truths, kind);
    expected_reciprocal_rank(m, h)
}

/// Closed form behind [`expected_mrr`] for `hits` hits among `total` items.
pub fn expected_reciprocal_rank(total: usize, hits: usize) -> f64 {
    if hits == 0 || total == 0 || hits > total {
        return 0.0;
    }

    let m = total as f64;
    let h = hits as f64;
    let mut probability = h / m;
    let mut score = 0.0;

    for k in 1..=(total - hits + 1) {
        score += probability / k as f64;
        if k < total {
            let k = k as f64;
            probability *= (m - k - h + 1.0) / (m - k);
        }
    }

    score
}

/// Share of predictions that hit at least one truth. 0 with no predictions.
pub fn precision(predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    prediction_hits(predictions, truths, kind) as f64 / predictions.len() as f64
}

/// Share of truths hit by at least one prediction. 0 with no truths.
pub fn recall(predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
    if truths.is_empty() {
        return 0.0;
    }
    truth_hits(predictions, truths, kind) as f64 / truths.len() as f64
}

pub fn f1_score(predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
    harmonic_mean(
        precision(predictions, truths, kind),
        recall(predictions, truths, kind),
    )
}

/// Harmonic mean of precision and recall, 0 when both are 0.
pub fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Matched truths over the size of the union.
///
/// A truth counts once no matter how many predictions hit it. Two empty
/// lists are identical (1.0); exactly one empty list scores 0.0.
pub fn jaccard(predictions: &[String], truths: &[String], kind: MatchKind) -> f64 {
    match (predictions.is_empty(), truths.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let intersection = truth_hits(predictions, truths, kind);
    let union = predictions.len() + truths.len() - intersection;
    intersection as f64 / union as f64
}

/// All fifteen metric values for one row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricTable {
    values: [[f64; 5]; 3],
}

impl MetricTable {
    pub fn compute(predictions: &[String], truths: &[String]) -> Self {
        let mut table = MetricTable::default();
        for (ki, kind) in MatchKind::ALL.iter().enumerate() {
            for (mi, metric) in Metric::ALL.iter().enumerate() {
                table.values[ki][mi] = metric.compute(predictions, truths, *kind);
            }
        }
        table
    }

    pub fn get(&self, metric: Metric, kind: MatchKind) -> f64 {
        self.values[kind_index(kind)][metric_index(metric)]
    }

    /// `(column name, value)` pairs in output column order: predicates
    /// outermost, metrics inside.
    pub fn columns(&self) -> Vec<(String, f64)> {
        let mut columns = Vec::with_capacity(MatchKind::ALL.len() * Metric::ALL.len());
        for kind in MatchKind::ALL {
            for metric in Metric::ALL {
                columns.push((column_name(metric, kind), self.get(metric, kind)));
            }
        }
        columns
    }
}

fn kind_index(kind: MatchKind) -> usize {
    match kind {
        MatchKind::Strict => 0,
        MatchKind::Cover => 1,
        MatchKind::Overlap => 2,
    }
}

fn metric_index(metric: Metric) -> usize {
    match metric {
        Metric::Mrr => 0,
        Metric::Precision => 1,
        Metric::Recall => 2,
        Metric::F1 => 3,
        Metric::Jaccard => 4,
    }
}

/// Render a metric value the way evaluated datasets store it: always with a
/// decimal point (`0.0`, `1.0`, `0.8333333333333334`).
pub fn format_metric(value: f64) -> String {
    format!("{:?}", value)
}
