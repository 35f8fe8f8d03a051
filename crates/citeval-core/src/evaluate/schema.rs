//! Columns the evaluator adds to a dataset.

use super::RowResult;
use crate::dataset::Dataset;
use crate::matching::MatchKind;
use crate::metrics::{column_name, format_metric, Metric};

pub const EVALUATION_PROMPT: &str = "EvaluationPrompt";
pub const EVALUATION_OUTPUT: &str = "EvaluationOutput";
pub const EVALUATION_OUTPUT_THINKING: &str = "EvaluationOutputThinking";
pub const EVALUATION_SCORE: &str = "EvaluationScore";

/// Output columns in the order they are appended: the fifteen metric
/// columns, then the four judge columns.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    columns: Vec<String>,
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSchema {
    pub fn new() -> Self {
        let mut columns = Vec::with_capacity(MatchKind::ALL.len() * Metric::ALL.len() + 4);
        for kind in MatchKind::ALL {
            for metric in Metric::ALL {
                columns.push(column_name(metric, kind));
            }
        }
        columns.extend(
            [
                EVALUATION_PROMPT,
                EVALUATION_OUTPUT,
                EVALUATION_OUTPUT_THINKING,
                EVALUATION_SCORE,
            ]
            .map(String::from),
        );
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// One cell per column. Rows that never ran get empty cells.
    pub fn cells(&self, result: Option<&RowResult>) -> Vec<String> {
        let Some(result) = result else {
            return vec![String::new(); self.columns.len()];
        };

        let mut cells: Vec<String> = result
            .metrics
            .columns()
            .into_iter()
            .map(|(_, value)| format_metric(value))
            .collect();
        cells.push(result.prompt.clone());
        cells.push(result.output.clone());
        cells.push(result.reasoning.clone());
        cells.push(result.score.render());
        cells
    }

    /// Transpose per-row results into columns and attach them to the dataset.
    pub fn merge(&self, dataset: &mut Dataset, results: &[Option<RowResult>]) {
        let mut columns: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|_| Vec::with_capacity(results.len()))
            .collect();

        for result in results {
            for (column, cell) in columns.iter_mut().zip(self.cells(result.as_ref())) {
                column.push(cell);
            }
        }

        for (name, values) in self.columns.iter().zip(columns) {
            dataset.set_column(name, values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order() {
        let schema = OutputSchema::new();
        let columns = schema.columns();
        assert_eq!(columns.len(), 19);
        assert_eq!(columns[0], "MRR:Strict_Match");
        assert_eq!(columns[4], "Jaccard:Strict_Match");
        assert_eq!(columns[5], "MRR:Cover_Match");
        assert_eq!(columns[14], "Jaccard:Overlap_Match");
        assert_eq!(
            &columns[15..],
            &[
                "EvaluationPrompt",
                "EvaluationOutput",
                "EvaluationOutputThinking",
                "EvaluationScore"
            ]
        );
    }

    #[test]
    fn test_missing_row_has_empty_cells() {
        let cells = OutputSchema::new().cells(None);
        assert_eq!(cells.len(), 19);
        assert!(cells.iter().all(String::is_empty));
    }
}
