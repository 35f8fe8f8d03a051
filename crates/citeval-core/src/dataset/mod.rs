//! Columnar evaluation datasets
//!
//! A dataset is one JSON object mapping field names to lists of strings,
//! one entry per evaluated item. Six fields are required on input; the
//! evaluator adds its own columns on output.

mod io;
mod validate;

pub use io::{evaluated_output_path, load_record, save_record};
pub use validate::{validate, Validation};

use serde_json::{Map, Value};

use crate::segment::split_segment_list;

pub const QUESTION: &str = "Question";
pub const REFERENCE: &str = "Reference";
pub const ANSWER: &str = "Answer";
pub const EVALUATION: &str = "Evaluation";
pub const CANDIDATE_CONTEXT: &str = "CandidateContext";
pub const CANDIDATE_ANSWER: &str = "CandidateAnswer";

/// Input fields every dataset must carry
pub const REQUIRED_FIELDS: [&str; 6] = [
    QUESTION,
    REFERENCE,
    ANSWER,
    EVALUATION,
    CANDIDATE_CONTEXT,
    CANDIDATE_ANSWER,
];

/// A record that failed validation, handed back unchanged
#[derive(Debug, Clone)]
pub struct InvalidDataset {
    pub record: Value,
    pub reason: String,
}

/// A validated dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    fields: Map<String, Value>,
    len: usize,
}

/// One item's inputs, borrowed from the dataset
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub index: usize,
    pub question: &'a str,
    pub reference: &'a str,
    pub answer: &'a str,
    pub evaluation: &'a str,
    pub candidate_context: &'a str,
    pub candidate_answer: &'a str,
}

impl Row<'_> {
    /// Ground-truth citations
    pub fn truths(&self) -> Vec<String> {
        split_segment_list(self.reference)
    }

    /// Predicted citations, in the order the candidate gave them
    pub fn predictions(&self) -> Vec<String> {
        split_segment_list(self.candidate_context)
    }
}

impl Dataset {
    /// Validate a raw record. On failure the record comes back untouched.
    pub fn from_record(record: Value) -> Result<Self, InvalidDataset> {
        let validation = validate(&record);
        if !validation.passed {
            return Err(InvalidDataset {
                record,
                reason: validation.reason,
            });
        }

        match record {
            Value::Object(fields) => {
                let len = fields
                    .get(QUESTION)
                    .and_then(Value::as_array)
                    .map(Vec::len)
                    .unwrap_or(0);
                Ok(Dataset { fields, len })
            }
            other => Err(InvalidDataset {
                record: other,
                reason: "Input must be a JSON object mapping field names to lists".to_string(),
            }),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn cell(&self, field: &str, index: usize) -> &str {
        self.fields
            .get(field)
            .and_then(|v| v.get(index))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        if index >= self.len {
            return None;
        }
        Some(Row {
            index,
            question: self.cell(QUESTION, index),
            reference: self.cell(REFERENCE, index),
            answer: self.cell(ANSWER, index),
            evaluation: self.cell(EVALUATION, index),
            candidate_context: self.cell(CANDIDATE_CONTEXT, index),
            candidate_answer: self.cell(CANDIDATE_ANSWER, index),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.len).filter_map(move |i| self.row(i))
    }

    /// Add or replace a column. The column must have one entry per item.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.len, "column {name} has the wrong length");
        let values = values.into_iter().map(Value::String).collect();
        self.fields.insert(name.to_string(), Value::Array(values));
    }

    pub fn into_record(self) -> Value {
        Value::Object(self.fields)
    }
}
