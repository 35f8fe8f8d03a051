//! Structural checks run before any row is evaluated
//!
//! Checks run in order and stop at the first failure:
//! 1. the record is a JSON object
//! 2. every required field is present
//! 3. every field holds a list of strings
//! 4. the required lists share one non-zero length
//! 5. every citation line in `Reference` and `CandidateContext` parses

use serde_json::Value;

use super::{CANDIDATE_CONTEXT, QUESTION, REFERENCE, REQUIRED_FIELDS};
use crate::segment::Segment;

/// Outcome of [`validate`]: a verdict plus a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub passed: bool,
    pub reason: String,
}

impl Validation {
    fn ok() -> Self {
        Self {
            passed: true,
            reason: "Validation passed".to_string(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
        }
    }
}

pub fn validate(record: &Value) -> Validation {
    let Some(fields) = record.as_object() else {
        return Validation::fail("Input must be a JSON object mapping field names to lists");
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|name| !fields.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Validation::fail(format!("Missing required keys: {}", missing.join(", ")));
    }

    for (name, value) in fields {
        let Some(items) = value.as_array() else {
            return Validation::fail(format!("Value for key '{}' must be a list", name));
        };
        if !items.iter().all(Value::is_string) {
            return Validation::fail(format!("All items in list '{}' must be strings", name));
        }
    }

    let expected = list_len(record, QUESTION);
    if expected == 0 {
        return Validation::fail("All lists must have at least one item (length > 0)");
    }
    for name in REQUIRED_FIELDS {
        let len = list_len(record, name);
        if len != expected {
            return Validation::fail(format!(
                "All lists must have the same length, but '{}' has length {} (expected {}, the length of '{}')",
                name, len, expected, QUESTION
            ));
        }
    }

    for name in [REFERENCE, CANDIDATE_CONTEXT] {
        let entries = record[name].as_array().into_iter().flatten();
        for (row, entry) in entries.enumerate() {
            let text = entry.as_str().unwrap_or_default();
            for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
                if let Err(e) = Segment::parse(line) {
                    return Validation::fail(format!(
                        "{}[{}]: '{}' is not a valid citation (expected path:startline~endline): {}",
                        name, row, line, e
                    ));
                }
            }
        }
    }

    Validation::ok()
}

fn list_len(record: &Value, name: &str) -> usize {
    record[name].as_array().map(Vec::len).unwrap_or(0)
}
