use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{CitevalError, Result};

/// Read a dataset file as raw JSON. No validation happens here.
pub fn load_record(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(CitevalError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)
        .map_err(|e| CitevalError::io_operation("read", path.display(), e))?;
    let record = serde_json::from_str(&content)?;
    Ok(record)
}

/// Write a record as JSON indented by four spaces, keys in insertion order.
pub fn save_record(path: &Path, record: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut ser)?;

    fs::write(path, buf).map_err(|e| CitevalError::io_operation("write", path.display(), e))?;
    Ok(())
}

/// `data/set.json` becomes `data/set_evaluated.json`.
pub fn evaluated_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_evaluated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_evaluated", stem),
    };
    input.with_file_name(name)
}
