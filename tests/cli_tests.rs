//! Integration tests for the citeval CLI
//!
//! These tests run the citeval binary against datasets written to temporary
//! directories. None of them reach a real judge API.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

/// Get a Command for citeval, isolated from any user config
fn citeval(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("citeval");
    cmd.env("CITEVAL_CONFIG_DIR", config_dir)
        .env_remove("CITEVAL_CONFIG")
        .env_remove("CITEVAL_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn dataset() -> Value {
    json!({
        "Question": ["Where is the retry loop?", "Which file parses config?"],
        "Reference": ["src/a.py:10~20", "src/config.py:1~40\nsrc/env.py:5~9"],
        "Answer": ["In src/a.py", "src/config.py"],
        "Evaluation": [
            "1. Names src/a.py (10 points):",
            "1. Names config.py (6 points):\n2. Mentions env.py (4 points):"
        ],
        "CandidateContext": ["src/a.py:15~25", "src/config.py:1~40"],
        "CandidateAnswer": ["Around line 15 of src/a.py", "src/config.py"],
    })
}

fn write_dataset(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    citeval(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: citeval"))
        .stdout(predicate::str::contains("--no-judge"))
        .stdout(predicate::str::contains("--jobs"));
}

#[test]
fn test_missing_argument_exits_1() {
    let dir = tempdir().unwrap();
    citeval(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Usage: citeval <file_path>"));
}

#[test]
fn test_nonexistent_file_exits_1() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    citeval(dir.path())
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("'"))
        .stderr(predicate::str::contains("nope.json' is NOT a regular file or does not exist."))
        .stderr(predicate::str::contains("error:").not());
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = tempdir().unwrap();
    citeval(dir.path())
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("NOT a regular file"));
}

#[test]
fn test_zero_jobs_rejected() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());
    citeval(dir.path())
        .arg(&path)
        .args(["--jobs", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_malformed_json_exits_1() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    citeval(dir.path())
        .arg(&path)
        .arg("--no-judge")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON error"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_dataset_exits_0_without_output() {
    let dir = tempdir().unwrap();
    let mut data = dataset();
    data.as_object_mut().unwrap().remove("Evaluation");
    let path = write_dataset(dir.path(), "data.json", &data);

    citeval(dir.path())
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid dataset format:"))
        .stdout(predicate::str::contains("Evaluation"));

    assert!(!dir.path().join("data_evaluated.json").exists());
}

#[test]
fn test_malformed_citation_rejected() {
    let dir = tempdir().unwrap();
    let mut data = dataset();
    data["CandidateContext"] = json!(["src/a.py:25~15", "src/config.py:1~40"]);
    let path = write_dataset(dir.path(), "data.json", &data);

    citeval(dir.path())
        .arg(&path)
        .arg("--no-judge")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid dataset format:"))
        .stdout(predicate::str::contains("src/a.py:25~15"));

    assert!(!dir.path().join("data_evaluated.json").exists());
}

// ============================================================================
// Evaluation without a judge
// ============================================================================

#[test]
fn test_no_judge_writes_evaluated_file() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());
    let output = dir.path().join("data_evaluated.json");

    citeval(dir.path())
        .arg(&path)
        .arg("--no-judge")
        .assert()
        .success()
        .stdout(predicate::str::contains("data_evaluated.json"))
        .stdout(predicate::str::contains("Overlap_Match"));

    let out = read_json(&output);
    assert_eq!(out["Question"], dataset()["Question"]);
    assert_eq!(out["MRR:Strict_Match"], json!(["0.0", "1.0"]));
    assert_eq!(out["MRR:Overlap_Match"], json!(["1.0", "1.0"]));
    assert_eq!(out["Recall:Strict_Match"], json!(["0.0", "0.5"]));
    assert_eq!(out["Jaccard:Strict_Match"], json!(["0.0", "0.5"]));
    assert_eq!(out["EvaluationScore"], json!(["", ""]));
    assert!(out["EvaluationPrompt"][1]
        .as_str()
        .unwrap()
        .contains("[Score: x2/4]"));
}

#[test]
fn test_output_keeps_key_order_and_four_space_indent() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "run.json", &dataset());

    citeval(dir.path())
        .arg(&path)
        .args(["--no-judge", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let text = fs::read_to_string(dir.path().join("run_evaluated.json")).unwrap();
    assert!(text.starts_with("{\n    \"Question\": ["));

    let out: Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
    assert_eq!(keys[0], "Question");
    assert_eq!(keys[5], "CandidateAnswer");
    assert_eq!(keys[6], "MRR:Strict_Match");
    assert_eq!(keys[keys.len() - 1], "EvaluationScore");
}

#[test]
fn test_progress_reported_per_row_on_stderr() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());

    citeval(dir.path())
        .arg(&path)
        .arg("--no-judge")
        .assert()
        .success()
        .stderr(predicate::str::contains("[1/2] row 0 done"))
        .stderr(predicate::str::contains("[2/2] row 1 done"))
        .stdout(predicate::str::contains("row 0 done").not());
}

#[test]
fn test_parallel_jobs_match_sequential() {
    let dir = tempdir().unwrap();
    let seq = write_dataset(dir.path(), "seq.json", &dataset());
    let par = write_dataset(dir.path(), "par.json", &dataset());

    citeval(dir.path()).arg(&seq).arg("--no-judge").assert().success();
    citeval(dir.path())
        .arg(&par)
        .args(["--no-judge", "--jobs", "4"])
        .assert()
        .success();

    assert_eq!(
        read_json(&dir.path().join("seq_evaluated.json")),
        read_json(&dir.path().join("par_evaluated.json"))
    );
}

#[test]
fn test_missing_api_key_fails_before_writing() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());

    citeval(dir.path())
        .arg(&path)
        .env_remove("DEEPSEEK_API_KEY")
        .env_remove("CITEVAL_API_KEY")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key not set"));

    assert!(!dir.path().join("data_evaluated.json").exists());
}

// ============================================================================
// --show-prompt
// ============================================================================

#[test]
fn test_show_prompt() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());

    citeval(dir.path())
        .arg(&path)
        .args(["--show-prompt", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<question>Which file parses config?</question>",
        ))
        .stdout(predicate::str::contains("Criterion 2:"));

    assert!(!dir.path().join("data_evaluated.json").exists());
}

#[test]
fn test_show_prompt_row_out_of_range() {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), "data.json", &dataset());

    citeval(dir.path())
        .arg(&path)
        .args(["--show-prompt", "5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dataset has 2 rows"));
}
