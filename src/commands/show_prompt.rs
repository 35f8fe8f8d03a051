//! `--show-prompt`: print the judge prompt for one row without calling the judge
use std::path::Path;

use citeval_core::bail_invalid;
use citeval_core::dataset::{load_record, Dataset};
use citeval_core::error::Result;
use citeval_core::judge::build_judge_prompt;

pub fn execute(path: &Path, row: usize) -> Result<()> {
    let dataset = match Dataset::from_record(load_record(path)?) {
        Ok(dataset) => dataset,
        Err(invalid) => {
            println!("Invalid dataset format: {}", invalid.reason);
            return Ok(());
        }
    };

    let Some(item) = dataset.row(row) else {
        bail_invalid!(
            "row",
            format!("{} (dataset has {} rows)", row, dataset.len())
        );
    };

    println!(
        "{}",
        build_judge_prompt(
            item.question,
            item.answer,
            item.evaluation,
            item.candidate_answer
        )
    );
    Ok(())
}
