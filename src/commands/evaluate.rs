//! Evaluate a dataset file and write `<stem>_evaluated.<ext>` next to it
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use citeval_core::config::JudgeConfig;
use citeval_core::dataset::{evaluated_output_path, load_record, save_record, validate};
use citeval_core::error::{CitevalError, Result};
use citeval_core::evaluate::{
    evaluate_with_progress, EvaluateOptions, EvaluationOutcome, RowResult, ScoreCell, Summary,
};
use citeval_core::judge::{HttpJudge, Judge};
use citeval_core::matching::MatchKind;
use citeval_core::metrics::{column_name, Metric};

use crate::cli::Cli;

pub fn execute(cli: &Cli, path: &Path, start: Instant) -> Result<()> {
    let record = load_record(path)?;

    // Reject bad input before any judge setup
    let validation = validate(&record);
    if !validation.passed {
        println!("Invalid dataset format: {}", validation.reason);
        return Ok(());
    }

    let judge = if cli.no_judge {
        None
    } else {
        Some(HttpJudge::new(judge_config(cli)?)?)
    };

    let options = EvaluateOptions {
        jobs: cli.jobs,
        ..Default::default()
    };
    let cancel = Arc::clone(&options.cancel);
    let _ = ctrlc::set_handler(move || {
        cancel.store(true, Ordering::SeqCst);
    });

    tracing::debug!(elapsed = ?start.elapsed(), "setup");

    let mut report = |done: usize, total: usize, row: &RowResult| {
        eprintln!("{}", progress_line(done, total, row));
    };
    let progress: Option<&mut dyn FnMut(usize, usize, &RowResult)> = if cli.quiet {
        None
    } else {
        Some(&mut report)
    };

    let outcome = evaluate_with_progress(
        record,
        judge.as_ref().map(|j| j as &dyn Judge),
        &options,
        progress,
    );
    let (record, summary, interrupted) = match outcome {
        EvaluationOutcome::Invalid { reason, .. } => {
            println!("Invalid dataset format: {}", reason);
            return Ok(());
        }
        EvaluationOutcome::Completed {
            record,
            summary,
            interrupted,
        } => (record, summary, interrupted),
    };

    let output = evaluated_output_path(path);
    save_record(&output, &record)?;
    tracing::info!(path = %output.display(), elapsed = ?start.elapsed(), "wrote evaluated dataset");

    if !cli.quiet {
        println!("{}", output.display());
        print_summary(&summary, !cli.no_judge);
    }

    if interrupted {
        return Err(CitevalError::Interrupted);
    }
    Ok(())
}

/// Config file and environment, then command-line overrides.
fn judge_config(cli: &Cli) -> Result<JudgeConfig> {
    let mut config = JudgeConfig::resolve(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base = api_base.clone();
    }
    config.validate()?;
    tracing::debug!(model = %config.model, endpoint = %config.endpoint(), "judge config");
    Ok(config)
}

/// `[3/40] row 2 done (score 7)`
fn progress_line(done: usize, total: usize, row: &RowResult) -> String {
    let mut line = format!("[{}/{}] row {} done", done, total, row.index);
    match &row.score {
        ScoreCell::Parsed(score) => line.push_str(&format!(" (score {})", score)),
        ScoreCell::Unparsed(_) => line.push_str(" (no score line)"),
        ScoreCell::JudgeFailed => line.push_str(" (judge failed)"),
        ScoreCell::Skipped => {}
    }
    line
}

fn print_summary(summary: &Summary, judged: bool) {
    println!();
    println!("Rows evaluated: {}/{}", summary.completed, summary.rows);

    if judged {
        match summary.mean_score {
            Some(mean) => println!(
                "Judge score: {:.2}/10 (mean of {} scored rows)",
                mean, summary.scored
            ),
            None => println!("Judge score: n/a (no numeric scores)"),
        }
        if summary.unparsed > 0 || summary.judge_failures > 0 {
            println!(
                "Unparsed verdicts: {}, judge failures: {}",
                summary.unparsed, summary.judge_failures
            );
        }
    }

    println!();
    print!("{:<10}", "");
    for kind in MatchKind::ALL {
        print!("{:>15}", kind.column_label());
    }
    println!();

    for metric in Metric::ALL {
        print!("{:<10}", metric.column_label());
        for kind in MatchKind::ALL {
            let mean = summary
                .metric_mean(&column_name(metric, kind))
                .unwrap_or(0.0);
            print!("{:>15.4}", mean);
        }
        println!();
    }
}
