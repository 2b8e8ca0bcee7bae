//! The `smartest compare` command.

use std::path::PathBuf;

use anyhow::Result;

use smartest_core::grading::{GradeReport, ScoreChange};

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = GradeReport::load_json(&baseline_path)?;
    let current = GradeReport::load_json(&current_path)?;

    let diff = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", diff.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged (average {:+.1})",
                diff.regressions.len(),
                diff.improvements.len(),
                diff.unchanged,
                diff.average_delta
            );

            print_changes("Regressions", &diff.regressions);
            print_changes("Improvements", &diff.improvements);

            if diff.new_questions > 0 {
                println!("\n{} new question(s)", diff.new_questions);
            }
            if diff.removed_questions > 0 {
                println!("{} removed question(s)", diff.removed_questions);
            }
        }
    }

    if fail_on_regression && diff.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_changes(heading: &str, changes: &[ScoreChange]) {
    if changes.is_empty() {
        return;
    }
    println!("\n{heading}:");
    for c in changes {
        println!(
            "  Q{} ({}) {} -> {} ({:+})",
            c.number,
            c.topic.map(|t| t.id()).unwrap_or("-"),
            c.baseline_score,
            c.current_score,
            c.delta
        );
    }
}
