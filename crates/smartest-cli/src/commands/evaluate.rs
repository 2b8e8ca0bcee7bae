//! The `smartest evaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use smartest_core::{ScoreReport, Topic};

pub fn execute(
    reference: String,
    answer: String,
    topic: Option<String>,
    keywords: Option<String>,
    config_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let (scorer, catalog) = super::load_engine(config_path.as_deref())?;

    let keywords: Option<Vec<String>> = match (keywords, topic) {
        (Some(list), _) => Some(
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
        ),
        (None, Some(topic)) => {
            let topic: Topic = topic.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            Some(catalog.keywords(topic).to_vec())
        }
        (None, None) => None,
    };

    let report = scorer.evaluate(&reference, &answer, keywords.as_deref())?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    Ok(())
}

fn print_text(report: &ScoreReport) {
    println!("Score: {}/100", report.score);
    println!("Shape: {}", report.shape);

    if !report.components.is_empty() {
        println!("Components:");
        for (name, value) in &report.components {
            println!("  {name:<14} {value:>6.1}");
        }
    }

    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    };
    if !report.matched_keywords.is_empty() {
        println!("Matched: {}", join(&report.matched_keywords));
    }
    if !report.missing_keywords.is_empty() {
        println!("Missing: {}", join(&report.missing_keywords));
    }

    println!("Feedback:");
    for line in &report.feedback {
        println!("  {line}");
    }
}
