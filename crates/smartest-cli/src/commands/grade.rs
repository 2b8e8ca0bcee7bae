//! The `smartest grade` command.

use std::path::PathBuf;

use anyhow::Result;

use smartest_core::grading::{grade_sheet, GradeReport};
use smartest_core::sheet::{load_answer_sheet, load_sheet_pair, validate_sheets};
use smartest_report::{write_html_report, write_markdown_report};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    questions_path: PathBuf,
    key_path: PathBuf,
    responses_path: PathBuf,
    output: PathBuf,
    format: String,
    title: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (scorer, catalog) = super::load_engine(config_path.as_deref())?;

    let (questions, key) = load_sheet_pair(&questions_path, Some(&key_path))?;
    let responses = load_answer_sheet(&responses_path)?;
    anyhow::ensure!(
        !questions.is_empty(),
        "no questions found in {}",
        questions_path.display()
    );

    for w in validate_sheets(&questions, &key) {
        match w.question {
            Some(n) => eprintln!("  [Q{n}] WARNING: {}", w.message),
            None => eprintln!("  WARNING: {}", w.message),
        }
    }
    if responses.len() > questions.len() {
        eprintln!(
            "  WARNING: {} responses for {} questions; extra responses ignored",
            responses.len(),
            questions.len()
        );
    }

    let title = title.unwrap_or_else(|| {
        questions_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Graded test".to_string())
    });
    let report = grade_sheet(&scorer, &catalog, &questions, &key, &responses).with_title(title);

    print_summary(&report);

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "text" => {}
            "json" => {
                let path = output.join(format!("grades-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("grades-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("grades-{timestamp}.md"));
                write_markdown_report(&report, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &GradeReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Shape", "Score", "Feedback"]);

    for q in &report.questions {
        let topic = q.topic.map(|t| t.id()).unwrap_or("-");
        match &q.report {
            Some(r) => table.add_row(vec![
                Cell::new(q.number),
                Cell::new(topic),
                Cell::new(r.shape.to_string()),
                Cell::new(r.score),
                Cell::new(r.feedback.first().map(String::as_str).unwrap_or("")),
            ]),
            None => table.add_row(vec![
                Cell::new(q.number),
                Cell::new(topic),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(q.note.as_deref().unwrap_or("not graded")),
            ]),
        };
    }

    println!("{table}");
    println!(
        "Graded {} of {} questions, average score {:.1}",
        report.summary.graded,
        report.questions.len(),
        report.summary.average_score
    );
}
