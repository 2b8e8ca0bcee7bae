//! Markdown grade report generator.

use std::path::Path;

use anyhow::{Context, Result};

use smartest_core::grading::GradeReport;

/// Escape characters that would break a markdown table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Generate a markdown summary of a grade report.
pub fn generate_markdown(report: &GradeReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", report.title));
    md.push_str(&format!(
        "Graded {} | ungraded {} | average **{:.1}** | {}\n\n",
        report.summary.graded,
        report.summary.ungraded,
        report.summary.average_score,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if !report.summary.per_topic.is_empty() {
        md.push_str("## Per topic\n\n");
        md.push_str("| Topic | Questions | Average | Min | Max |\n");
        md.push_str("|-------|-----------|---------|-----|-----|\n");
        for stats in report.summary.per_topic.values() {
            md.push_str(&format!(
                "| {} | {} | {:.1} | {} | {} |\n",
                stats.topic, stats.questions, stats.average_score, stats.min_score, stats.max_score
            ));
        }
        md.push('\n');
    }

    md.push_str("## Questions\n\n");
    md.push_str("| # | Topic | Shape | Score | Feedback |\n");
    md.push_str("|---|-------|-------|-------|----------|\n");
    for q in &report.questions {
        let topic = q.topic.map(|t| t.id()).unwrap_or("-");
        match &q.report {
            Some(r) => md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                q.number,
                topic,
                r.shape,
                r.score,
                cell(&r.feedback.join(" "))
            )),
            None => md.push_str(&format!(
                "| {} | {} | - | - | _{}_ |\n",
                q.number,
                topic,
                cell(q.note.as_deref().unwrap_or("not graded"))
            )),
        }
    }

    md
}

/// Write a markdown report to a file.
pub fn write_markdown_report(report: &GradeReport, path: &Path) -> Result<()> {
    let md = generate_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}
