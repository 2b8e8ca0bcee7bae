//! HTML grade report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use smartest_core::grading::{GradeReport, TopicStats};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn score_class(score: f64) -> &'static str {
    if score >= 70.0 {
        "pass"
    } else if score >= 50.0 {
        "partial"
    } else {
        "fail"
    }
}

/// Generate an HTML page from a grade report.
pub fn generate_html(report: &GradeReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>smartest: {}</title>\n",
        html_escape(&report.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} graded | {} ungraded | average <strong>{:.1}</strong> | {}</p>\n",
        report.summary.graded,
        report.summary.ungraded,
        report.summary.average_score,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Per topic</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Topic</th><th>Questions</th><th>Average</th><th>Min</th><th>Max</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for stats in report.summary.per_topic.values() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{:.1}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&stats.topic),
            stats.questions,
            score_class(stats.average_score),
            stats.average_score,
            stats.min_score,
            stats.max_score,
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.summary.per_topic.is_empty() {
        html.push_str(&generate_bar_chart(&report.summary.per_topic));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Topic</th><th onclick=\"sortTable(2)\">Shape</th><th onclick=\"sortTable(3)\">Score</th><th>Answer</th><th>Reference</th><th>Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for q in &report.questions {
        let topic = q.topic.map(|t| t.id()).unwrap_or("-");
        let (class, shape, score, feedback) = match &q.report {
            Some(r) => (
                score_class(r.score as f64),
                r.shape.to_string(),
                r.score.to_string(),
                r.feedback.join(" "),
            ),
            None => (
                "ungraded",
                "-".to_string(),
                "-".to_string(),
                q.note.clone().unwrap_or_default(),
            ),
        };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            q.number,
            html_escape(topic),
            html_escape(&shape),
            score,
            html_escape(&q.response),
            html_escape(q.reference.as_deref().unwrap_or("")),
            html_escape(&feedback),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &GradeReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of the average score per topic.
fn generate_bar_chart(per_topic: &BTreeMap<String, TopicStats>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = per_topic.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (topic, stats)) in per_topic.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = (stats.average_score / 100.0).clamp(0.0, 1.0);
        let width = (share * max_width as f64) as usize;

        let color = match score_class(stats.average_score) {
            "pass" => "#22c55e",
            "partial" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(topic)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.average_score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --partial: #fef9c3; --fail: #fde2e2; --muted: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --partial: #713f12; --fail: #7f1d1d; --muted: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.partial { background: var(--partial); }
.fail { background: var(--fail); }
.ungraded { background: var(--muted); font-style: italic; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use smartest_core::grading::grade_sheet;
    use smartest_core::sheet::QuestionEntry;
    use smartest_core::{KeywordCatalog, Scorer, Topic};

    fn make_test_report() -> GradeReport {
        let questions = vec![
            QuestionEntry::new(1, Some(Topic::NQueens), "Strategie pentru 12-Queens?"),
            QuestionEntry::new(2, Some(Topic::NashEquilibrium), "Echilibru Nash pur?"),
            QuestionEntry::new(3, None, "Fără cheie"),
        ];
        let key = vec![
            "Backtracking cu Forward Checking".to_string(),
            "Da, (Jos, Stânga)".to_string(),
        ];
        let responses = vec![
            "backtracking <b>cu</b> fc".to_string(),
            "Da, (Stânga, Jos)".to_string(),
        ];
        let mut report = grade_sheet(
            &Scorer::default(),
            &KeywordCatalog::builtin(),
            &questions,
            &key,
            &responses,
        )
        .with_title("Seminar & test");
        report.id = uuid::Uuid::nil();
        report
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_test_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Seminar &amp; test"));
        assert!(html.contains("n-queens"));
        assert!(html.contains("nash-equilibrium"));
        assert!(html.contains("structured-tuple"));
        assert!(html.contains("class=\"ungraded\""));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn html_escapes_answers() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("backtracking &lt;b&gt;cu&lt;/b&gt; fc"));
        assert!(!html.contains("<b>cu</b>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
