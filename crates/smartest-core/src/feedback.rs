//! Human-readable feedback derived from a finished [`ScoreReport`].

use crate::classify::AnswerShape;
use crate::config::FeedbackThresholds;
use crate::extract::StructuredKind;
use crate::scorer::ScoreReport;

/// Feedback for an empty candidate answer.
pub const EMPTY_ANSWER: &str = "Empty answer.";

/// Build the feedback lines for a report.
///
/// Keyword-scored answers get a band keyed off the matched share of the
/// reference's keywords, followed by the missing keywords and any close
/// misspellings. Every other answer gets a line about its key element and a
/// band keyed off the final score.
pub fn build_feedback(report: &ScoreReport, thresholds: &FeedbackThresholds) -> Vec<String> {
    let mut lines = Vec::new();

    let total = report.matched_keywords.len() + report.missing_keywords.len();
    if total > 0 {
        lines.push(keyword_band(report.matched_keywords.len(), total, thresholds));

        if !report.missing_keywords.is_empty() {
            lines.push(format!(
                "Missing: {}",
                report
                    .missing_keywords
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if !report.partial_matches.is_empty() {
            let close: Vec<String> = report
                .partial_matches
                .iter()
                .map(|p| format!("{} ({:.0}%)", p.keyword, p.similarity * 100.0))
                .collect();
            lines.push(format!("Close matches: {}", close.join(", ")));
        }
        if !report.unexpected_keywords.is_empty() {
            lines.push(format!(
                "Not expected here: {}",
                report
                    .unexpected_keywords
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        return lines;
    }

    if let Some(line) = key_element_line(report) {
        lines.push(line);
    }
    lines.push(score_band(report.score).to_string());
    lines
}

fn keyword_band(found: usize, total: usize, thresholds: &FeedbackThresholds) -> String {
    let share = found as f64 / total as f64;
    if found == total {
        "Excellent! All key concepts are present.".to_string()
    } else if share >= thresholds.mostly_present_ratio {
        format!("Good! {found}/{total} key concepts identified.")
    } else if share >= thresholds.partially_present_ratio {
        format!("Partially correct. {found}/{total} key concepts identified.")
    } else {
        format!("Insufficient. Only {found}/{total} key concepts identified.")
    }
}

fn score_band(score: u8) -> &'static str {
    match score {
        90.. => "Excellent! The answer is almost identical to the reference.",
        70..=89 => "Good! The answer is similar to the reference.",
        50..=69 => "Partially correct. The answer contains some correct elements.",
        _ => "Incorrect. The answer differs significantly from the reference.",
    }
}

fn component(report: &ScoreReport, name: &str) -> Option<f64> {
    report.components.get(name).copied()
}

fn key_element_line(report: &ScoreReport) -> Option<String> {
    match report.shape {
        AnswerShape::YesNoWithNumber => {
            let yes_no = component(report, "yes_no")?;
            let number = component(report, "number")?;
            let polarity = if yes_no >= 100.0 {
                "Yes/no judgment matches."
            } else {
                "Yes/no judgment is wrong or missing."
            };
            let value = if number >= 100.0 {
                "Number matches."
            } else if number > 0.0 {
                "Number differs from the reference."
            } else {
                "No number given."
            };
            Some(format!("{polarity} {value}"))
        }
        AnswerShape::Structured(StructuredKind::Tuple) => {
            let key = component(report, "key_element")?;
            Some(if key >= 100.0 {
                "Tuple matches the reference.".to_string()
            } else {
                "Tuple does not match the reference (element order matters).".to_string()
            })
        }
        AnswerShape::Structured(StructuredKind::List) => {
            let key = component(report, "key_element")?;
            Some(format!("List elements are {key:.0}% similar to the reference."))
        }
        AnswerShape::Numeric => {
            let key = component(report, "key_element")?;
            Some(if key >= 100.0 {
                "Correct number.".to_string()
            } else {
                "Wrong or missing number.".to_string()
            })
        }
        AnswerShape::Textual => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::PartialMatch;
    use std::collections::{BTreeMap, BTreeSet};

    fn report(shape: AnswerShape, score: u8) -> ScoreReport {
        ScoreReport {
            score,
            shape,
            matched_keywords: BTreeSet::new(),
            missing_keywords: BTreeSet::new(),
            unexpected_keywords: BTreeSet::new(),
            partial_matches: Vec::new(),
            components: BTreeMap::new(),
            feedback: Vec::new(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_keywords_present() {
        let mut r = report(AnswerShape::Textual, 96);
        r.matched_keywords = set(&["backtracking", "fc"]);
        let lines = build_feedback(&r, &FeedbackThresholds::default());
        assert_eq!(lines, vec!["Excellent! All key concepts are present."]);
    }

    #[test]
    fn keyword_bands() {
        let thresholds = FeedbackThresholds::default();
        assert!(keyword_band(3, 4, &thresholds).starts_with("Good!"));
        assert!(keyword_band(2, 4, &thresholds).starts_with("Partially correct."));
        assert!(keyword_band(1, 4, &thresholds).starts_with("Insufficient."));
    }

    #[test]
    fn missing_and_close_matches_listed() {
        let mut r = report(AnswerShape::Textual, 40);
        r.matched_keywords = set(&["csp"]);
        r.missing_keywords = set(&["backtracking", "mrv"]);
        r.partial_matches = vec![PartialMatch {
            keyword: "backtracking".into(),
            similarity: 0.96,
        }];
        let lines = build_feedback(&r, &FeedbackThresholds::default());
        assert!(lines[0].starts_with("Insufficient."));
        assert_eq!(lines[1], "Missing: backtracking, mrv");
        assert_eq!(lines[2], "Close matches: backtracking (96%)");
    }

    #[test]
    fn score_bands_for_plain_text() {
        let lines = build_feedback(&report(AnswerShape::Textual, 91), &FeedbackThresholds::default());
        assert_eq!(lines, vec![score_band(91).to_string()]);
        assert!(score_band(75).starts_with("Good!"));
        assert!(score_band(50).starts_with("Partially"));
        assert!(score_band(10).starts_with("Incorrect."));
    }

    #[test]
    fn yes_no_line() {
        let mut r = report(AnswerShape::YesNoWithNumber, 44);
        r.components.insert("yes_no".into(), 0.0);
        r.components.insert("number".into(), 100.0);
        let lines = build_feedback(&r, &FeedbackThresholds::default());
        assert_eq!(lines[0], "Yes/no judgment is wrong or missing. Number matches.");
    }

    #[test]
    fn tuple_line() {
        let mut r = report(AnswerShape::Structured(StructuredKind::Tuple), 29);
        r.components.insert("key_element".into(), 20.0);
        let lines = build_feedback(&r, &FeedbackThresholds::default());
        assert!(lines[0].contains("element order matters"));
    }
}
