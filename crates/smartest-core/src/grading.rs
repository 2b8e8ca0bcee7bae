//! Batch grading of a whole answer sheet, with JSON persistence and
//! regrade comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scorer::{ScoreReport, Scorer};
use crate::sheet::QuestionEntry;
use crate::topic::{KeywordCatalog, Topic};

/// Per-topic key for questions without a recognized topic.
pub const UNTAGGED: &str = "untagged";

/// One question of a graded sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub number: u32,
    pub topic: Option<Topic>,
    pub question: String,
    /// Reference answer from the key, absent when the key is too short.
    pub reference: Option<String>,
    /// The submitted answer; empty when none was given.
    pub response: String,
    /// `None` when the question could not be graded.
    pub report: Option<ScoreReport>,
    /// Why the question was not graded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl GradedQuestion {
    pub fn score(&self) -> Option<u8> {
        self.report.as_ref().map(|r| r.score)
    }

    fn topic_key(&self) -> String {
        self.topic
            .map(|t| t.id().to_string())
            .unwrap_or_else(|| UNTAGGED.to_string())
    }
}

/// Score statistics for one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicStats {
    pub topic: String,
    pub questions: usize,
    pub average_score: f64,
    pub min_score: u8,
    pub max_score: u8,
}

/// Aggregate statistics over a graded sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeSummary {
    pub graded: usize,
    pub ungraded: usize,
    /// Mean over graded questions, 0 when nothing was graded.
    pub average_score: f64,
    pub per_topic: BTreeMap<String, TopicStats>,
}

impl GradeSummary {
    /// Compute the summary of a list of graded questions.
    pub fn compute(questions: &[GradedQuestion]) -> Self {
        let mut by_topic: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        let mut ungraded = 0usize;

        for q in questions {
            match q.score() {
                Some(score) => by_topic.entry(q.topic_key()).or_default().push(score),
                None => ungraded += 1,
            }
        }

        let scores: Vec<u8> = by_topic.values().flatten().copied().collect();
        let per_topic = by_topic
            .into_iter()
            .map(|(topic, scores)| {
                let stats = TopicStats {
                    topic: topic.clone(),
                    questions: scores.len(),
                    average_score: mean(&scores),
                    min_score: scores.iter().copied().min().unwrap_or(0),
                    max_score: scores.iter().copied().max().unwrap_or(0),
                };
                (topic, stats)
            })
            .collect();

        Self {
            graded: scores.len(),
            ungraded,
            average_score: mean(&scores),
            per_topic,
        }
    }
}

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}

/// A graded answer sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the sheet was graded.
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub questions: Vec<GradedQuestion>,
    pub summary: GradeSummary,
}

/// Grade a sheet of responses against an answer key.
///
/// Question `i` is scored with `key[i]` as reference and `responses[i]` as
/// candidate. A missing response counts as an empty answer. A question whose
/// reference is missing or blank is reported as ungraded. Keywords come from
/// the catalog entry of the question's topic.
pub fn grade_sheet(
    scorer: &Scorer,
    catalog: &KeywordCatalog,
    questions: &[QuestionEntry],
    key: &[String],
    responses: &[String],
) -> GradeReport {
    let graded: Vec<GradedQuestion> = questions
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let reference = key.get(i).cloned();
            let response = responses.get(i).cloned().unwrap_or_default();
            let keywords = entry.topic.map(|t| catalog.keywords(t));

            let (report, note) = match reference.as_deref() {
                Some(reference) => match scorer.evaluate(reference, &response, keywords) {
                    Ok(report) => (Some(report), None),
                    Err(e) => {
                        tracing::warn!("question {}: {e}", entry.number);
                        (None, Some(e.to_string()))
                    }
                },
                None => {
                    tracing::warn!("question {}: no reference answer in key", entry.number);
                    (None, Some("no reference answer in key".to_string()))
                }
            };

            GradedQuestion {
                number: entry.number,
                topic: entry.topic,
                question: entry.text.clone(),
                reference,
                response,
                report,
                note,
            }
        })
        .collect();

    let summary = GradeSummary::compute(&graded);
    tracing::info!(
        graded = summary.graded,
        ungraded = summary.ungraded,
        average = summary.average_score,
        "graded sheet"
    );

    GradeReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        title: "Graded test".to_string(),
        questions: graded,
        summary,
    }
}

impl GradeReport {
    /// Replace the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize grade report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write grade report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read grade report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse grade report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline grading of the same sheet.
    ///
    /// Questions are matched by number. A change counts only when the score
    /// moves by more than `threshold` points.
    pub fn compare(&self, baseline: &GradeReport, threshold: f64) -> RegradeDiff {
        let score_map = |report: &GradeReport| -> BTreeMap<u32, (Option<Topic>, u8)> {
            report
                .questions
                .iter()
                .filter_map(|q| q.score().map(|s| (q.number, (q.topic, s))))
                .collect()
        };

        let baseline_scores = score_map(baseline);
        let current_scores = score_map(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for (&number, &(topic, current)) in &current_scores {
            let Some(&(_, previous)) = baseline_scores.get(&number) else {
                new_questions += 1;
                continue;
            };
            let change = ScoreChange {
                number,
                topic,
                baseline_score: previous,
                current_score: current,
                delta: current as i32 - previous as i32,
            };
            if (change.delta as f64) < -threshold {
                regressions.push(change);
            } else if (change.delta as f64) > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_questions = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(k))
            .count();

        RegradeDiff {
            regressions,
            improvements,
            unchanged,
            new_questions,
            removed_questions,
            average_delta: self.summary.average_score - baseline.summary.average_score,
        }
    }
}

/// Result of comparing two gradings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegradeDiff {
    /// Questions whose score went down.
    pub regressions: Vec<ScoreChange>,
    /// Questions whose score went up.
    pub improvements: Vec<ScoreChange>,
    pub unchanged: usize,
    /// Graded now but not in the baseline.
    pub new_questions: usize,
    /// Graded in the baseline but not now.
    pub removed_questions: usize,
    pub average_delta: f64,
}

/// A score that moved between two gradings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub number: u32,
    pub topic: Option<Topic>,
    pub baseline_score: u8,
    pub current_score: u8,
    pub delta: i32,
}

impl RegradeDiff {
    /// Format the diff as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged, average {:+.1}\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged,
            self.average_delta
        ));

        for (heading, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {heading}\n\n"));
            md.push_str("| Question | Topic | Baseline | Current | Delta |\n");
            md.push_str("|----------|-------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {:+} |\n",
                    c.number,
                    c.topic.map_or(UNTAGGED, |t| t.id()),
                    c.baseline_score,
                    c.current_score,
                    c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if any score went down.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuestionEntry> {
        vec![
            QuestionEntry::new(1, Some(Topic::NQueens), "Strategie pentru 12-Queens?"),
            QuestionEntry::new(2, Some(Topic::NQueens), "Câte soluții are 8-Queens?"),
            QuestionEntry::new(3, None, "Întrebare fără răspuns în cheie"),
        ]
    }

    fn key() -> Vec<String> {
        vec![
            "Backtracking cu Forward Checking".into(),
            "Există 92 de soluții".into(),
        ]
    }

    fn grade(responses: &[&str]) -> GradeReport {
        let responses: Vec<String> = responses.iter().map(|s| s.to_string()).collect();
        grade_sheet(
            &Scorer::default(),
            &KeywordCatalog::builtin(),
            &questions(),
            &key(),
            &responses,
        )
    }

    #[test]
    fn grades_each_question() {
        let report = grade(&["Backtracking cu FC", "92"]);
        assert_eq!(report.questions.len(), 3);
        assert_eq!(report.summary.graded, 2);
        assert_eq!(report.summary.ungraded, 1);
        assert!(report.questions[2].report.is_none());
        assert!(report.questions[2].note.is_some());
        assert_eq!(report.summary.per_topic["n-queens"].questions, 2);
        assert!(report.summary.average_score > 50.0);
    }

    #[test]
    fn missing_response_scores_zero() {
        let report = grade(&["Backtracking cu FC"]);
        assert_eq!(report.questions[1].response, "");
        assert_eq!(report.questions[1].score(), Some(0));
    }

    #[test]
    fn summary_of_nothing() {
        let summary = GradeSummary::compute(&[]);
        assert_eq!(summary.graded, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.per_topic.is_empty());
    }

    #[test]
    fn compare_identical_reports() {
        let baseline = grade(&["Backtracking cu FC", "92"]);
        let current = grade(&["Backtracking cu FC", "92"]);
        let diff = current.compare(&baseline, 5.0);
        assert!(!diff.has_regressions());
        assert!(diff.improvements.is_empty());
        assert_eq!(diff.unchanged, 2);
    }

    #[test]
    fn compare_with_regression() {
        let baseline = grade(&["Backtracking cu FC", "92"]);
        let current = grade(&["Backtracking cu FC", "90"]);
        let diff = current.compare(&baseline, 5.0);
        assert_eq!(diff.regressions.len(), 1);
        assert_eq!(diff.regressions[0].number, 2);
        assert!(diff.regressions[0].delta < 0);
        assert!(diff.average_delta < 0.0);

        let md = diff.to_markdown();
        assert!(md.contains("Regressions"));
        assert!(md.contains("| 2 | n-queens |"));
    }

    #[test]
    fn compare_with_new_and_removed() {
        let baseline = grade(&["Backtracking cu FC", "92"]);
        let mut current = baseline.clone();
        current.questions[0].number = 10;
        let diff = current.compare(&baseline, 5.0);
        assert_eq!(diff.new_questions, 1);
        assert_eq!(diff.removed_questions, 1);
    }

    #[test]
    fn json_roundtrip() {
        let report = grade(&["Backtracking cu FC", "92"]).with_title("Seminar 3");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("grades.json");

        report.save_json(&path).unwrap();
        let loaded = GradeReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.title, "Seminar 3");
        assert_eq!(loaded.questions.len(), 3);
        assert_eq!(loaded.questions[1].score(), report.questions[1].score());
    }
}
