//! Plain-text question sheets and answer sheets.
//!
//! A question sheet is a header followed by blocks of the form:
//!
//! ```text
//! Question 1:
//! Topic: N-Queens Problem (Backtracking)
//!
//! <question text>
//!
//! --------------------------------------------------------------------------------
//! ```
//!
//! An answer sheet (an answer key, or a student's responses) uses
//! `Answer N:` markers and no topic line. Parsing never fails: text without
//! markers yields no entries.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::is_blank;
use crate::topic::Topic;

// Markers only count at the start of a line. Nine digits always fit a u32.
static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Question (\d{1,9}):").expect("valid question marker")
});

static ANSWER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Answer (\d{1,9}):").expect("valid answer marker")
});

static TOPIC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Topic:[ \t]*(.*?)[ \t]*\r?$\n*").expect("valid topic line"));

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{60,}").expect("valid separator"));

const RULE_WIDTH: usize = 80;

/// One question read from a question sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    /// The number after `Question`.
    pub number: u32,
    /// Topic resolved from the display name, if recognized.
    pub topic: Option<Topic>,
    /// The display name exactly as written, empty when absent.
    #[serde(default)]
    pub topic_name: String,
    pub text: String,
}

impl QuestionEntry {
    pub fn new(number: u32, topic: Option<Topic>, text: impl Into<String>) -> Self {
        Self {
            number,
            topic,
            topic_name: topic.map(|t| t.display_name().to_string()).unwrap_or_default(),
            text: text.into(),
        }
    }
}

/// Split `content` at each marker, yielding the number and the block after it.
///
/// Every marker yields a block, so positions line up across sheets.
fn blocks<'a>(marker: &Regex, content: &'a str) -> Vec<(u32, &'a str)> {
    let starts: Vec<(u32, usize, usize)> = marker
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str().parse().unwrap_or_default();
            Some((number, whole.start(), whole.end()))
        })
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &(number, _, body_start))| {
            let end = starts.get(i + 1).map_or(content.len(), |next| next.1);
            (number, &content[body_start..end])
        })
        .collect()
}

fn strip_separators(block: &str) -> String {
    SEPARATOR.replace_all(block, "").trim().to_string()
}

/// Parse a question sheet.
pub fn parse_question_sheet(content: &str) -> Vec<QuestionEntry> {
    blocks(&QUESTION_MARKER, content)
        .into_iter()
        .map(|(number, block)| {
            let topic_name = TOPIC_LINE
                .captures(block)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();
            let topic = Topic::from_display_name(&topic_name);
            if topic.is_none() && !topic_name.is_empty() {
                tracing::warn!("question {number}: unknown topic '{topic_name}'");
            }
            let text = strip_separators(&TOPIC_LINE.replace_all(block, ""));
            QuestionEntry {
                number,
                topic,
                topic_name,
                text,
            }
        })
        .collect()
}

/// Parse an answer sheet into answers in sheet order.
pub fn parse_answer_sheet(content: &str) -> Vec<String> {
    blocks(&ANSWER_MARKER, content)
        .into_iter()
        .map(|(_, block)| strip_separators(block))
        .collect()
}

fn banner(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(title.to_string());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(String::new());
}

fn closing_rule(lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(String::new());
}

/// Render questions in the question sheet format.
pub fn render_question_sheet(questions: &[QuestionEntry]) -> String {
    let mut lines = Vec::new();
    banner(&mut lines, "TEST - ARTIFICIAL INTELLIGENCE");
    for q in questions {
        lines.push(format!("Question {}:", q.number));
        if !q.topic_name.is_empty() {
            lines.push(format!("Topic: {}", q.topic_name));
        }
        lines.push(String::new());
        lines.push(q.text.clone());
        closing_rule(&mut lines);
    }
    lines.join("\n")
}

/// Render answers, numbered from 1, in the answer sheet format.
pub fn render_answer_sheet<S: AsRef<str>>(answers: &[S]) -> String {
    let mut lines = Vec::new();
    banner(&mut lines, "ANSWER KEY");
    for (i, answer) in answers.iter().enumerate() {
        lines.push(format!("Answer {}:", i + 1));
        lines.push(String::new());
        lines.push(answer.as_ref().to_string());
        closing_rule(&mut lines);
    }
    lines.join("\n")
}

/// Load a question sheet and, optionally, its answer sheet.
pub fn load_sheet_pair(
    questions_path: &Path,
    answers_path: Option<&Path>,
) -> Result<(Vec<QuestionEntry>, Vec<String>)> {
    let content = std::fs::read_to_string(questions_path).with_context(|| {
        format!("failed to read question sheet: {}", questions_path.display())
    })?;
    let questions = parse_question_sheet(&content);

    let answers = match answers_path {
        Some(path) => load_answer_sheet(path)?,
        None => Vec::new(),
    };

    tracing::debug!(
        questions = questions.len(),
        answers = answers.len(),
        "loaded {}",
        questions_path.display()
    );
    Ok((questions, answers))
}

/// Load an answer sheet from disk.
pub fn load_answer_sheet(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;
    Ok(parse_answer_sheet(&content))
}

/// A problem found when checking a question sheet against an answer key.
#[derive(Debug, Clone)]
pub struct SheetWarning {
    /// The question number (if applicable).
    pub question: Option<u32>,
    pub message: String,
}

/// Check a question sheet and answer key for common issues.
pub fn validate_sheets(questions: &[QuestionEntry], key: &[String]) -> Vec<SheetWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.number) {
            warnings.push(SheetWarning {
                question: Some(q.number),
                message: format!("duplicate question number: {}", q.number),
            });
        }
        if q.text.is_empty() {
            warnings.push(SheetWarning {
                question: Some(q.number),
                message: "question text is empty".into(),
            });
        }
        if q.topic.is_none() {
            warnings.push(SheetWarning {
                question: Some(q.number),
                message: if q.topic_name.is_empty() {
                    "no topic given; keyword scoring disabled".into()
                } else {
                    format!("unknown topic '{}'; keyword scoring disabled", q.topic_name)
                },
            });
        }
    }

    if questions.len() != key.len() {
        warnings.push(SheetWarning {
            question: None,
            message: format!(
                "{} questions but {} answers in the key",
                questions.len(),
                key.len()
            ),
        });
    }

    for (q, answer) in questions.iter().zip(key) {
        if is_blank(answer) {
            warnings.push(SheetWarning {
                question: Some(q.number),
                message: "reference answer is empty".into(),
            });
        }
    }

    warnings
}
