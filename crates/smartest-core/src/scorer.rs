//! The answer scorer.
//!
//! [`Scorer::evaluate`] normalizes both answers, classifies the reference,
//! and applies the rule for that shape. Each rule blends a key-element score
//! (exact or near-exact match on the part of the answer that matters) with a
//! whole-text similarity score, using the weights in [`ScoringConfig`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classify::{classify, AnswerShape};
use crate::config::ScoringConfig;
use crate::error::{EvalError, EvalResult};
use crate::extract::{
    extract_keywords, extract_standalone_number, extract_structured_data, extract_yes_no,
    numbers_match, StructuredKind,
};
use crate::feedback::{build_feedback, EMPTY_ANSWER};
use crate::normalize::normalize;
use crate::similarity::{best_window_similarity, sorted_sequence_similarity, text_similarity};

/// A reference keyword the candidate misspelled closely enough to notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialMatch {
    pub keyword: String,
    /// Best 0–1 similarity against any word window of the candidate.
    pub similarity: f64,
}

/// The outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Final score, always in `0..=100`.
    pub score: u8,
    /// Shape of the reference answer, which picked the scoring rule.
    pub shape: AnswerShape,
    /// Reference keywords also present in the candidate.
    pub matched_keywords: BTreeSet<String>,
    /// Reference keywords absent from the candidate.
    pub missing_keywords: BTreeSet<String>,
    /// Keywords the candidate uses that the reference does not.
    pub unexpected_keywords: BTreeSet<String>,
    /// Missing keywords with a close misspelling in the candidate. Diagnostic only.
    pub partial_matches: Vec<PartialMatch>,
    /// Named sub-scores that went into the final blend.
    pub components: BTreeMap<String, f64>,
    pub feedback: Vec<String>,
}

impl ScoreReport {
    fn empty(shape: AnswerShape) -> Self {
        Self {
            score: 0,
            shape,
            matched_keywords: BTreeSet::new(),
            missing_keywords: BTreeSet::new(),
            unexpected_keywords: BTreeSet::new(),
            partial_matches: Vec::new(),
            components: BTreeMap::new(),
            feedback: Vec::new(),
        }
    }

    /// Returns true if the score reaches `threshold`.
    pub fn passed(&self, threshold: u8) -> bool {
        self.score >= threshold
    }
}

/// Scores candidate answers against reference answers.
///
/// Holds only its configuration; evaluation takes `&self` and a scorer can be
/// shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `candidate` against `reference`.
    ///
    /// `keywords` only affect textual references. Fails only when the
    /// reference is blank; any candidate, however malformed, gets a score.
    pub fn evaluate(
        &self,
        reference: &str,
        candidate: &str,
        keywords: Option<&[String]>,
    ) -> EvalResult<ScoreReport> {
        let reference = normalize(reference);
        if reference.is_empty() {
            return Err(EvalError::InvalidInput(
                "reference answer is empty".to_string(),
            ));
        }
        let candidate = normalize(candidate);
        let shape = classify(&reference);
        let keywords = keywords.filter(|k| !k.is_empty());

        let mut report = ScoreReport::empty(shape);

        if candidate.is_empty() {
            if let (AnswerShape::Textual, Some(keywords)) = (shape, keywords) {
                report.missing_keywords = extract_keywords(&reference, keywords);
            }
            report.feedback.push(EMPTY_ANSWER.to_string());
            tracing::debug!(%shape, "empty candidate answer");
            return Ok(report);
        }

        let text = text_similarity(&reference, &candidate);
        report.components.insert("text".into(), text);

        let raw = match shape {
            AnswerShape::YesNoWithNumber => self.score_yes_no(&reference, &candidate, text, &mut report),
            AnswerShape::Structured(kind) => {
                self.score_structured(kind, &reference, &candidate, text, &mut report)
            }
            AnswerShape::Numeric => self.score_numeric(&reference, &candidate, text, &mut report),
            AnswerShape::Textual => match keywords {
                Some(keywords) => {
                    self.score_keywords(keywords, &reference, &candidate, text, &mut report)
                }
                None => text,
            },
        };

        report.score = to_score(raw);
        report.feedback = build_feedback(&report, &self.config.feedback);

        tracing::debug!(
            %shape,
            score = report.score,
            components = ?report.components,
            "evaluated answer"
        );
        Ok(report)
    }

    fn score_yes_no(
        &self,
        reference: &str,
        candidate: &str,
        text: f64,
        report: &mut ScoreReport,
    ) -> f64 {
        let w = &self.config.yes_no;

        let expected = extract_yes_no(reference);
        let given = extract_yes_no(candidate);
        let yes_no = if given.is_some() && given == expected {
            100.0
        } else {
            0.0
        };

        let number = match (
            extract_standalone_number(reference),
            extract_standalone_number(candidate),
        ) {
            (Some(expected), Some(given)) if numbers_match(&expected, &given) => 100.0,
            (_, Some(_)) => w.number_mismatch_credit,
            (_, None) => 0.0,
        };

        report.components.insert("yes_no".into(), yes_no);
        report.components.insert("number".into(), number);
        w.yes_no * yes_no + w.number * number + w.text * text
    }

    fn score_structured(
        &self,
        kind: StructuredKind,
        reference: &str,
        candidate: &str,
        text: f64,
        report: &mut ScoreReport,
    ) -> f64 {
        let w = &self.config.structured;

        let expected = extract_structured_data(reference);
        let given = extract_structured_data(candidate);

        let key = match (kind, expected, given) {
            (StructuredKind::Tuple, Some(expected), Some(given)) => {
                let expected = canonical_span(&expected.raw);
                if !expected.is_empty() && expected == canonical_span(&given.raw) {
                    100.0
                } else {
                    w.tuple_mismatch_score
                }
            }
            (StructuredKind::Tuple, _, _) => w.tuple_mismatch_score,
            (StructuredKind::List, Some(expected), Some(given)) => {
                sorted_sequence_similarity(&expected.raw, &given.raw)
            }
            (StructuredKind::List, _, _) => 0.0,
        };

        report.components.insert("key_element".into(), key);
        w.blend.key_element * key + w.blend.text * text
    }

    fn score_numeric(
        &self,
        reference: &str,
        candidate: &str,
        text: f64,
        report: &mut ScoreReport,
    ) -> f64 {
        let w = &self.config.numeric;

        let key = match (
            extract_standalone_number(reference),
            extract_standalone_number(candidate),
        ) {
            (Some(expected), Some(given)) if numbers_match(&expected, &given) => 100.0,
            _ => 0.0,
        };

        report.components.insert("key_element".into(), key);
        w.key_element * key + w.text * text
    }

    fn score_keywords(
        &self,
        keywords: &[String],
        reference: &str,
        candidate: &str,
        text: f64,
        report: &mut ScoreReport,
    ) -> f64 {
        let w = &self.config.keywords;

        let expected = extract_keywords(reference, keywords);
        let used = extract_keywords(candidate, keywords);

        report.unexpected_keywords = used.difference(&expected).cloned().collect();

        // Nothing to look for: fall back to plain text similarity.
        if expected.is_empty() {
            return text;
        }

        report.matched_keywords = expected.intersection(&used).cloned().collect();
        report.missing_keywords = expected.difference(&used).cloned().collect();

        let total = expected.len() as f64;
        let match_score = report.matched_keywords.len() as f64 / total * 100.0;
        let miss_penalty = report.missing_keywords.len() as f64 / total * w.miss_weight;
        let wrong_penalty =
            (report.unexpected_keywords.len() as f64 * w.wrong_weight_each).min(w.wrong_weight_cap);
        let keyword = (match_score - miss_penalty - wrong_penalty).clamp(0.0, 100.0);

        let threshold = self.config.feedback.fuzzy_threshold;
        report.partial_matches = report
            .missing_keywords
            .iter()
            .filter_map(|k| {
                let similarity = best_window_similarity(k, candidate);
                (similarity >= threshold && similarity < 1.0).then(|| PartialMatch {
                    keyword: k.clone(),
                    similarity,
                })
            })
            .collect();

        report.components.insert("keyword".into(), keyword);
        report.components.insert("keyword_match".into(), match_score);
        report.components.insert("miss_penalty".into(), miss_penalty);
        report.components.insert("wrong_penalty".into(), wrong_penalty);
        w.keyword * keyword + w.text * text
    }
}

/// Span content with every non-word character removed.
fn canonical_span(span: &str) -> String {
    span.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Clamp to `0..=100` and truncate.
fn to_score(raw: f64) -> u8 {
    // Absorb float noise so a blend that sums to exactly 100 stays 100.
    (raw + 1e-9).clamp(0.0, 100.0) as u8
}

/// Score with the default configuration.
pub fn evaluate(
    reference: &str,
    candidate: &str,
    keywords: Option<&[String]>,
) -> EvalResult<ScoreReport> {
    Scorer::default().evaluate(reference, candidate, keywords)
}
