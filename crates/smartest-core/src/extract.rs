//! Structural extractors over normalized answer text.
//!
//! Every extractor is total: it returns a value or an empty result and never
//! fails, whatever the input looks like. Callers are expected to pass text
//! that has already gone through [`crate::normalize::normalize`].

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

// ---------------------------------------------------------------------------
// Structured spans
// ---------------------------------------------------------------------------

/// Whether a structured span was delimited by brackets or parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredKind {
    /// `[...]`: compared without regard to element order.
    List,
    /// `(...)`: compared element by element, order included.
    Tuple,
}

/// A bracket- or parenthesis-delimited span found in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredValue {
    /// The span including its delimiters.
    pub raw: String,
    pub kind: StructuredKind,
}

/// One level of nesting: a list may contain tuples, a tuple may contain
/// anything but parentheses.
static STRUCTURED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]|\([^()]*\)").expect("valid span regex"));

/// Find the most information-bearing structured span in `text`.
///
/// Spans containing a comma beat comma-less ones; among equals the longest
/// wins, and the earliest among equally long spans.
pub fn extract_structured_data(text: &str) -> Option<StructuredValue> {
    let mut best: Option<(bool, usize, &str)> = None;

    for m in STRUCTURED_SPAN.find_iter(text) {
        let span = m.as_str();
        let rank = (span.contains(','), span.chars().count());
        let better = match best {
            Some((comma, len, _)) => rank > (comma, len),
            None => true,
        };
        if better {
            best = Some((rank.0, rank.1, span));
        }
    }

    best.map(|(_, _, span)| StructuredValue {
        raw: span.to_string(),
        kind: if span.starts_with('(') {
            StructuredKind::Tuple
        } else {
            StructuredKind::List
        },
    })
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// A number glued to a name, e.g. the 8 in `8-queens` or the 3 in `ac-3`.
static NUMBERED_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d+-[a-z]\w*|[a-z]\w*-\d+\w*)").expect("valid identifier regex")
});

/// A hyphen right after a word character joins words; it is never a sign.
static JOINING_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w)-").expect("valid hyphen regex"));

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\b\d+(?:\.\d+)?\b").expect("valid number regex"));

const NUMBER: &str = r"(-?\d+(?:\.\d+)?)";

/// Phrases in which a number is the point of the sentence.
static NUMERIC_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:there\s+(?:are|is)|exista|sunt|avem)\s+(?:exactly\s+|exact\s+)?-?\d+",
        r"-?\d+(?:\.\d+)?\s+(?:de\s+)?(?:solutions?|solutii|moves?|mutari|colou?rs?|culori|ways?|moduri|steps?|pasi)\b",
        r"\b(?:answer|raspunsul|result|rezultatul)\s+(?:is|este)\s*:?\s*-?\d+",
        r"\b(?:exactly|exact|minimum|minim|requires|necesita|needs?)\s+-?\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid numeric phrase regex"))
    .collect()
});

/// Contextual number patterns in priority order; group 1 is the number.
static NUMBER_CONTEXTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\b(?:minimum|minim|requires|necesita|needs|need|trebuie)\s*:?\s*(?:de\s+)?{NUMBER}"),
        format!(r"\b(?:exactly|exact)\s+{NUMBER}"),
        format!(
            r"\b(?:answer|raspunsul|raspuns|result|rezultatul|rezultat|value|valoarea)\s*(?:is|este|=)?\s*:?\s*{NUMBER}"
        ),
        format!(r"\b(?:number|numarul|count|nr)\b[^.\d]{{0,40}}?(?:\bis|\beste|=|:)\s*{NUMBER}"),
        format!(r"(?:\b(?:is|are|este|sunt)\s+|:\s*){NUMBER}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid number context regex"))
    .collect()
});

/// Text with structured spans and numbered identifiers blanked out, and
/// joining hyphens split so a leading `-` only survives as a sign.
fn strip_noise(text: &str) -> String {
    let without_spans = STRUCTURED_SPAN.replace_all(text, " ");
    let without_ids = NUMBERED_IDENTIFIER.replace_all(&without_spans, " ");
    let unjoined = JOINING_HYPHEN.replace_all(&without_ids, "$1 ");
    unjoined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `true` when a number is the dominant content of `text`.
///
/// Either the text is at most three tokens and holds a number, or it matches
/// one of the "there are N", "N solutions", "answer is N", "minimum N"
/// phrases. Numbers that are part of a name (`8-queens`, `ac-3`) do not count.
pub fn is_primarily_numeric(text: &str) -> bool {
    let remaining = strip_noise(text);
    if !BARE_NUMBER.is_match(&remaining) {
        return false;
    }
    if remaining.split_whitespace().count() <= 3 {
        return true;
    }
    NUMERIC_PHRASES.iter().any(|p| p.is_match(&remaining))
}

/// Extract the number an answer is about.
///
/// Tries the contextual patterns in priority order, then falls back to the
/// first signed integer or decimal left after removing structured spans and
/// numbered identifiers.
pub fn extract_standalone_number(text: &str) -> Option<String> {
    let remaining = strip_noise(text);

    NUMBER_CONTEXTS
        .iter()
        .find_map(|p| p.captures(&remaining).map(|c| c[1].to_string()))
        .or_else(|| BARE_NUMBER.find(&remaining).map(|m| m.as_str().to_string()))
}

/// Compare two extracted numbers by value, falling back to text equality.
pub fn numbers_match(a: &str, b: &str) -> bool {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => (x - y).abs() < 1e-9,
        _ => a == b,
    }
}

// ---------------------------------------------------------------------------
// Yes / No
// ---------------------------------------------------------------------------

/// A yes/no judgment found in an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

static NEGATIVE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:no|nu|false|fals|negative|negativ)\b").expect("valid negative regex")
});

static POSITIVE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:yes|da|true|adevarat|positive|pozitiv|afirmativ)\b")
        .expect("valid positive regex")
});

/// Find a yes/no judgment. Negative markers are checked first.
pub fn extract_yes_no(text: &str) -> Option<YesNo> {
    if NEGATIVE_MARKERS.is_match(text) {
        Some(YesNo::No)
    } else if POSITIVE_MARKERS.is_match(text) {
        Some(YesNo::Yes)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Build a whole-word, whitespace-flexible pattern for a normalized keyword.
///
/// Word boundaries are only asserted next to word characters, so keywords
/// such as `c++` still match.
fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    if body.is_empty() {
        return None;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let prefix = if keyword.chars().next().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };
    let suffix = if keyword.chars().last().is_some_and(is_word) {
        r"\b"
    } else {
        ""
    };

    match Regex::new(&format!("{prefix}{body}{suffix}")) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("unusable keyword pattern for {keyword:?}: {e}");
            None
        }
    }
}

/// Return the normalized form of every keyword present in `text`.
pub fn extract_keywords<S: AsRef<str>>(text: &str, keywords: &[S]) -> BTreeSet<String> {
    keywords
        .iter()
        .map(|k| normalize(k.as_ref()))
        .filter(|k| keyword_pattern(k).is_some_and(|re| re.is_match(text)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_prefers_comma_spans() {
        let v = extract_structured_data("solutia (unica) este [0, 4, 7, 5]").unwrap();
        assert_eq!(v.raw, "[0, 4, 7, 5]");
        assert_eq!(v.kind, StructuredKind::List);
    }

    #[test]
    fn structured_prefers_longest_among_equals() {
        let v = extract_structured_data("(a, b) sau (a, b, c)").unwrap();
        assert_eq!(v.raw, "(a, b, c)");
        assert_eq!(v.kind, StructuredKind::Tuple);
    }

    #[test]
    fn structured_list_of_tuples() {
        let v = extract_structured_data("mutari: [(0,1), (1,2)]").unwrap();
        assert_eq!(v.raw, "[(0,1), (1,2)]");
        assert_eq!(v.kind, StructuredKind::List);
    }

    #[test]
    fn structured_absent() {
        assert!(extract_structured_data("nimic aici").is_none());
        assert!(extract_structured_data("unbalanced ( here").is_none());
    }

    #[test]
    fn numeric_short_text() {
        assert!(is_primarily_numeric("92"));
        assert!(is_primarily_numeric("92 solutii"));
        assert!(!is_primarily_numeric("backtracking"));
    }

    #[test]
    fn numeric_phrases() {
        assert!(is_primarily_numeric("there are 92 solutions for this board"));
        assert!(is_primarily_numeric("problema are in total 92 de solutii distincte"));
        assert!(is_primarily_numeric("the answer is 42 after simplification"));
        assert!(is_primarily_numeric("graful necesita minim 4 culori pentru colorare"));
    }

    #[test]
    fn numbered_identifier_alone_is_not_numeric() {
        assert!(!is_primarily_numeric("8-queens"));
        assert!(!is_primarily_numeric("strategia pentru problema 8-queens este backtracking"));
        assert!(is_primarily_numeric("problema 8-queens are 92 solutii"));
    }

    #[test]
    fn letter_led_identifier_is_not_numeric() {
        assert!(!is_primarily_numeric("backtracking cu ac-3"));
        assert!(!is_primarily_numeric("ac-3"));
        assert!(!is_primarily_numeric("recurenta pe n-1 discuri"));
        assert_eq!(extract_standalone_number("backtracking cu ac-3"), None);
        assert_eq!(extract_standalone_number("da, folosim ac-3"), None);
        assert_eq!(
            extract_standalone_number("ac-3 reduce domeniile la 2 valori").as_deref(),
            Some("2")
        );
    }

    #[test]
    fn hyphen_after_word_is_not_a_sign() {
        assert_eq!(extract_standalone_number("intre 3-4 mutari").as_deref(), Some("3"));
        assert_eq!(extract_standalone_number("valoarea este -3").as_deref(), Some("-3"));
        assert_eq!(extract_standalone_number("x = -2.5").as_deref(), Some("-2.5"));
    }

    #[test]
    fn standalone_number_context_priority() {
        assert_eq!(
            extract_standalone_number("necesita minim 4 culori").as_deref(),
            Some("4")
        );
        assert_eq!(
            extract_standalone_number("raspunsul este 42").as_deref(),
            Some("42")
        );
        assert_eq!(
            extract_standalone_number("numarul cromatic este 3").as_deref(),
            Some("3")
        );
        assert_eq!(
            extract_standalone_number("there are 92 solutions").as_deref(),
            Some("92")
        );
    }

    #[test]
    fn standalone_number_fallback_skips_identifiers_and_spans() {
        assert_eq!(
            extract_standalone_number("the 8-queens problem has 92 solutions").as_deref(),
            Some("92")
        );
        assert_eq!(
            extract_standalone_number("[1, 2, 3] apoi 7").as_deref(),
            Some("7")
        );
        assert_eq!(extract_standalone_number("-3.5").as_deref(), Some("-3.5"));
        assert_eq!(extract_standalone_number("fara numere"), None);
    }

    #[test]
    fn number_comparison() {
        assert!(numbers_match("4", "4.0"));
        assert!(!numbers_match("92", "90"));
    }

    #[test]
    fn yes_no_negative_first() {
        assert_eq!(extract_yes_no("nu. necesita minim 4 culori"), Some(YesNo::No));
        assert_eq!(extract_yes_no("da, sau nu"), Some(YesNo::No));
        assert_eq!(extract_yes_no("yes, 4 colors"), Some(YesNo::Yes));
        assert_eq!(extract_yes_no("true"), Some(YesNo::Yes));
        assert_eq!(extract_yes_no("numarul este 3"), None);
        assert_eq!(extract_yes_no("dar nota"), None);
    }

    #[test]
    fn keywords_whole_word_and_flexible_space() {
        let kws = ["Backtracking", "forward checking", "FC", "csp"];
        let found = extract_keywords("backtracking cu fc", &kws);
        assert!(found.contains("backtracking"));
        assert!(found.contains("fc"));
        assert!(!found.contains("csp"));
        // "forward checking" normalizes to "fc" and collapses into one entry
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn keywords_reject_embedded_substrings() {
        let found = extract_keywords("cspx and abacktracking", &["csp", "backtracking"]);
        assert!(found.is_empty());
    }

    #[test]
    fn keywords_with_symbols() {
        let found = extract_keywords("folosim c++ si n-queens", &["c++", "n-queens"]);
        assert_eq!(found.len(), 2);
    }
}
