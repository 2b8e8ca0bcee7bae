//! Text normalization applied to every answer and keyword before comparison.
//!
//! Reference and candidate answers arrive in Romanian or English, with or
//! without diacritics, in any casing. Normalization folds all of that away
//! and rewrites a small table of domain synonyms to one canonical form so the
//! extractors only ever see a single spelling.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Domain synonyms, matched as whole words on already-folded text.
///
/// Replacements must never appear as a key, otherwise normalization would
/// stop being idempotent.
const SYNONYMS: &[(&str, &str)] = &[
    // Directions used in game-theory answers, e.g. "(Jos, Stânga)".
    ("sus", "u"),
    ("jos", "d"),
    ("stanga", "l"),
    ("dreapta", "r"),
    ("up", "u"),
    ("down", "d"),
    ("left", "l"),
    ("right", "r"),
    // Course abbreviations.
    ("forward checking", "fc"),
    ("minimum remaining values", "mrv"),
    ("arc consistency", "ac-3"),
    ("ac3", "ac-3"),
    ("alpha-beta", "alfa-beta"),
    ("alpha beta", "alfa-beta"),
    ("alfa beta", "alfa-beta"),
];

static SYNONYM_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SYNONYMS.iter().copied().collect());

static SYNONYM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Longest alternatives first so "alpha beta" wins over a shorter prefix.
    let mut keys: Vec<&str> = SYNONYMS.iter().map(|(k, _)| *k).collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("synonym table builds a valid regex")
});

/// Normalize a string for comparison.
///
/// Applies, in order:
/// 1. Unicode NFD decomposition with combining marks removed
///    (`ă`, `â`, `î`, `ș`, `ț` become `a`, `a`, `i`, `s`, `t`)
/// 2. Lowercasing plus ligature expansion (`ß` -> `ss`, `æ` -> `ae`, `œ` -> `oe`)
/// 3. Whitespace trimmed and internal runs collapsed to one space
/// 4. Whole-word synonym substitution (`stanga` -> `l`, `forward checking` -> `fc`)
///
/// Stripping marks before collapsing whitespace keeps the function
/// idempotent: a lone combining mark between two spaces cannot leave a
/// double space behind.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe");

    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    SYNONYM_PATTERN
        .replace_all(&collapsed, |caps: &regex::Captures<'_>| {
            let word = &caps[0];
            SYNONYM_MAP.get(word).copied().unwrap_or(word).to_string()
        })
        .into_owned()
}

/// Returns `true` if the text is empty once normalized.
pub fn is_blank(text: &str) -> bool {
    normalize(text).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace() {
        assert_eq!(normalize("  Hello   World \n"), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn romanian_diacritics() {
        assert_eq!(normalize("Necesită minim"), "necesita minim");
        assert_eq!(normalize("Există soluții"), "exista solutii");
        assert_eq!(normalize("ÎNCÂT ȘI ŢARĂ"), "incat si tara");
    }

    #[test]
    fn ligatures() {
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("cœur"), "coeur");
    }

    #[test]
    fn direction_words_collapse() {
        assert_eq!(normalize("(Jos, Stânga)"), "(d, l)");
        assert_eq!(normalize("(Down, Left)"), "(d, l)");
        assert_eq!(normalize("Sus Dreapta"), "u r");
    }

    #[test]
    fn synonyms_match_whole_words_only() {
        // "jos" inside another word must survive untouched.
        assert_eq!(normalize("josephine"), "josephine");
        assert_eq!(normalize("upward"), "upward");
        assert_eq!(normalize("bright"), "bright");
    }

    #[test]
    fn abbreviations_collapse() {
        assert_eq!(
            normalize("Backtracking cu Forward Checking"),
            "backtracking cu fc"
        );
        assert_eq!(normalize("Alpha-Beta pruning"), "alfa-beta pruning");
        assert_eq!(normalize("AC3"), "ac-3");
        assert_eq!(normalize("Minimum   Remaining Values"), "mrv");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Nu. Graful necesită minim 4 culori (numărul cromatic).",
            "Da, există un echilibru Nash pur. Acesta este (Jos, Stânga).",
            "[0, 4, 7, 5, 2, 6, 1, 3]",
            "Backtracking + MRV + AC-3 with forward   checking",
            "a \u{0301} b",
            "İstanbul Straße",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
        assert!(is_blank(" \u{0301} \u{0308}"));
    }
}
