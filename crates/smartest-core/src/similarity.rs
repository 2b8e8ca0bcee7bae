//! String similarity metrics, all on a 0–100 scale.
//!
//! `ratio` is the normalized Indel similarity `2·LCS / (|a| + |b|)` over
//! characters. The token variants reorder or deduplicate whitespace tokens
//! before comparing so that word order and repeated words matter less.

use std::collections::BTreeSet;

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Characters of each side that [`ratio`] compares; the rest is ignored.
///
/// Keeps one comparison within a fixed number of steps however long an
/// answer gets.
pub const MAX_COMPARED_CHARS: usize = 2_000;

/// Character-level similarity. Two empty strings are identical.
///
/// Only the first [`MAX_COMPARED_CHARS`] characters of each side count.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().take(MAX_COMPARED_CHARS).collect();
    let b: Vec<char> = b.chars().take(MAX_COMPARED_CHARS).collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity after sorting whitespace tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Similarity over token sets.
///
/// Returns 100 when the token set of one string contains the other's.
/// Otherwise compares the shared tokens against each side's full set.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |set: Vec<&str>| set.join(" ");
    let common = join(left.intersection(&right).copied().collect());
    let only_left = join(left.difference(&right).copied().collect());
    let only_right = join(right.difference(&left).copied().collect());

    if !common.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let with = |rest: &str| {
        if common.is_empty() {
            rest.to_string()
        } else {
            format!("{common} {rest}")
        }
    };
    let combined_left = with(&only_left);
    let combined_right = with(&only_right);

    let mut best = ratio(&combined_left, &combined_right);
    if !common.is_empty() {
        best = best
            .max(ratio(&common, &combined_left))
            .max(ratio(&common, &combined_right));
    }
    best
}

/// Whole-text similarity used by every scoring rule.
///
/// The best of plain, token-sorted and token-set similarity, so both typos
/// and reordered or padded phrasing are tolerated.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return if a.trim() == b.trim() { 100.0 } else { 0.0 };
    }
    ratio(a, b)
        .max(token_sort_ratio(a, b))
        .max(token_set_ratio(a, b))
}

/// Order-tolerant similarity for list spans.
///
/// Splits both spans into element tokens (numbers, words, dotted or hyphenated
/// identifiers), sorts them, and compares the sorted sequences, so a
/// permutation scores as identical while a missing element does not.
pub fn sorted_sequence_similarity(a: &str, b: &str) -> f64 {
    ratio(&element_tokens(a), &element_tokens(b))
}

fn element_tokens(span: &str) -> String {
    let mut tokens: Vec<&str> = span
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '-')))
        .filter(|t| !t.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best similarity of `keyword` against any single word or same-length word
/// window of `text`, on a 0–1 scale.
pub fn best_window_similarity(keyword: &str, text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut best = 0.0f64;

    for word in &words {
        best = best.max(ratio(keyword, word));
    }

    let window = keyword.split_whitespace().count();
    if window > 1 && words.len() >= window {
        for phrase in words.windows(window) {
            best = best.max(ratio(keyword, &phrase.join(" ")));
        }
    }

    best / 100.0
}
