//! Study text cleanup and fact identity

use regex::Regex;
use std::sync::LazyLock;

// Patterns are literals; compilation cannot fail
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*\d+\s*\]").expect("citation pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static TRAILING_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\.\s*$").expect("trailing period pattern is valid"));

/// Strip numeric citation markers like `[12]`, replace NBSP with a space,
/// collapse whitespace runs and trim
pub fn normalize_text(text: &str) -> String {
    // Removing a marker can expose another one (`[1[2]]`)
    let mut without_citations = CITATION.replace_all(text, "").into_owned();
    while CITATION.is_match(&without_citations) {
        without_citations = CITATION.replace_all(&without_citations, "").into_owned();
    }
    let without_nbsp = without_citations.replace('\u{a0}', " ");
    WHITESPACE
        .replace_all(&without_nbsp, " ")
        .trim()
        .to_string()
}

/// Number of whitespace-separated words after normalization
pub fn word_count(text: &str) -> usize {
    normalize_text(text).split_whitespace().count()
}

/// Dedup identity of a fact: normalized, lower-cased, trailing period removed
pub fn fact_key(text: &str) -> String {
    let lowered = normalize_text(text).to_lowercase();
    TRAILING_PERIOD.replace(&lowered, "").into_owned()
}
