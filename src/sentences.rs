//! Sentence segmentation for truncated display text.
//!
//! Splitting is deliberately shallow: terminal punctuation followed by
//! whitespace ends a sentence. It only serves summary and section
//! truncation and is never used for structural parsing, so
//! abbreviation-aware segmentation is not worth carrying here.

use std::sync::LazyLock;

use regex::Regex;

/// A sentence boundary: terminal punctuation, optional closing quotes
/// or brackets, then whitespace.
static BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?]+["')\]]*\s+"#).unwrap());

/// Split text into sentences, preserving document order.
pub fn split(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut start = 0;
    for m in BOUNDARY_RE.find_iter(text) {
        let sentence = text[start..m.end()].trim_end();
        if !sentence.is_empty() {
            out.push(sentence.to_string());
        }
        start = m.end();
    }
    if start < text.len() {
        out.push(text[start..].trim_end().to_string());
    }
    out
}

/// First `n` sentences of `text`, joined by single spaces.
pub fn first_sentences(text: &str, n: usize) -> String {
    split(text)
        .into_iter()
        .take(n)
        .collect::<Vec<_>>()
        .join(" ")
}
