//! Bracket excision for extract text.
//!
//! Section bodies are littered with parenthesised asides (pronunciation
//! guides, dates, translations). This module strips them out while
//! leaving the surrounding whitespace untouched.

/// Remove every maximal top-level parenthesised span from `text`.
///
/// Matching ignores nesting: a span opens where the parenthesis depth
/// leaves zero and closes where it returns to zero, so inner balanced
/// parentheses are consumed as part of the enclosing span. When a space
/// precedes the opening parenthesis, the span widens one character to
/// the left to swallow that separator. Each recorded span is then
/// removed from the text at its first occurrence.
///
/// Empty input yields empty output; unbalanced spans whose depth never
/// returns to zero are left alone.
pub fn excise(text: &str) -> String {
    let mut depth: i64 = 0;
    let mut open: Option<usize> = None;
    let mut spans: Vec<String> = Vec::new();

    for (i, ch) in text.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                if open.is_none() {
                    open = Some(i);
                }
            }
            ')' => depth -= 1,
            _ => continue,
        }

        if depth == 0 {
            if let Some(start) = open.take() {
                spans.push(candidate(text, start, i));
            }
        }
    }

    let mut out = text.to_string();
    for span in &spans {
        if span.is_empty() {
            continue;
        }
        if let Some(pos) = out.find(span.as_str()) {
            out.replace_range(pos..pos + span.len(), "");
        }
    }
    out
}

/// The substring to remove for a span delimited by the bytes at
/// `start` and `end` (both parenthesis characters).
fn candidate(text: &str, start: usize, end: usize) -> String {
    if start == 0 {
        return text[start..=end].to_string();
    }

    let Some(prev) = text[..start].chars().next_back() else {
        return text[start..=end].to_string();
    };

    let widened = &text[start - prev.len_utf8()..=end];
    if prev == ' ' {
        widened.to_string()
    } else {
        // No separating space: the recorded span collapses to the
        // widened substring's second character, the opening parenthesis
        // itself, so only that parenthesis gets removed.
        widened.chars().nth(1).map(String::from).unwrap_or_default()
    }
}
