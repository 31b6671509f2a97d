//! Heading scanner for flat page extracts.
//!
//! An extract arrives as one text blob with inline heading delimiters:
//! a blank line, a run of `=` characters, the title, and a closing run
//! of the same length. The scanner only locates those delimiters; it
//! knows nothing about section semantics or nesting.

use std::sync::LazyLock;

use regex::Regex;

/// Delimiter grammar: blank line, optional indent, an `=` run of two or
/// more, the title, a closing `=` run, optional trailing spaces, newline.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n *(={2,}) (.*?) (={2,}) *\n").unwrap());

/// A single recognized heading delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Length of the `=` marker run.
    pub marker_len: usize,
    /// Heading title with surrounding whitespace stripped.
    pub title: String,
    /// Byte offset where the whole delimiter begins (the leading
    /// newline pair), usable as a split point.
    pub start: usize,
    /// Byte offset one past the delimiter's trailing newline.
    pub end: usize,
}

/// Scan an extract for heading delimiters, in document order.
///
/// Matches are non-overlapping. Delimiters whose opening and closing
/// runs differ in length are not headings at all; the span stays in
/// place and is later read as plain body text.
pub fn scan(extract: &str) -> Vec<HeadingMatch> {
    HEADING_RE
        .captures_iter(extract)
        .filter_map(|caps| {
            let open = caps.get(1)?.as_str();
            let close = caps.get(3)?.as_str();
            if open.len() != close.len() {
                return None;
            }

            let whole = caps.get(0)?;
            Some(HeadingMatch {
                marker_len: open.len(),
                title: caps.get(2)?.as_str().trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_single_heading() {
        let extract = "Intro.\n\n== Alpha ==\nBody A.";
        let matches = scan(extract);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Alpha");
        assert_eq!(matches[0].marker_len, 2);
        assert_eq!(matches[0].start, 6);
        assert_eq!(&extract[matches[0].end..], "Body A.");
    }

    #[test]
    fn test_scan_orders_matches() {
        let extract = "S.\n\n== A ==\nx\n\n=== B ===\ny\n\n== C ==\nz";
        let found: Vec<_> = scan(extract)
            .into_iter()
            .map(|m| (m.marker_len, m.title))
            .collect();
        assert_eq!(
            found,
            vec![
                (2, "A".to_string()),
                (3, "B".to_string()),
                (2, "C".to_string())
            ]
        );
    }

    #[test]
    fn test_scan_mismatched_markers_skipped() {
        let extract = "S.\n\n== Odd ===\nbody\n\n== Even ==\nrest";
        let matches = scan(extract);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Even");
    }

    #[test]
    fn test_scan_requires_blank_line() {
        // A heading without a preceding blank line is body text.
        assert!(scan("Intro.\n== Alpha ==\nBody").is_empty());
    }

    #[test]
    fn test_scan_allows_indent_and_trailing_spaces() {
        let extract = "S.\n\n  == Alpha ==  \nbody";
        let matches = scan(extract);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Alpha");
    }

    #[test]
    fn test_scan_single_equals_not_heading() {
        assert!(scan("S.\n\n= Title =\nbody").is_empty());
    }

    #[test]
    fn test_scan_empty() {
        assert!(scan("").is_empty());
    }
}
