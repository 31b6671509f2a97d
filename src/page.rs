//! Page entity with a lazily populated attribute cache.
//!
//! A [`WikiPage`] starts out knowing only its title. The first accessor
//! that needs remote data triggers the governing fetch call, parses the
//! extract into a section tree, and caches the result for the page's
//! lifetime, so later reads never hit the network again. A failed fetch
//! marks nothing and the next access retries.
//!
//! A page is exclusively owned by its creator and is not meant for
//! concurrent mutation; accessors take `&mut self`.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::client::{PAGE_MISSING, PageSource};
use crate::error::{Result, WikiError};
use crate::headings;
use crate::sections::{Section, SectionTree, build_section_tree};
use crate::sentences;

/// Remote calls that populate page attributes, tracked for memoization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchCall {
    /// Populates the page id, the summary, and the section tree.
    Extracts,
}

/// Per-call fetch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    Unfetched,
    Fetched,
}

/// Rendered content of one section: its body plus the bodies of its
/// direct subsections. Subsections are expanded one level deep; deeper
/// descendants are reachable through their own titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionContent {
    /// Section title (echoed back even for unknown titles).
    pub title: String,
    /// Section body, possibly sentence-truncated.
    pub text: String,
    /// Direct subsections in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<SectionContent>,
}

/// One remote page: a title plus attributes populated on first access.
#[derive(Debug)]
pub struct WikiPage<'w, S: PageSource> {
    source: &'w S,
    title: String,
    page_id: Option<i64>,
    tree: SectionTree,
    called: HashMap<FetchCall, FetchState>,
}

impl<'w, S: PageSource> WikiPage<'w, S> {
    /// Create a page handle. Nothing is fetched until an accessor
    /// needs remote data.
    pub fn new(source: &'w S, title: impl Into<String>) -> Self {
        Self {
            source,
            title: title.into(),
            page_id: None,
            tree: SectionTree::default(),
            called: HashMap::new(),
        }
    }

    /// Fetch-and-verify constructor: errors when the page does not
    /// exist on the remote side.
    pub fn open(source: &'w S, title: impl Into<String>) -> Result<Self> {
        let mut page = Self::new(source, title);
        if !page.exists()? {
            return Err(WikiError::PageNotFound(page.title));
        }
        Ok(page)
    }

    /// Page title (identity key, never fetched).
    pub fn title(&self) -> &str {
        &self.title
    }

    fn state(&self, call: FetchCall) -> FetchState {
        self.called
            .get(&call)
            .copied()
            .unwrap_or(FetchState::Unfetched)
    }

    /// Run `call` unless it already completed. The call is marked done
    /// only after success, so a transport failure leaves the page
    /// unfetched and the next access retries.
    fn ensure(&mut self, call: FetchCall) -> Result<()> {
        if self.state(call) == FetchState::Fetched {
            return Ok(());
        }

        match call {
            FetchCall::Extracts => self.fetch_extracts()?,
        }

        self.called.insert(call, FetchState::Fetched);
        Ok(())
    }

    fn fetch_extracts(&mut self) -> Result<()> {
        debug!(title = %self.title, "fetching extract");
        let fetched = self.source.fetch_extract(&self.title)?;
        self.page_id = Some(fetched.page_id);

        if fetched.page_id == PAGE_MISSING {
            return Ok(());
        }

        let matches = headings::scan(&fetched.extract);
        self.tree = build_section_tree(&fetched.extract, &matches);
        debug!(
            title = %self.title,
            sections = self.tree.count(),
            "parsed extract"
        );
        Ok(())
    }

    /// Remote page id; [`PAGE_MISSING`] when the page does not exist.
    pub fn page_id(&mut self) -> Result<i64> {
        self.ensure(FetchCall::Extracts)?;
        Ok(self.page_id.unwrap_or(PAGE_MISSING))
    }

    /// Whether the remote page exists. Triggers a fetch on first use.
    pub fn exists(&mut self) -> Result<bool> {
        Ok(self.page_id()? != PAGE_MISSING)
    }

    /// Page summary: the text preceding the first heading, truncated to
    /// at most `max_sentences` sentences when given.
    pub fn summary(&mut self, max_sentences: Option<usize>) -> Result<String> {
        self.ensure(FetchCall::Extracts)?;
        Ok(match max_sentences {
            Some(n) => sentences::first_sentences(&self.tree.summary, n),
            None => self.tree.summary.clone(),
        })
    }

    /// The parsed top-level sections, in document order.
    pub fn sections(&mut self) -> Result<&[Section]> {
        self.ensure(FetchCall::Extracts)?;
        Ok(&self.tree.sections)
    }

    /// Titles of the top-level sections, in document order.
    pub fn section_titles(&mut self) -> Result<Vec<String>> {
        self.ensure(FetchCall::Extracts)?;
        Ok(self
            .tree
            .sections
            .iter()
            .map(|s| s.title.clone())
            .collect())
    }

    /// Content of the section with the given title at any level, each
    /// body truncated to `max_sentences` sentences when given.
    ///
    /// An unknown title yields an empty-text placeholder rather than an
    /// error. Duplicate titles resolve to the last section in document
    /// order.
    pub fn section(&mut self, title: &str, max_sentences: Option<usize>) -> Result<SectionContent> {
        self.ensure(FetchCall::Extracts)?;

        let Some(section) = self.tree.get(title) else {
            return Ok(SectionContent {
                title: title.to_string(),
                text: String::new(),
                subsections: Vec::new(),
            });
        };

        Ok(render_content(section, max_sentences))
    }

    /// Whole page as plain text: the summary followed by every section
    /// rendered with [`Section::full_text`], trimmed.
    pub fn text(&mut self) -> Result<String> {
        self.ensure(FetchCall::Extracts)?;

        let mut out = self.tree.summary.clone();
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        for section in &self.tree.sections {
            out.push_str(&section.full_text());
        }
        Ok(out.trim().to_string())
    }
}

impl<S: PageSource> fmt::Display for WikiPage<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page_id {
            Some(id) => write!(f, "{} (id: {})", self.title, id),
            None => write!(f, "{} (id: ??)", self.title),
        }
    }
}

fn render_content(section: &Section, max_sentences: Option<usize>) -> SectionContent {
    let truncate = |text: &str| match max_sentences {
        Some(n) => sentences::first_sentences(text, n),
        None => text.to_string(),
    };

    SectionContent {
        title: section.title.clone(),
        text: truncate(&section.text),
        subsections: section
            .children
            .iter()
            .map(|child| SectionContent {
                title: child.title.clone(),
                text: truncate(&child.text),
                subsections: Vec::new(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PageExtract;
    use std::cell::Cell;

    #[derive(Debug)]
    struct FakeSource {
        page_id: i64,
        extract: &'static str,
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl FakeSource {
        fn new(page_id: i64, extract: &'static str) -> Self {
            Self {
                page_id,
                extract,
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl PageSource for FakeSource {
        fn search(&self, _query: &str, _limit: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn fetch_extract(&self, _title: &str) -> Result<PageExtract> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(WikiError::Http("connection reset".to_string()));
            }
            Ok(PageExtract {
                page_id: self.page_id,
                extract: self.extract.to_string(),
            })
        }

        fn fetch_coordinates(&self, _title: &str) -> Result<Option<(f64, f64)>> {
            Ok(None)
        }
    }

    const EXTRACT: &str = "Intro one. Intro two. Intro three.\n\n== Alpha ==\nBody A one. Body A two.\n\n=== Sub ===\nSub body.\n\n== Beta ==\nBody B.";

    #[test]
    fn test_fetch_is_memoized() {
        let source = FakeSource::new(42, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        assert_eq!(page.page_id().unwrap(), 42);
        assert_eq!(page.summary(None).unwrap(), "Intro one. Intro two. Intro three.");
        assert!(page.exists().unwrap());
        let _ = page.section_titles().unwrap();

        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_missing_page() {
        let source = FakeSource::new(PAGE_MISSING, "");
        let mut page = WikiPage::new(&source, "Nowhere");

        assert!(!page.exists().unwrap());
        assert_eq!(page.summary(None).unwrap(), "");
        assert!(page.section_titles().unwrap().is_empty());
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_failed_fetch_retries_on_next_access() {
        let source = FakeSource::new(7, EXTRACT);
        source.fail.set(true);
        let mut page = WikiPage::new(&source, "Flaky");

        assert!(page.summary(None).is_err());

        source.fail.set(false);
        assert_eq!(page.page_id().unwrap(), 7);
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_summary_sentence_limit() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");
        assert_eq!(page.summary(Some(2)).unwrap(), "Intro one. Intro two.");
    }

    #[test]
    fn test_section_titles_are_top_level_only() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");
        assert_eq!(page.section_titles().unwrap(), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_section_content_with_subsections() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        let content = page.section("Alpha", None).unwrap();
        assert_eq!(content.text, "Body A one. Body A two.");
        assert_eq!(content.subsections.len(), 1);
        assert_eq!(content.subsections[0].title, "Sub");
        assert_eq!(content.subsections[0].text, "Sub body.");
    }

    #[test]
    fn test_section_content_truncated() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        let content = page.section("Alpha", Some(1)).unwrap();
        assert_eq!(content.text, "Body A one.");
    }

    #[test]
    fn test_unknown_section_is_placeholder() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        let content = page.section("Ghost", None).unwrap();
        assert_eq!(content.title, "Ghost");
        assert_eq!(content.text, "");
        assert!(content.subsections.is_empty());
        // The miss still counted as a (single) fetch.
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_open_rejects_missing_page() {
        let source = FakeSource::new(PAGE_MISSING, "");
        let err = WikiPage::open(&source, "Nowhere").unwrap_err();
        assert!(matches!(err, WikiError::PageNotFound(title) if title == "Nowhere"));
    }

    #[test]
    fn test_display_before_and_after_fetch() {
        let source = FakeSource::new(9, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        assert_eq!(page.to_string(), "Landmark (id: ??)");
        page.exists().unwrap();
        assert_eq!(page.to_string(), "Landmark (id: 9)");
    }

    #[test]
    fn test_text_concatenates_summary_and_sections() {
        let source = FakeSource::new(1, EXTRACT);
        let mut page = WikiPage::new(&source, "Landmark");

        let text = page.text().unwrap();
        assert!(text.starts_with("Intro one."));
        assert!(text.contains("Alpha\nBody A one."));
        assert!(text.contains("Sub\nSub body."));
        assert!(text.ends_with("Beta\nBody B."));
    }
}
