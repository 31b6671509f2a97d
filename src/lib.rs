//! Wiki Extractor - structured access to Wikipedia page extracts.
//!
//! This library fetches plain-text page extracts from the MediaWiki
//! Action API and reconstructs each page's hierarchical structure: the
//! summary, the top-level sections, and their nested subsections, each
//! with its exact text span.
//!
//! # Overview
//!
//! 1. A page extract arrives as one flat text blob with inline heading
//!    delimiters (`== Title ==`).
//! 2. The heading scanner locates the delimiters and the tree builder
//!    splits the blob into a summary plus a nested section tree.
//! 3. [`WikiPage`] caches the parsed tree behind lazy accessors, so a
//!    page is fetched at most once no matter how often it is read.
//!
//! # Quick Start
//!
//! ```no_run
//! use wiki_extractor::{WikiClient, WikiConfig, WikiPage};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = WikiConfig::load()?;
//!     config.validate()?;
//!
//!     let client = WikiClient::new(config)?;
//!     let mut page = WikiPage::open(&client, "Eiffel Tower")?;
//!
//!     println!("{}", page.summary(Some(2))?);
//!     for title in page.section_titles()? {
//!         println!("- {}", title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **WikiClient / PageSource**: blocking Action API transport behind
//!   a trait, so the core never sees HTTP
//! - **headings / sections**: delimiter scanning and section tree
//!   construction
//! - **WikiPage**: lazy, memoized page attributes
//! - **brackets / sentences**: display-text post-processing

pub mod brackets;
pub mod client;
pub mod config;
pub mod error;
pub mod headings;
pub mod page;
pub mod sections;
pub mod sentences;

// Re-export commonly used types
pub use brackets::excise;
pub use client::{PAGE_MISSING, PageExtract, PageSource, WikiClient};
pub use config::WikiConfig;
pub use error::{Result, WikiError};
pub use headings::HeadingMatch;
pub use page::{FetchCall, SectionContent, WikiPage};
pub use sections::{Section, SectionTree, build_section_tree};
