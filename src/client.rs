//! MediaWiki Action API client.
//!
//! [`PageSource`] is the capability the rest of the crate depends on;
//! [`WikiClient`] is the concrete blocking implementation of it. Each
//! call issues one synchronous request with a fixed deadline: no retry,
//! no batching, and a transport failure surfaces directly to the
//! caller.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::WikiConfig;
use crate::error::{Result, WikiError};
use crate::page::WikiPage;

/// Sentinel page id the API uses for titles it does not know.
pub const PAGE_MISSING: i64 = -1;

/// Raw result of an extracts fetch.
#[derive(Debug, Clone)]
pub struct PageExtract {
    /// Remote page id; [`PAGE_MISSING`] when the page does not exist.
    pub page_id: i64,
    /// Flat extract text with inline heading delimiters. Empty when the
    /// page does not exist or the response carried no extract.
    pub extract: String,
}

/// Remote operations the page entity and the query helpers depend on.
pub trait PageSource {
    /// Full-text search returning up to `limit` page titles, best
    /// match first.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    /// Fetch the flat extract for `title`.
    fn fetch_extract(&self, title: &str) -> Result<PageExtract>;

    /// Geographic coordinates of `title`, when the page has any.
    /// Absent coordinates are `None`, not an error.
    fn fetch_coordinates(&self, title: &str) -> Result<Option<(f64, f64)>>;
}

// ── Wire shapes ──

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    info: String,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: HashMap<String, PageBody>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    coordinates: Vec<Coordinate>,
}

#[derive(Debug, Deserialize)]
struct Coordinate {
    lat: f64,
    lon: f64,
}

/// Blocking client for the MediaWiki Action API.
pub struct WikiClient {
    http: Client,
    config: WikiConfig,
}

impl WikiClient {
    /// Build a client from configuration.
    pub fn new(config: WikiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Open a page handle backed by this client, verifying existence.
    pub fn page(&self, title: &str) -> Result<WikiPage<'_, Self>> {
        WikiPage::open(self, title)
    }

    /// Issue one API query with the given parameters.
    fn query(&self, params: &[(&str, &str)]) -> Result<ApiResponse> {
        let url = self.config.endpoint();
        debug!(%url, ?params, "querying remote API");

        let response = self.http.get(&url).query(params).send()?;
        let body = response.text()?;
        let parsed: ApiResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

impl PageSource for WikiClient {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let limit = limit.to_string();
        let res = self.query(&[
            ("action", "query"),
            ("format", "json"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", &limit),
        ])?;
        parse_search(res)
    }

    fn fetch_extract(&self, title: &str) -> Result<PageExtract> {
        let res = self.query(&[
            ("action", "query"),
            ("format", "json"),
            ("titles", title),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("exsectionformat", "wiki"),
            ("redirects", "1"),
        ])?;
        parse_extract(res)
    }

    fn fetch_coordinates(&self, title: &str) -> Result<Option<(f64, f64)>> {
        let res = self.query(&[
            ("action", "query"),
            ("format", "json"),
            ("titles", title),
            ("prop", "coordinates"),
        ])?;
        parse_coordinates(res)
    }
}

fn parse_search(res: ApiResponse) -> Result<Vec<String>> {
    if let Some(error) = res.error {
        return Err(WikiError::Api(error.info));
    }

    let hits = res.query.map(|q| q.search).unwrap_or_default();
    Ok(hits.into_iter().map(|hit| hit.title).collect())
}

fn parse_extract(res: ApiResponse) -> Result<PageExtract> {
    if let Some(error) = res.error {
        return Err(WikiError::Api(error.info));
    }

    let pages = res.query.map(|q| q.pages).unwrap_or_default();

    // The response keys the page map by page id; "-1" marks a title the
    // remote side does not know. A single title was asked for, so the
    // map holds at most one entry.
    let Some((key, page)) = pages.into_iter().next() else {
        return Ok(PageExtract {
            page_id: PAGE_MISSING,
            extract: String::new(),
        });
    };

    let page_id = key.parse().unwrap_or(PAGE_MISSING);
    let extract = if page_id == PAGE_MISSING {
        String::new()
    } else {
        page.extract.unwrap_or_default()
    };

    Ok(PageExtract { page_id, extract })
}

fn parse_coordinates(res: ApiResponse) -> Result<Option<(f64, f64)>> {
    if let Some(error) = res.error {
        return Err(WikiError::Api(error.info));
    }

    // Coordinates are optional page data: any missing piece of the
    // response means the page simply has none.
    let coords = res
        .query
        .and_then(|q| q.pages.into_values().next())
        .and_then(|page| page.coordinates.into_iter().next());
    Ok(coords.map(|c| (c.lat, c.lon)))
}
