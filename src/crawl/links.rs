//! Link discovery and filtering.

use crate::error::Result;
use crate::source::PageFetcher;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// Substrings that disqualify a link: fragments, non-HTTP schemes, and
/// binary or media files. Matching is a plain substring test on the
/// resolved URL, so e.g. a query string containing one of these is skipped too.
pub const SKIP_PATTERNS: &[&str] = &[
    "#", "mailto:", "tel:", "javascript:", "ftp:", "data:",
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico",
    ".zip", ".tar", ".gz", ".exe", ".dmg",
    ".mp3", ".mp4", ".avi", ".mov", ".wav",
    ".css", ".js", ".xml",
];

/// Enumerates the raw `href` values on a page, in document order.
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    async fn links(&self, url: &str) -> Result<Vec<String>>;
}

/// Fetches the page and reads every `<a href>`.
pub struct HtmlLinkExtractor {
    fetcher: Arc<dyn PageFetcher>,
}

impl HtmlLinkExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl LinkExtractor for HtmlLinkExtractor {
    async fn links(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(url).await?;
        Ok(extract_hrefs(&html))
    }
}

/// All `href` attributes of anchors, in document order.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").expect("static selector is valid");

    doc.select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Resolve `hrefs` against `page`, keeping same-host links that pass the denylist.
/// Order is preserved; duplicates are left for the frontier to drop.
pub fn filter_links(page: &Url, hrefs: &[String], seed_host: &str) -> Vec<String> {
    hrefs
        .iter()
        .filter_map(|href| page.join(href).ok())
        .filter(|url| url.host_str() == Some(seed_host))
        .map(String::from)
        .filter(|url| !SKIP_PATTERNS.iter().any(|p| url.contains(p)))
        .collect()
}
