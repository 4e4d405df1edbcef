//! Breadth-first crawl of a single site.
//!
//! Every page reached is handed to a [`SourceSink`], which adds it to a store
//! scoped to the seed host. Links are followed only from pages that were
//! added successfully, only within the seed host, and only while the page is
//! shallower than the configured depth.

mod frontier;
mod links;

pub use frontier::Frontier;
pub use links::{extract_hrefs, filter_links, HtmlLinkExtractor, LinkExtractor, SKIP_PATTERNS};

use crate::config::CrawlSettings;
use crate::error::{ReductError, Result};
use crate::store::{SourceDir, SourceStore};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Adds one discovered page as a source.
#[async_trait]
pub trait SourceSink: Send + Sync {
    async fn add_source(
        &self,
        url: &str,
        store: &SourceStore,
        skip_content: bool,
    ) -> Result<SourceDir>;
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_depth: usize,
    pub max_pages: usize,
    pub delay: Duration,
    pub skip_content: bool,
}

impl CrawlConfig {
    pub fn from_settings(settings: &CrawlSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            max_pages: settings.max_pages,
            delay: Duration::from_secs_f64(settings.delay_seconds.max(0.0)),
            skip_content: false,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::from_settings(&CrawlSettings::default())
    }
}

/// Outcome of a crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Directory holding this site's sources.
    pub site_dir: PathBuf,
    /// URLs processed, in visit order.
    pub visited: Vec<String>,
    pub succeeded: usize,
    pub failed: usize,
    /// URLs still queued when the crawl stopped.
    pub remaining: usize,
}

impl CrawlReport {
    pub fn pages_crawled(&self) -> usize {
        self.visited.len()
    }
}

pub struct Crawler {
    sink: Arc<dyn SourceSink>,
    links: Arc<dyn LinkExtractor>,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(sink: Arc<dyn SourceSink>, links: Arc<dyn LinkExtractor>, config: CrawlConfig) -> Self {
        Self {
            sink,
            links,
            config,
        }
    }

    /// Crawl from `seed`, writing sources under `{store}/{slug(host)}`.
    pub async fn crawl(&self, seed: &str, store: &SourceStore) -> Result<CrawlReport> {
        let seed_url = Url::parse(seed)?;
        let host = seed_url
            .host_str()
            .ok_or_else(|| ReductError::Crawl(format!("URL has no host: {}", seed)))?
            .to_string();

        let site = store.scoped(&host);
        info!(
            "Crawling {} (max depth {}, max pages {}) into {}",
            seed,
            self.config.max_depth,
            self.config.max_pages,
            site.root().display()
        );

        let mut frontier = Frontier::new(seed_url.as_str());
        let mut visited = Vec::new();
        let mut succeeded = 0;
        let mut failed = 0;

        while frontier.visited_count() < self.config.max_pages {
            let Some((url, depth)) = frontier.pop() else {
                break;
            };
            if frontier.is_visited(&url) || depth > self.config.max_depth {
                continue;
            }

            frontier.mark_visited(&url);
            visited.push(url.clone());
            info!(
                "[{}/{}] depth {}: {}",
                visited.len(),
                self.config.max_pages,
                depth,
                url
            );

            match self.sink.add_source(&url, &site, self.config.skip_content).await {
                Ok(dir) => {
                    succeeded += 1;
                    debug!("Added {} as {}", url, dir.name());
                    if depth < self.config.max_depth {
                        self.follow_links(&url, depth, &host, &mut frontier).await;
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!("Skipping {}: {}", url, e);
                }
            }

            let more = !frontier.is_empty() && visited.len() < self.config.max_pages;
            if more && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        let report = CrawlReport {
            site_dir: site.root().to_path_buf(),
            visited,
            succeeded,
            failed,
            remaining: frontier.len(),
        };

        info!(
            "Crawl finished: {} pages, {} added, {} failed, {} left in queue",
            report.pages_crawled(),
            report.succeeded,
            report.failed,
            report.remaining
        );

        Ok(report)
    }

    async fn follow_links(&self, url: &str, depth: usize, host: &str, frontier: &mut Frontier) {
        let hrefs = match self.links.links(url).await {
            Ok(hrefs) => hrefs,
            Err(e) => {
                warn!("Could not read links from {}: {}", url, e);
                return;
            }
        };

        let Ok(page) = Url::parse(url) else {
            return;
        };

        let mut queued = 0;
        for link in filter_links(&page, &hrefs, host) {
            if frontier.enqueue(link, depth + 1) {
                queued += 1;
            }
        }
        debug!("Queued {} new links from {}", queued, url);
    }
}
