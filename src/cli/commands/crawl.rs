//! Crawl command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::crawl::{CrawlConfig, Crawler, HtmlLinkExtractor};
use crate::orchestrator::Orchestrator;
use crate::source::HttpFetcher;
use crate::store::SourceStore;
use anyhow::{ensure, Result};
use std::sync::Arc;
use std::time::Duration;

/// Limits given on the command line; unset values fall back to config.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlArgs {
    pub max_depth: Option<usize>,
    pub max_pages: Option<usize>,
    pub delay: Option<f64>,
    pub skip_content: bool,
}

pub async fn run_crawl(url: &str, args: CrawlArgs, settings: &Settings) -> Result<()> {
    let mut config = CrawlConfig::from_settings(&settings.crawl);
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if let Some(pages) = args.max_pages {
        config.max_pages = pages;
    }
    if let Some(delay) = args.delay {
        ensure!(delay >= 0.0 && delay.is_finite(), "--delay must be a non-negative number");
        config.delay = Duration::from_secs_f64(delay);
    }
    config.skip_content = args.skip_content;

    let store = SourceStore::new(settings.sources_dir());
    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let links = Arc::new(HtmlLinkExtractor::new(Arc::new(HttpFetcher::new(&settings.fetch)?)));

    Output::info(&format!(
        "Crawling {} (depth {}, up to {} pages, {:.1}s delay)",
        url,
        config.max_depth,
        config.max_pages,
        config.delay.as_secs_f64()
    ));

    let crawler = Crawler::new(orchestrator, links, config);
    let spinner = Output::spinner("Crawling...");
    let report = crawler.crawl(url, &store).await;
    spinner.finish_and_clear();
    let report = report?;

    Output::success(&format!(
        "Crawled {} pages ({} added, {} failed)",
        report.pages_crawled(),
        report.succeeded,
        report.failed
    ));
    Output::kv("Site directory", &report.site_dir.display().to_string());
    if report.remaining > 0 {
        Output::kv("Left in queue", &report.remaining.to_string());
    }

    Ok(())
}
