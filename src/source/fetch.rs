//! Page fetching.

use crate::config::FetchSettings;
use crate::error::{ReductError, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Fetches the HTML body of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher with a fixed timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent)
            .build()
            .map_err(|e| ReductError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
