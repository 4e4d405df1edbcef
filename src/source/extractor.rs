//! Metadata extraction for a single URL.

use super::{
    parse_article_metadata, parse_upload_date, HttpFetcher, PageFetcher, SourceKind,
    SourceRecord, VideoProbe, YtDlpProbe,
};
use crate::config::FetchSettings;
use crate::error::{ReductError, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of metadata extraction. Both variants carry a record that can be persisted.
#[derive(Debug, Clone)]
pub enum Extraction {
    Complete(SourceRecord),
    /// Extraction failed; the record has a default title and `error` set.
    Failed(SourceRecord),
}

impl Extraction {
    pub fn record(&self) -> &SourceRecord {
        match self {
            Extraction::Complete(r) | Extraction::Failed(r) => r,
        }
    }

    pub fn into_record(self) -> SourceRecord {
        match self {
            Extraction::Complete(r) | Extraction::Failed(r) => r,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Extraction::Complete(_))
    }
}

/// Classifies URLs and builds their [`SourceRecord`].
pub struct MetadataExtractor {
    fetcher: Arc<dyn PageFetcher>,
    video: Arc<dyn VideoProbe>,
}

impl MetadataExtractor {
    /// Create an extractor using HTTP for articles and yt-dlp for videos.
    pub fn new(fetch: &FetchSettings) -> Result<Self> {
        Ok(Self::with_components(
            Arc::new(HttpFetcher::new(fetch)?),
            Arc::new(YtDlpProbe::new()),
        ))
    }

    /// Create an extractor with custom collaborators.
    pub fn with_components(fetcher: Arc<dyn PageFetcher>, video: Arc<dyn VideoProbe>) -> Self {
        Self { fetcher, video }
    }

    /// Extract metadata for `url`. Never fails; see [`Extraction`].
    #[instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Extraction {
        let kind = SourceKind::classify(url);

        let result = match kind {
            SourceKind::Video => self.extract_video(url).await,
            SourceKind::Article => self.extract_article(url).await,
        };

        match result {
            Ok(record) => {
                info!("Extracted {} metadata: {}", kind, record.title);
                Extraction::Complete(record)
            }
            Err(e) => {
                warn!("Metadata extraction failed for {}: {}", url, e);
                Extraction::Failed(SourceRecord::failed(url, kind, e.to_string()))
            }
        }
    }

    async fn extract_video(&self, url: &str) -> Result<SourceRecord> {
        let info = self.video.probe(url).await?;

        let mut record = SourceRecord::new(
            url,
            SourceKind::Video,
            info.title.unwrap_or_else(|| SourceKind::Video.default_title().to_string()),
        );
        record.published_date = info.upload_date.as_deref().and_then(parse_upload_date);
        record.description = info.description.filter(|d| !d.trim().is_empty());
        Ok(record)
    }

    async fn extract_article(&self, url: &str) -> Result<SourceRecord> {
        url::Url::parse(url)?;
        let html = self.fetcher.fetch(url).await?;
        let meta = parse_article_metadata(&html);

        let title = meta
            .title
            .ok_or_else(|| ReductError::Extraction(format!("No title found at {}", url)))?;

        let mut record = SourceRecord::new(url, SourceKind::Article, title);
        record.description = meta.description;
        record.published_date = meta.published_date;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VideoInfo;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticFetcher(HashMap<String, String>);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| ReductError::Extraction(format!("404 for {}", url)))
        }
    }

    struct StaticProbe(Option<VideoInfo>);

    #[async_trait]
    impl VideoProbe for StaticProbe {
        async fn probe(&self, _url: &str) -> Result<VideoInfo> {
            self.0
                .clone()
                .ok_or_else(|| ReductError::ToolNotFound("yt-dlp".to_string()))
        }
    }

    fn extractor(pages: &[(&str, &str)], video: Option<VideoInfo>) -> MetadataExtractor {
        let pages = pages
            .iter()
            .map(|(u, h)| (u.to_string(), h.to_string()))
            .collect();
        MetadataExtractor::with_components(
            Arc::new(StaticFetcher(pages)),
            Arc::new(StaticProbe(video)),
        )
    }

    #[tokio::test]
    async fn test_article_extraction() {
        let ex = extractor(
            &[(
                "https://example.com/post",
                "<html><head><title>A Post</title></head></html>",
            )],
            None,
        );

        let extraction = ex.extract("https://example.com/post").await;
        assert!(extraction.is_complete());
        let record = extraction.into_record();
        assert_eq!(record.kind, SourceKind::Article);
        assert_eq!(record.title, "A Post");
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_article_still_returns_record() {
        let ex = extractor(&[], None);

        let extraction = ex.extract("https://example.com/missing").await;
        assert!(!extraction.is_complete());
        let record = extraction.record();
        assert_eq!(record.kind, SourceKind::Article);
        assert_eq!(record.title, "Web Page");
        assert!(record.error.as_deref().unwrap().contains("404"));
        assert!(record.date_added <= chrono::Utc::now());
    }

    #[tokio::test]
    async fn test_video_extraction_with_bad_date() {
        let ex = extractor(
            &[],
            Some(VideoInfo {
                title: Some("Software Is Changing (Again)".to_string()),
                upload_date: Some("June 2025".to_string()),
                description: Some("A keynote".to_string()),
            }),
        );

        let extraction = ex.extract("https://www.youtube.com/watch?v=LCEmiRjPEtQ").await;
        assert!(extraction.is_complete());
        let record = extraction.record();
        assert_eq!(record.kind, SourceKind::Video);
        assert_eq!(record.title, "Software Is Changing (Again)");
        assert_eq!(record.published_date, None);
        assert_eq!(record.description.as_deref(), Some("A keynote"));
    }

    #[tokio::test]
    async fn test_failed_video_uses_default_title() {
        let ex = extractor(&[], None);
        let record = ex.extract("https://youtu.be/LCEmiRjPEtQ").await.into_record();
        assert_eq!(record.kind, SourceKind::Video);
        assert_eq!(record.title, "YouTube Video");
        assert!(record.error.is_some());
    }
}
