//! Source classification and metadata extraction.
//!
//! A source is either a video (anything hosted on a known video platform) or
//! an article (everything else). Extraction never fails outright: problems are
//! recorded on the returned [`SourceRecord`] so batch callers can persist
//! whatever was learned and move on.

mod article;
mod extractor;
mod fetch;
mod video;

pub use article::{parse_article_metadata, parse_published_date, ArticleMetadata};
pub use extractor::{Extraction, MetadataExtractor};
pub use fetch::{HttpFetcher, PageFetcher};
pub use video::{parse_upload_date, VideoInfo, VideoProbe, YtDlpProbe};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a video's metadata cannot be retrieved.
pub const DEFAULT_VIDEO_TITLE: &str = "YouTube Video";
/// Title used when an article's metadata cannot be retrieved.
pub const DEFAULT_ARTICLE_TITLE: &str = "Web Page";

/// Hosts treated as video platforms.
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// Kind of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Video,
    Article,
}

impl SourceKind {
    /// Classify a URL by its host.
    pub fn classify(url: &str) -> Self {
        let host = url::Url::parse(url.trim())
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()));

        match host {
            Some(host)
                if VIDEO_HOSTS
                    .iter()
                    .any(|v| host == *v || host.ends_with(&format!(".{}", v))) =>
            {
                SourceKind::Video
            }
            _ => SourceKind::Article,
        }
    }

    /// Title to fall back on when extraction fails.
    pub fn default_title(&self) -> &'static str {
        match self {
            SourceKind::Video => DEFAULT_VIDEO_TITLE,
            SourceKind::Article => DEFAULT_ARTICLE_TITLE,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Video => write!(f, "video"),
            SourceKind::Article => write!(f, "article"),
        }
    }
}

/// Metadata stored for every source as `data.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    /// Set once at creation.
    pub date_added: DateTime<Utc>,
    /// Present only when extraction failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceRecord {
    /// A fresh record for `url` with no metadata yet.
    pub fn new(url: &str, kind: SourceKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.to_string(),
            kind,
            description: None,
            published_date: None,
            date_added: Utc::now(),
            error: None,
        }
    }

    /// A record describing a failed extraction.
    pub fn failed(url: &str, kind: SourceKind, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(url, kind, kind.default_title())
        }
    }
}
