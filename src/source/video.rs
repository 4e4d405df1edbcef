//! Video metadata via yt-dlp.

use crate::error::{ReductError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument};

/// Raw metadata reported for a video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoInfo {
    pub title: Option<String>,
    /// Upload date as reported, normally `YYYYMMDD`.
    pub upload_date: Option<String>,
    pub description: Option<String>,
}

/// Looks up metadata for a video URL.
#[async_trait]
pub trait VideoProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<VideoInfo>;
}

/// Probe that shells out to `yt-dlp --dump-json`.
#[derive(Debug, Clone, Default)]
pub struct YtDlpProbe;

impl YtDlpProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VideoProbe for YtDlpProbe {
    #[instrument(skip(self))]
    async fn probe(&self, url: &str) -> Result<VideoInfo> {
        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--dump-json",
                "--no-download",
                "--no-playlist",
                "--no-warnings",
                url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReductError::ToolNotFound("yt-dlp".to_string())
                } else {
                    ReductError::Extraction(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReductError::Extraction(format!(
                "Video {} not found or unavailable: {}",
                url,
                stderr.trim()
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            ReductError::Extraction(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        debug!("yt-dlp returned metadata for {}", url);

        Ok(VideoInfo {
            title: json["title"].as_str().map(|s| s.to_string()),
            upload_date: json["upload_date"].as_str().map(|s| s.to_string()),
            description: json["description"].as_str().map(|s| s.to_string()),
        })
    }
}

/// Parse a `YYYYMMDD` upload date. Anything else yields `None`.
pub fn parse_upload_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
