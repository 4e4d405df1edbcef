//! Content extraction: video transcripts and article text.
//!
//! Like metadata extraction, content extraction never fails: errors are
//! returned as placeholder text that gets stored in place of the content.

mod article;

pub use article::{extract_article_text, normalize_lines};

use crate::audio::{download_audio, normalize_to_mp3};
use crate::config::Settings;
use crate::error::{ReductError, Result};
use crate::source::{HttpFetcher, PageFetcher, SourceKind, SourceRecord};
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

/// Prefix of the placeholder stored when extraction fails.
pub const CONTENT_ERROR_PREFIX: &str = "Error extracting content:";

/// Produces the text content of a source.
pub struct ContentExtractor {
    fetcher: Arc<dyn PageFetcher>,
    transcriber: std::result::Result<Arc<dyn Transcriber>, String>,
    temp_dir: PathBuf,
}

impl ContentExtractor {
    /// Create an extractor from settings.
    ///
    /// A missing OpenAI key is not an error here; video extraction reports it
    /// as placeholder content instead.
    pub fn new(settings: &Settings) -> Result<Self> {
        let transcriber = WhisperTranscriber::from_settings(&settings.llm, &settings.transcription)
            .map(|t| Arc::new(t) as Arc<dyn Transcriber>)
            .map_err(|e| e.to_string());

        Ok(Self {
            fetcher: Arc::new(HttpFetcher::new(&settings.fetch)?),
            transcriber,
            temp_dir: settings.temp_dir(),
        })
    }

    /// Create an extractor with custom collaborators.
    pub fn with_components(
        fetcher: Arc<dyn PageFetcher>,
        transcriber: Option<Arc<dyn Transcriber>>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            transcriber: transcriber.ok_or_else(|| "No transcriber configured".to_string()),
            temp_dir,
        }
    }

    /// Extract the content of a source. Failures become placeholder text.
    #[instrument(skip(self, record), fields(url = %record.url))]
    pub async fn extract(&self, record: &SourceRecord) -> String {
        let result = match record.kind {
            SourceKind::Video => self.transcribe_video(&record.url).await,
            SourceKind::Article => self.article_text(&record.url).await,
        };

        match result {
            Ok(text) => {
                info!("Extracted {} characters", text.len());
                text
            }
            Err(e) => {
                warn!("Content extraction failed for {}: {}", record.url, e);
                format!("{} {}", CONTENT_ERROR_PREFIX, e)
            }
        }
    }

    async fn article_text(&self, url: &str) -> Result<String> {
        let html = self.fetcher.fetch(url).await?;
        Ok(extract_article_text(&html))
    }

    async fn transcribe_video(&self, url: &str) -> Result<String> {
        self.transcribe(url).await
    }

    /// Transcribe a local audio/video file or any URL yt-dlp can download.
    ///
    /// Unlike [`extract`](Self::extract), failures are returned as errors.
    pub async fn transcribe(&self, input: &str) -> Result<String> {
        let transcriber = self
            .transcriber
            .as_ref()
            .map_err(|e| ReductError::Config(e.clone()))?;

        std::fs::create_dir_all(&self.temp_dir)?;
        let work_dir = tempfile::tempdir_in(&self.temp_dir)?;

        let local = Path::new(input);
        let audio_path = if local.is_file() {
            let dest = work_dir.path().join("audio.mp3");
            normalize_to_mp3(local, &dest).await?;
            dest
        } else if Url::parse(input).is_ok() {
            download_audio(input, "audio", work_dir.path()).await?
        } else {
            return Err(ReductError::InvalidInput(format!(
                "Not a file or URL: {}",
                input
            )));
        };

        transcriber.transcribe(&audio_path).await
    }
}

/// Whether stored content is an extraction failure placeholder.
pub fn is_error_content(content: &str) -> bool {
    content.starts_with(CONTENT_ERROR_PREFIX)
}
