//! Speech-to-text for video sources and local media files.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file to plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
