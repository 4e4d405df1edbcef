//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::audio::split_audio;
use crate::config::{LlmSettings, TranscriptionSettings};
use crate::error::{ReductError, Result};
use crate::llm::openai_client;
use async_openai::types::{
    AudioInput, AudioResponseFormat, CreateTranscriptionRequest, CreateTranscriptionRequestArgs,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{debug, info, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    chunk_duration_seconds: u32,
    max_concurrent_chunks: usize,
}

impl WhisperTranscriber {
    /// Create a transcriber from settings. Requires an OpenAI key.
    pub fn from_settings(llm: &LlmSettings, settings: &TranscriptionSettings) -> Result<Self> {
        Ok(Self {
            client: openai_client(llm)?,
            model: settings.model.clone(),
            chunk_duration_seconds: settings.chunk_duration_seconds,
            max_concurrent_chunks: settings.max_concurrent_chunks.max(1),
        })
    }

    /// Transcribe a single audio file (no splitting).
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3");
        let request = transcription_request(file_name, file_bytes, &self.model)?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| ReductError::Transcription(format!("Whisper API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let temp_dir = tempfile::tempdir()?;
        let chunks = split_audio(audio_path, temp_dir.path(), self.chunk_duration_seconds).await?;

        if chunks.len() == 1 {
            return self.transcribe_single(audio_path).await;
        }

        let chunk_count = chunks.len();
        info!("Processing {} audio chunks with {}", chunk_count, self.model);

        let pb = ProgressBar::new(chunk_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {spinner:.green} Whisper   [{bar:30.cyan/blue}] {pos}/{len}")
                .map_err(|e| ReductError::Transcription(e.to_string()))?
                .progress_chars("█▓░"),
        );

        // Bounded concurrency, fail fast on the first chunk error
        let mut results: Vec<(usize, String)> = Vec::with_capacity(chunk_count);
        let mut stream = stream::iter(chunks.into_iter().enumerate())
            .map(|(idx, chunk_path)| async move {
                (idx, self.transcribe_single(&chunk_path).await)
            })
            .buffer_unordered(self.max_concurrent_chunks);

        while let Some((idx, result)) = stream.next().await {
            pb.inc(1);
            match result {
                Ok(text) => results.push((idx, text)),
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(ReductError::Transcription(format!("Chunk {} failed: {}", idx, e)));
                }
            }
        }

        pb.finish_and_clear();
        drop(temp_dir);

        results.sort_by_key(|(idx, _)| *idx);
        Ok(join_chunks(results.into_iter().map(|(_, text)| text)))
    }
}

/// Whisper request for one file; only the text of the reply is used.
fn transcription_request(
    file_name: &str,
    bytes: Vec<u8>,
    model: &str,
) -> Result<CreateTranscriptionRequest> {
    CreateTranscriptionRequestArgs::default()
        .file(AudioInput::from_vec_u8(file_name.to_string(), bytes))
        .model(model)
        .response_format(AudioResponseFormat::Json)
        .build()
        .map_err(|e| ReductError::Transcription(format!("Failed to build request: {}", e)))
}

/// Join chunk transcripts in order, skipping empty chunks.
fn join_chunks<I: IntoIterator<Item = String>>(texts: I) -> String {
    texts
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_chunks() {
        let joined = join_chunks(vec![
            "First part.".to_string(),
            "  ".to_string(),
            "Second part.".to_string(),
        ]);
        assert_eq!(joined, "First part. Second part.");
    }

    #[test]
    fn test_request_asks_for_plain_json() {
        let request = transcription_request("clip.mp3", b"ID3".to_vec(), "whisper-1").unwrap();
        assert_eq!(request.response_format, Some(AudioResponseFormat::Json));
        assert_eq!(request.model, "whisper-1");
    }

    #[test]
    fn test_requires_openai_key() {
        let result =
            WhisperTranscriber::from_settings(&LlmSettings::default(), &TranscriptionSettings::default());
        assert!(matches!(result, Err(ReductError::Config(_))));
    }
}
