//! Error types for Reduct.

use thiserror::Error;

/// Library-level error type for Reduct operations.
#[derive(Error, Debug)]
pub enum ReductError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Source store error: {0}")]
    Store(String),

    #[error("Crawl error: {0}")]
    Crawl(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Reduct operations.
pub type Result<T> = std::result::Result<T, ReductError>;
