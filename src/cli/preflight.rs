//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{LlmSettings, ENV_LLM_MODEL, ENV_OPENAI_API_KEY};
use crate::error::{ReductError, Result};
use crate::llm::check_health;
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Transcription needs ffmpeg, ffprobe and an OpenAI key; remote inputs also need yt-dlp.
    Transcribe { remote: bool },
    /// Summarizing needs a configured model and a key for it.
    Summarize,
    /// Serving needs a model; a missing key is reported by `/health`.
    Serve,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, llm: &LlmSettings) -> Result<()> {
    match operation {
        Operation::Transcribe { .. } => {
            check_openai_key(llm)?;
            for tool in required_tools(operation) {
                check_tool(tool)?;
            }
        }
        Operation::Summarize => {
            let health = check_health(llm);
            if let crate::llm::Health::Unhealthy { error } = health {
                return Err(ReductError::Config(error));
            }
        }
        Operation::Serve => {
            if llm.model.as_deref().map_or(true, str::is_empty) {
                return Err(ReductError::Config(format!(
                    "{} environment variable not set. Example: export {}=anthropic/claude-3-haiku-20240307",
                    ENV_LLM_MODEL, ENV_LLM_MODEL
                )));
            }
        }
    }
    Ok(())
}

/// External binaries an operation shells out to.
fn required_tools(operation: Operation) -> Vec<&'static str> {
    match operation {
        Operation::Transcribe { remote: true } => vec!["yt-dlp", "ffmpeg", "ffprobe"],
        Operation::Transcribe { remote: false } => vec!["ffmpeg", "ffprobe"],
        Operation::Summarize | Operation::Serve => Vec::new(),
    }
}

/// Whisper runs against OpenAI, so an OpenAI-usable key is required.
fn check_openai_key(llm: &LlmSettings) -> Result<()> {
    if llm.openai_api_key.is_some() || llm.api_key.is_some() {
        return Ok(());
    }
    Err(ReductError::Config(format!(
        "{} not set. Set it with: export {}='sk-...'",
        ENV_OPENAI_API_KEY, ENV_OPENAI_API_KEY
    )))
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash)
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ReductError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ReductError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(ReductError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
