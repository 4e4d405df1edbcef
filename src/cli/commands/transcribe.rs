//! Transcribe command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{bail, Result};
use std::path::Path;

/// Transcribe a URL or local file to a text file, or stdout when no output is given.
pub async fn run_transcribe(input: &str, output: Option<&str>, settings: &Settings) -> Result<()> {
    let remote = input.contains("://");
    if !remote && !Path::new(input).is_file() {
        bail!("File not found: {}", input);
    }

    if let Err(e) = preflight::check(Operation::Transcribe { remote }, &settings.llm) {
        Output::error(&format!("{}", e));
        Output::info("Run 'reduct doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Transcribing {}", input));
    let transcript = orchestrator.transcribe(input).await;
    spinner.finish_and_clear();
    let transcript = transcript?;

    match output {
        Some(path) if path != "-" => {
            std::fs::write(path, &transcript)?;
            Output::success(&format!(
                "Transcript saved to {} ({} words)",
                path,
                transcript.split_whitespace().count()
            ));
        }
        _ => println!("{}", transcript),
    }

    Ok(())
}
