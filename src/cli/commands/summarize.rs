//! Summarize and summarize-all command implementations.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::store::SourceStore;
use anyhow::Result;
use std::path::PathBuf;

/// Summarize one stored source.
pub async fn run_summarize(source: &str, output: Option<&str>, settings: &Settings) -> Result<()> {
    check_llm(settings)?;

    let store = SourceStore::new(settings.sources_dir());
    let dir = store.find(source)?;
    let orchestrator = Orchestrator::new(settings)?;

    let output = output.map(PathBuf::from);
    let spinner = Output::spinner(&format!("Summarizing {}", dir.name()));
    let result = orchestrator.summarize(&dir, output.as_deref()).await;
    spinner.finish_and_clear();

    let path = result?;
    Output::success(&format!("Summary saved to {}", path.display()));
    Ok(())
}

/// Summarize every source without a summary.
pub async fn run_summarize_all(settings: &Settings) -> Result<()> {
    check_llm(settings)?;

    let store = SourceStore::new(settings.sources_dir());
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Summarizing sources in {}", store.root().display()));
    let result = orchestrator.summarize_all(&store).await;
    spinner.finish_and_clear();

    let tally = result?;
    if tally.total() == 0 {
        Output::info("Every source already has a summary.");
    } else {
        Output::tally("Summaries", &tally);
    }
    Ok(())
}

fn check_llm(settings: &Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize, &settings.llm) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(())
}
