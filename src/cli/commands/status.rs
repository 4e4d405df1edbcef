//! Status command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::SourceStore;
use anyhow::Result;

pub fn run_status(detailed: bool, settings: &Settings) -> Result<()> {
    let store = SourceStore::new(settings.sources_dir());
    let status = store.status()?;

    Output::header("Source Status");
    Output::kv("Directory", &store.root().display().to_string());

    if status.total == 0 {
        println!();
        Output::info("No sources yet. Add one with: reduct add <url>");
        return Ok(());
    }

    Output::kv("Sources", &status.total.to_string());
    Output::kv("With content", &status.with_content.to_string());
    Output::kv("With summary", &status.with_summary.to_string());
    Output::kv("Awaiting summary", &status.pending_summaries().to_string());
    Output::kv("Completion", &format!("{:.1}%", status.completion_rate()));

    if detailed {
        println!();
        for entry in &status.entries {
            Output::source_status(entry);
        }
    }

    Ok(())
}
