//! Add and add-batch command implementations.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{parse_url_csv, parse_url_lines, Orchestrator};
use crate::store::SourceStore;
use anyhow::{bail, Context, Result};

/// Add a single source.
pub async fn run_add(url: &str, skip_content: bool, settings: &Settings) -> Result<()> {
    let store = SourceStore::new(settings.sources_dir());
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Adding {}", url));
    let added = orchestrator.add(url, &store, skip_content).await;
    spinner.finish_and_clear();
    let added = added?;

    if let Some(error) = &added.record.error {
        Output::warning(&format!("Metadata extraction failed: {}", error));
    } else {
        Output::success(&format!("Added '{}'", added.record.title));
    }
    Output::kv("Type", &added.record.kind.to_string());
    Output::kv("Directory", &added.dir.path().display().to_string());

    if let Some(error) = &added.content_error {
        Output::warning(error);
    } else if added.content_saved {
        Output::kv("Content", &added.dir.content_path().display().to_string());
    }

    Ok(())
}

/// Add sources from a comma-separated list or a URL file.
pub async fn run_add_batch(
    urls: Option<&str>,
    file: Option<&str>,
    skip_content: bool,
    settings: &Settings,
) -> Result<()> {
    let list = match (urls, file) {
        (Some(csv), _) => parse_url_csv(csv),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read URL file {}", path))?;
            parse_url_lines(&text)
        }
        (None, None) => bail!("Provide --urls or --file"),
    };

    if list.is_empty() {
        Output::warning("No URLs to add.");
        return Ok(());
    }

    let store = SourceStore::new(settings.sources_dir());
    let orchestrator = Orchestrator::new(settings)?;

    Output::info(&format!(
        "Adding {} sources to {}",
        list.len(),
        store.root().display()
    ));

    let spinner = Output::spinner("Extracting sources...");
    let tally = orchestrator.add_batch(&list, &store, skip_content).await;
    spinner.finish_and_clear();
    Output::tally("Batch complete", &tally);

    Ok(())
}
