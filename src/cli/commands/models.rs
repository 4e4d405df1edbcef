//! Models command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::llm::list_models;
use anyhow::Result;

/// List models from every provider with credentials, grouped by provider.
pub async fn run_models(filter: Option<&str>, settings: &Settings) -> Result<()> {
    let spinner = Output::spinner("Fetching model lists...");
    let listing = list_models(&settings.llm, filter).await;
    spinner.finish_and_clear();

    for (provider, error) in &listing.errors {
        Output::warning(&format!("{}: {}", provider, error));
    }

    if listing.total() == 0 {
        match filter {
            Some(f) => Output::info(&format!("No models matching '{}'.", f)),
            None => Output::info("No models found. Configure an API key (see 'reduct doctor')."),
        }
        return Ok(());
    }

    for (provider, models) in &listing.groups {
        Output::header(&format!("{} ({})", provider, models.len()));
        for model in models {
            Output::list_item(model);
        }
    }

    println!();
    Output::info(&format!("{} models", listing.total()));
    Ok(())
}
