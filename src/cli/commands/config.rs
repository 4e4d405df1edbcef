//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<&str>, settings: &Settings) -> Result<()> {
    let path = config_path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let mut shown = settings.clone();
            for key in [
                &mut shown.llm.api_key,
                &mut shown.llm.openai_api_key,
                &mut shown.llm.anthropic_api_key,
            ] {
                if key.is_some() {
                    *key = Some("****".to_string());
                }
            }
            let toml_str =
                toml::to_string_pretty(&shown).context("Failed to serialize config")?;
            println!("{}", toml_str);
        }

        ConfigAction::Init { force } => {
            if path.exists() && !force {
                Output::warning(&format!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                ));
                return Ok(());
            }
            // Keys usually come from the environment; keep them out of the file
            let mut to_write = settings.clone();
            to_write.llm.api_key = None;
            to_write.llm.openai_api_key = None;
            to_write.llm.anthropic_api_key = None;
            to_write.save_to(&path)?;
            Output::success(&format!("Wrote config to {}", path.display()));
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
