//! Configuration settings for Reduct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the LLM model (e.g. `openai/gpt-4o-mini`).
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
/// Environment variable holding a provider-agnostic API key.
pub const ENV_LLM_KEY: &str = "LLM_KEY";
/// Environment variable holding the OpenAI API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Anthropic API key.
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Environment variable overriding the OpenAI-compatible endpoint.
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
/// Environment variable overriding the sources directory.
pub const ENV_SOURCES_DIR: &str = "REDUCT_SOURCES_DIR";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub fetch: FetchSettings,
    pub crawl: CrawlSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding one subdirectory per source.
    pub sources_dir: String,
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            sources_dir: "sources".to_string(),
            temp_dir: "/tmp/reduct".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// LLM model and credentials.
///
/// Credentials are normally supplied through the environment rather than
/// the config file, so they are skipped when empty.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier, optionally provider-prefixed (`anthropic/claude-3-haiku-20240307`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generic API key used for whichever provider the model belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    /// OpenAI-compatible endpoint for providers without a built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Duration in seconds for splitting long audio files.
    pub chunk_duration_seconds: u32,
    /// Maximum concurrent chunk uploads.
    pub max_concurrent_chunks: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            chunk_duration_seconds: 600,
            max_concurrent_chunks: 2,
        }
    }
}

/// Page fetch settings shared by the extractors and the crawler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 15,
            user_agent: concat!("reduct/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Default crawl bounds, overridable per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub max_depth: usize,
    pub max_pages: usize,
    /// Pause between pages, in seconds.
    pub delay_seconds: f64,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 50,
            delay_seconds: 1.0,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file, then apply environment overrides.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Overlay values from the environment. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_LLM_MODEL) {
            self.llm.model = Some(v);
        }
        if let Some(v) = get(ENV_LLM_KEY) {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get(ENV_OPENAI_API_KEY) {
            self.llm.openai_api_key = Some(v);
        }
        if let Some(v) = get(ENV_ANTHROPIC_API_KEY) {
            self.llm.anthropic_api_key = Some(v);
        }
        if let Some(v) = get(ENV_LLM_BASE_URL) {
            self.llm.base_url = Some(v);
        }
        if let Some(v) = get(ENV_SOURCES_DIR) {
            self.general.sources_dir = v;
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ReductError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reduct")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded sources directory path.
    pub fn sources_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.sources_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_LLM_MODEL, "anthropic/claude-3-haiku-20240307"),
            (ENV_ANTHROPIC_API_KEY, "sk-ant"),
            (ENV_SOURCES_DIR, "/data/library"),
            (ENV_LLM_KEY, "  "),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(
            settings.llm.model.as_deref(),
            Some("anthropic/claude-3-haiku-20240307")
        );
        assert_eq!(settings.llm.anthropic_api_key.as_deref(), Some("sk-ant"));
        assert_eq!(settings.llm.api_key, None);
        assert_eq!(settings.sources_dir(), PathBuf::from("/data/library"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [crawl]
            max_pages = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.crawl.max_pages, 5);
        assert_eq!(settings.crawl.max_depth, 2);
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.general.sources_dir, "sources");
    }
}
