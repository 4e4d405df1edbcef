//! OpenAI-compatible client construction.
//!
//! Every provider Reduct talks to is reached through an OpenAI-compatible
//! endpoint, so a single `async_openai` client type covers them all.

use super::{api_key_for, ModelRef, Provider};
use crate::config::LlmSettings;
use crate::error::{ReductError, Result};
use async_openai::{config::OpenAIConfig, Client};

/// Create a client for the given key and optional endpoint.
///
/// No request timeout is applied; completions may legitimately take minutes.
pub fn create_client(api_key: &str, api_base: Option<&str>) -> Client<OpenAIConfig> {
    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = api_base {
        config = config.with_api_base(base.trim_end_matches('/'));
    }
    Client::with_config(config)
}

/// Create a client for chat completions against the model's provider.
pub fn completion_client(llm: &LlmSettings, model: &ModelRef) -> Result<Client<OpenAIConfig>> {
    let key = api_key_for(llm, model.provider).ok_or_else(|| {
        ReductError::Config(format!(
            "No API key configured for {}. Set {}",
            model.provider,
            model.provider.key_hint()
        ))
    })?;

    let base = llm
        .base_url
        .as_deref()
        .or_else(|| model.provider.default_base_url());

    if base.is_none() && model.provider != Provider::OpenAI {
        return Err(ReductError::Config(format!(
            "No endpoint known for provider '{}'. Set LLM_BASE_URL to an OpenAI-compatible endpoint.",
            model.provider
        )));
    }

    Ok(create_client(key, base))
}

/// Create a client for the OpenAI API itself (used for Whisper transcription).
pub fn openai_client(llm: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let key = api_key_for(llm, Provider::OpenAI).ok_or_else(|| {
        ReductError::Config(format!(
            "OpenAI API key not set. Set it with: export {}='sk-...'",
            crate::config::ENV_OPENAI_API_KEY
        ))
    })?;
    Ok(create_client(key, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_needs_base_url() {
        let llm = LlmSettings {
            model: Some("acme/frontier-1".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let model = ModelRef::parse("acme/frontier-1");

        assert!(matches!(
            completion_client(&llm, &model),
            Err(ReductError::Config(_))
        ));

        let llm = LlmSettings {
            base_url: Some("http://localhost:11434/v1/".to_string()),
            ..llm
        };
        assert!(completion_client(&llm, &model).is_ok());
    }

    #[test]
    fn test_missing_key() {
        let llm = LlmSettings::default();
        assert!(openai_client(&llm).is_err());
        assert!(completion_client(&llm, &ModelRef::parse("gpt-4o-mini")).is_err());
    }
}
