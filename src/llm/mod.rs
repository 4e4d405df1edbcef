//! LLM access for summaries and text reduction.
//!
//! Model identifiers may be provider-prefixed (`anthropic/claude-3-haiku-20240307`)
//! or bare (`gpt-4o-mini`); the provider is inferred from either form.

mod client;
mod completion;
mod health;
mod models;

pub use client::{completion_client, create_client, openai_client};
pub use completion::{Completer, OpenAICompleter};
pub use health::{check_health, Health};
pub use models::{group_models, list_models, ModelListing};

use crate::config::LlmSettings;

/// Known model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provider {
    OpenAI,
    Anthropic,
    Google,
    Meta,
    Mistral,
    Other,
}

impl Provider {
    /// Infer the provider from a model identifier.
    pub fn infer(model_id: &str) -> Self {
        let id = model_id.trim().to_lowercase();

        if let Some((prefix, _)) = id.split_once('/') {
            if let Some(provider) = Self::from_prefix(prefix) {
                return provider;
            }
        }

        let name = id.rsplit('/').next().unwrap_or(&id);
        if name.starts_with("gpt-")
            || name.starts_with("chatgpt")
            || name.starts_with("o1")
            || name.starts_with("o3")
            || name.starts_with("o4")
            || name.starts_with("text-")
            || name.starts_with("whisper")
            || name.starts_with("dall-e")
            || name.starts_with("tts-")
            || name.starts_with("davinci")
            || name.starts_with("babbage")
            || name.starts_with("omni-")
        {
            Provider::OpenAI
        } else if name.starts_with("claude") {
            Provider::Anthropic
        } else if name.starts_with("gemini") || name.starts_with("gemma") {
            Provider::Google
        } else if name.starts_with("llama") {
            Provider::Meta
        } else if name.starts_with("mistral")
            || name.starts_with("mixtral")
            || name.starts_with("codestral")
        {
            Provider::Mistral
        } else {
            Provider::Other
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "openai" => Some(Provider::OpenAI),
            "anthropic" => Some(Provider::Anthropic),
            "google" | "gemini" => Some(Provider::Google),
            "meta" => Some(Provider::Meta),
            "mistral" => Some(Provider::Mistral),
            _ => None,
        }
    }

    /// OpenAI-compatible endpoint for the provider, where one is well known.
    /// `None` for OpenAI means the client default.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::Anthropic => Some("https://api.anthropic.com/v1"),
            Provider::Google => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            Provider::Mistral => Some("https://api.mistral.ai/v1"),
            _ => None,
        }
    }

    /// Environment variables that can supply a key for this provider.
    pub fn key_hint(&self) -> &'static str {
        match self {
            Provider::OpenAI => "LLM_KEY or OPENAI_API_KEY",
            Provider::Anthropic => "LLM_KEY or ANTHROPIC_API_KEY",
            _ => "LLM_KEY",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "openai"),
            Provider::Anthropic => write!(f, "anthropic"),
            Provider::Google => write!(f, "google"),
            Provider::Meta => write!(f, "meta"),
            Provider::Mistral => write!(f, "mistral"),
            Provider::Other => write!(f, "other"),
        }
    }
}

/// A model identifier split into provider and provider-local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub provider: Provider,
    /// Name sent to the provider's API.
    pub name: String,
}

impl ModelRef {
    pub fn parse(model_id: &str) -> Self {
        let model_id = model_id.trim();
        let provider = Provider::infer(model_id);

        let name = match model_id.split_once('/') {
            Some((prefix, rest)) if Provider::from_prefix(&prefix.to_lowercase()).is_some() => {
                rest.to_string()
            }
            _ => model_id.to_string(),
        };

        Self { provider, name }
    }
}

/// Resolve the API key for a provider: the generic key wins, then the provider-specific one.
pub fn api_key_for(llm: &LlmSettings, provider: Provider) -> Option<&str> {
    let specific = match provider {
        Provider::OpenAI => llm.openai_api_key.as_deref(),
        Provider::Anthropic => llm.anthropic_api_key.as_deref(),
        _ => None,
    };
    llm.api_key.as_deref().or(specific)
}
