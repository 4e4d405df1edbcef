//! LLM configuration health.

use crate::config::{LlmSettings, ENV_LLM_MODEL};
use serde::Serialize;

/// Whether an LLM can be called with the current configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Health {
    Healthy { model: String },
    Unhealthy { error: String },
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Health::Healthy { .. })
    }
}

/// Check that a model is configured and a key exists for it.
///
/// Provider-specific keys are only required for `openai/` and `anthropic/`
/// prefixed models when no generic key is set.
pub fn check_health(llm: &LlmSettings) -> Health {
    let Some(model) = llm.model.as_deref().filter(|m| !m.is_empty()) else {
        return Health::Unhealthy {
            error: format!("{} environment variable not set", ENV_LLM_MODEL),
        };
    };

    if llm.api_key.is_none() {
        if model.starts_with("anthropic/") && llm.anthropic_api_key.is_none() {
            return Health::Unhealthy {
                error: "LLM_KEY or ANTHROPIC_API_KEY not set".to_string(),
            };
        }
        if model.starts_with("openai/") && llm.openai_api_key.is_none() {
            return Health::Unhealthy {
                error: "LLM_KEY or OPENAI_API_KEY not set".to_string(),
            };
        }
    }

    Health::Healthy {
        model: model.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model() {
        let health = check_health(&LlmSettings::default());
        assert_eq!(
            health,
            Health::Unhealthy {
                error: "LLM_MODEL environment variable not set".to_string()
            }
        );
    }

    #[test]
    fn test_provider_key_required() {
        let llm = LlmSettings {
            model: Some("anthropic/claude-3-haiku-20240307".to_string()),
            openai_api_key: Some("sk-openai".to_string()),
            ..Default::default()
        };
        match check_health(&llm) {
            Health::Unhealthy { error } => assert!(error.contains("ANTHROPIC_API_KEY")),
            other => panic!("expected unhealthy, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_key_is_enough() {
        let llm = LlmSettings {
            model: Some("openai/gpt-4o-mini".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(check_health(&llm).is_healthy());
    }

    #[test]
    fn test_serialized_shape() {
        let healthy = Health::Healthy {
            model: "gpt-4o-mini".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&healthy).unwrap(),
            serde_json::json!({ "status": "healthy", "model": "gpt-4o-mini" })
        );

        let unhealthy = Health::Unhealthy {
            error: "nope".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&unhealthy).unwrap(),
            serde_json::json!({ "status": "unhealthy", "error": "nope" })
        );
    }
}
