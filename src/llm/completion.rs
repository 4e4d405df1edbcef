//! Chat completion.

use super::{completion_client, ModelRef};
use crate::config::{LlmSettings, ENV_LLM_MODEL};
use crate::error::{ReductError, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Transforms content according to an instruction.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Send `content` to the model with `instruction` as the system prompt.
    async fn complete(&self, content: &str, instruction: &str) -> Result<String>;

    /// The model identifier as configured.
    fn model(&self) -> &str;
}

/// Completer backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAICompleter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model_id: String,
    model: ModelRef,
}

impl OpenAICompleter {
    /// Build a completer from LLM settings.
    ///
    /// Fails when no model is configured or no key is available for its provider.
    pub fn from_settings(llm: &LlmSettings) -> Result<Self> {
        let model_id = llm.model.clone().ok_or_else(|| {
            ReductError::Config(format!("{} environment variable not set", ENV_LLM_MODEL))
        })?;
        let model = ModelRef::parse(&model_id);
        let client = completion_client(llm, &model)?;

        Ok(Self {
            client,
            model_id,
            model,
        })
    }
}

#[async_trait]
impl Completer for OpenAICompleter {
    #[instrument(skip(self, content, instruction), fields(model = %self.model_id))]
    async fn complete(&self, content: &str, instruction: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instruction.to_string())
                .build()
                .map_err(|e| ReductError::Llm(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(content.to_string())
                .build()
                .map_err(|e| ReductError::Llm(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model.name)
            .messages(messages)
            .build()
            .map_err(|e| ReductError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ReductError::Llm(format!("Completion request failed: {}", e)))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| ReductError::Llm("Empty response from LLM".to_string()))?
            .clone();

        debug!("Received {} characters from {}", text.len(), self.model_id);
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_model() {
        let llm = LlmSettings {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let err = OpenAICompleter::from_settings(&llm).err().unwrap();
        assert!(err.to_string().contains("LLM_MODEL"));
    }

    #[test]
    fn test_keeps_configured_model_id() {
        let llm = LlmSettings {
            model: Some("openai/gpt-4o-mini".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let completer = OpenAICompleter::from_settings(&llm).unwrap();
        assert_eq!(completer.model(), "openai/gpt-4o-mini");
        assert_eq!(completer.model.name, "gpt-4o-mini");
    }
}
