//! Text reduction through the LLM.

use crate::config::Prompts;
use crate::error::Result;
use crate::llm::Completer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Default target percentage of the original length.
pub const DEFAULT_REDUCTION_LEVEL: u32 = 50;

/// Placeholder in custom prompts replaced by the reduction level.
pub const REDUCT_FACTOR_PLACEHOLDER: &str = "{REDUCT_FACTOR}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionRequest {
    pub text: String,
    #[serde(default = "default_reduction_level")]
    pub reduction_level: u32,
    #[serde(default)]
    pub prompt: Option<String>,
}

fn default_reduction_level() -> u32 {
    DEFAULT_REDUCTION_LEVEL
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionResponse {
    pub reduced_text: String,
    /// Word count of the input.
    pub original_length: usize,
    /// Word count of the output.
    pub reduced_length: usize,
    pub reduction_percentage: f64,
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `(1 - after/before) * 100` rounded to one decimal, ties to even; 0 when `before` is 0.
pub fn reduction_percentage(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    let pct = (1.0 - after as f64 / before as f64) * 100.0;
    (pct * 10.0).round_ties_even() / 10.0
}

/// Sends reduction requests to a completer and measures the result.
pub struct Reducer {
    completer: Arc<dyn Completer>,
    prompts: Prompts,
}

impl Reducer {
    pub fn new(completer: Arc<dyn Completer>, prompts: Prompts) -> Self {
        Self { completer, prompts }
    }

    pub fn model(&self) -> &str {
        self.completer.model()
    }

    /// The instruction sent for `request`: a non-empty custom prompt with
    /// `{REDUCT_FACTOR}` filled in, or the default reduction prompt.
    pub fn instruction(&self, request: &ReductionRequest) -> String {
        match request.prompt.as_deref().filter(|p| !p.is_empty()) {
            Some(custom) => {
                custom.replace(REDUCT_FACTOR_PLACEHOLDER, &request.reduction_level.to_string())
            }
            None => self.prompts.reduce_prompt(request.reduction_level),
        }
    }

    pub async fn reduce(&self, request: &ReductionRequest) -> Result<ReductionResponse> {
        let instruction = self.instruction(request);
        info!("Sending reduction prompt to LLM:\n{}", instruction);

        let reduced_text = self.completer.complete(&request.text, &instruction).await?;

        let original_length = word_count(&request.text);
        let reduced_length = word_count(&reduced_text);

        Ok(ReductionResponse {
            reduced_text,
            original_length,
            reduced_length,
            reduction_percentage: reduction_percentage(original_length, reduced_length),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ReductError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned reply and remembers the last instruction.
    pub(crate) struct StubCompleter {
        pub reply: std::result::Result<String, String>,
        pub last_instruction: Mutex<Option<String>>,
    }

    impl StubCompleter {
        pub(crate) fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                last_instruction: Mutex::new(None),
            })
        }

        pub(crate) fn failing(error: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(error.to_string()),
                last_instruction: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Completer for StubCompleter {
        async fn complete(&self, _content: &str, instruction: &str) -> Result<String> {
            *self.last_instruction.lock().unwrap() = Some(instruction.to_string());
            self.reply.clone().map_err(ReductError::Llm)
        }

        fn model(&self) -> &str {
            "stub/model"
        }
    }

    fn request(text: &str, prompt: Option<&str>) -> ReductionRequest {
        ReductionRequest {
            text: text.to_string(),
            reduction_level: DEFAULT_REDUCTION_LEVEL,
            prompt: prompt.map(String::from),
        }
    }

    #[test]
    fn test_reduction_percentage() {
        assert_eq!(reduction_percentage(0, 0), 0.0);
        assert_eq!(reduction_percentage(0, 7), 0.0);
        assert_eq!(reduction_percentage(4, 2), 50.0);
        assert_eq!(reduction_percentage(3, 1), 66.7);
        assert_eq!(reduction_percentage(2, 3), -50.0);
        assert_eq!(reduction_percentage(16, 3), 81.2);
        assert_eq!(reduction_percentage(16, 7), 56.2);
        assert_eq!(reduction_percentage(16, 17), -6.2);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  a \n b\tc  "), 3);
    }

    #[test]
    fn test_request_defaults() {
        let req: ReductionRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(req.reduction_level, 50);
        assert!(req.prompt.is_none());
    }

    #[test]
    fn test_instruction() {
        let reducer = Reducer::new(StubCompleter::replying(""), Prompts::default());

        let default = reducer.instruction(&request("x", None));
        assert!(default.starts_with("Reduce this text to approximately 50% of its original length."));

        let mut custom = request("x", Some("Cut to {REDUCT_FACTOR}%, twice: {REDUCT_FACTOR}"));
        custom.reduction_level = 30;
        assert_eq!(reducer.instruction(&custom), "Cut to 30%, twice: 30");

        // Empty custom prompt falls back to the default
        assert_eq!(reducer.instruction(&request("x", Some(""))), default);
    }

    #[tokio::test]
    async fn test_reduce_counts_words() {
        let stub = StubCompleter::replying("<p>a c</p>");
        let reducer = Reducer::new(stub.clone(), Prompts::default());

        let response = reducer.reduce(&request("a b c d", None)).await.unwrap();

        assert_eq!(response.original_length, 4);
        assert_eq!(response.reduced_length, 2);
        assert_eq!(response.reduction_percentage, 50.0);
        assert_eq!(response.reduced_text, "<p>a c</p>");
        assert!(stub.last_instruction.lock().unwrap().as_deref().unwrap().contains("50%"));
    }

    #[tokio::test]
    async fn test_reduce_empty_text() {
        let reducer = Reducer::new(StubCompleter::replying("something"), Prompts::default());
        let response = reducer.reduce(&request("   ", None)).await.unwrap();

        assert_eq!(response.original_length, 0);
        assert_eq!(response.reduction_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_reduce_propagates_llm_error() {
        let reducer = Reducer::new(StubCompleter::failing("rate limited"), Prompts::default());
        let err = reducer.reduce(&request("a b", None)).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
