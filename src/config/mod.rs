//! Configuration module for Reduct.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, ReducePrompts, SummaryPrompts};
pub use settings::{
    CrawlSettings, FetchSettings, GeneralSettings, LlmSettings, PromptSettings, ServerSettings,
    Settings, TranscriptionSettings, ENV_ANTHROPIC_API_KEY, ENV_LLM_BASE_URL, ENV_LLM_KEY,
    ENV_LLM_MODEL, ENV_OPENAI_API_KEY, ENV_SOURCES_DIR,
};
