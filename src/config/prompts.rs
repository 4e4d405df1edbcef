//! Prompt templates for Reduct.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub reduce: ReducePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for summarizing stored source content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: r#"Summarize the following content.

Start with a one-paragraph overview, then list the key points as Markdown bullets.
Keep names, numbers, and technical terms exactly as they appear.
Do not add information that is not present in the content.
Output only the summary, without any introduction or commentary."#
                .to_string(),
        }
    }
}

/// Prompts for the text reduction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducePrompts {
    /// Default instruction; `{{level}}` is the target percentage.
    pub default: String,
}

impl Default for ReducePrompts {
    fn default() -> Self {
        Self {
            default: "Reduce this text to approximately {{level}}% of its original length. \
Remove filler, redundancy, and verbose explanations while retaining all meaningful semantic content, \
key points, and factual information. Maintain the original tone and style. \
Output as clean HTML using these tags: <p>, <ul>, <ol>, <li>, <strong>, <em>, <h3>, <blockquote>, <details>, <summary>. \
Use <details><summary>Title</summary>content</details> for less important information. \
IMPORTANT: Output ONLY the HTML without any introduction, wrapper tags, or commentary."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let reduce_path = custom_path.join("reduce.toml");
            if reduce_path.exists() {
                let content = std::fs::read_to_string(&reduce_path)?;
                prompts.reduce = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The summary instruction with custom variables applied.
    pub fn summary_prompt(&self) -> String {
        self.render_with_custom(&self.summary.system, &HashMap::new())
    }

    /// The default reduction instruction for the given target percentage.
    pub fn reduce_prompt(&self, level: u32) -> String {
        let mut vars = HashMap::new();
        vars.insert("level".to_string(), level.to_string());
        self.render_with_custom(&self.reduce.default, &vars)
    }
}
