//! Model discovery across configured providers.

use super::{api_key_for, create_client, Provider};
use crate::config::LlmSettings;
use crate::error::{ReductError, Result};
use futures::future::join_all;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

const ANTHROPIC_MODELS_URL: &str = "https://api.anthropic.com/v1/models?limit=1000";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Model identifiers grouped by inferred provider.
#[derive(Debug, Default)]
pub struct ModelListing {
    pub groups: BTreeMap<Provider, Vec<String>>,
    /// Endpoints that could not be queried.
    pub errors: Vec<(String, String)>,
}

impl ModelListing {
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

type ModelFuture = Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send>>;

#[derive(Deserialize)]
struct AnthropicModels {
    data: Vec<AnthropicModel>,
}

#[derive(Deserialize)]
struct AnthropicModel {
    id: String,
}

/// Query every provider that has credentials and group the returned model ids.
///
/// A provider that fails to answer is recorded in `errors` rather than failing the listing.
pub async fn list_models(llm: &LlmSettings, filter: Option<&str>) -> ModelListing {
    let mut lookups: Vec<(String, ModelFuture)> = Vec::new();

    if let Some(key) = api_key_for(llm, Provider::OpenAI) {
        lookups.push(("openai".to_string(), fetch_openai_compatible(key.to_string(), None)));
    }

    if let Some(key) = api_key_for(llm, Provider::Anthropic) {
        let fut: ModelFuture = Box::pin(fetch_anthropic(key.to_string()));
        lookups.push(("anthropic".to_string(), fut));
    }

    if let (Some(base), Some(key)) = (llm.base_url.as_deref(), llm.api_key.as_deref()) {
        lookups.push((
            base.to_string(),
            fetch_openai_compatible(key.to_string(), Some(base.to_string())),
        ));
    }

    let labels: Vec<String> = lookups.iter().map(|(label, _)| label.clone()).collect();
    let results = join_all(lookups.into_iter().map(|(_, fut)| fut)).await;

    let mut ids = Vec::new();
    let mut errors = Vec::new();
    for (label, result) in labels.into_iter().zip(results) {
        match result {
            Ok(found) => {
                debug!("{} returned {} models", label, found.len());
                ids.extend(found);
            }
            Err(e) => {
                warn!("Failed to list models from {}: {}", label, e);
                errors.push((label, e.to_string()));
            }
        }
    }

    ModelListing {
        groups: group_models(ids, filter),
        errors,
    }
}

fn fetch_openai_compatible(key: String, base: Option<String>) -> ModelFuture {
    Box::pin(async move {
        let client = create_client(&key, base.as_deref());
        let response = client
            .models()
            .list()
            .await
            .map_err(|e| ReductError::Llm(e.to_string()))?;
        Ok(response.data.into_iter().map(|m| m.id).collect())
    })
}

async fn fetch_anthropic(key: String) -> Result<Vec<String>> {
    let response = reqwest::Client::new()
        .get(ANTHROPIC_MODELS_URL)
        .header("x-api-key", key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .send()
        .await?
        .error_for_status()?;

    let models: AnthropicModels = response.json().await?;
    Ok(models.data.into_iter().map(|m| m.id).collect())
}

/// Group model ids by inferred provider, qualifying bare ids with the provider
/// prefix, applying a case-insensitive substring filter, sorted and deduplicated.
pub fn group_models<I>(ids: I, filter: Option<&str>) -> BTreeMap<Provider, Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let filter = filter.map(|f| f.to_lowercase());
    let mut groups: BTreeMap<Provider, Vec<String>> = BTreeMap::new();

    for id in ids {
        let provider = Provider::infer(&id);
        let qualified = match provider {
            Provider::Other => id,
            _ if id.contains('/') => id,
            _ => format!("{}/{}", provider, id),
        };

        if let Some(f) = &filter {
            if !qualified.to_lowercase().contains(f.as_str()) {
                continue;
            }
        }

        groups.entry(provider).or_default().push(qualified);
    }

    for models in groups.values_mut() {
        models.sort();
        models.dedup();
    }

    groups
}
