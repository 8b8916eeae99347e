mod factory;
mod isolated;
mod open_food_facts;
mod themealdb;
mod usda;

pub use factory::ProviderFactory;
pub use isolated::IsolatedProvider;
pub use open_food_facts::OpenFoodFactsProvider;
pub use themealdb::TheMealDbProvider;
pub use usda::UsdaProvider;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::SearchError;
use crate::model::FoodSuggestion;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;
const USER_AGENT: &str = "food-search/0.3 (calorie tracker autocomplete)";

/// Unified trait for all nutrition search providers
///
/// Implementations make exactly one HTTP request per call and report every
/// failure as an error. Wrap them in an [`IsolatedProvider`] before handing
/// them to the aggregator so a failing provider only ever yields no results.
#[async_trait]
pub trait FoodProvider: Send + Sync {
    /// Get the provider name (e.g., "openfoodfacts", "usda")
    fn provider_name(&self) -> &str;

    /// Search foods by free-text name
    async fn search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError>;
}

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, SearchError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Send a request and decode its JSON body, mapping non-2xx statuses and
/// undecodable payloads to provider errors.
pub(crate) async fn fetch_json(
    request: RequestBuilder,
    provider: &str,
) -> Result<Value, SearchError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body).map_err(|e| SearchError::Parse {
        provider: provider.to_string(),
        message: e.to_string(),
    })?;
    debug!("{} responded with {} bytes", provider, body.len());
    Ok(value)
}

/// Elements of `value[key]`, treating a missing key or `null` as no results
pub(crate) fn result_array<'a>(
    value: &'a Value,
    key: &str,
    provider: &str,
) -> Result<&'a [Value], SearchError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(SearchError::Parse {
            provider: provider.to_string(),
            message: format!("expected '{}' to be an array, got {}", key, other),
        }),
    }
}

/// Non-empty string field
pub(crate) fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numeric field that some providers send as a string
pub(crate) fn number_field(item: &Value, key: &str) -> Option<f64> {
    let value = match item.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v: &f64| v.is_finite())
}
