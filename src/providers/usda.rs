use crate::config::ProviderConfig;
use crate::error::SearchError;
use crate::model::{FoodSuggestion, ProviderKind};
use crate::providers::{
    build_client, fetch_json, number_field, result_array, string_field, FoodProvider,
    DEFAULT_PAGE_SIZE,
};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov";

/// Shared demo key handed out by data.gov; treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "DEMO_KEY";

/// USDA FoodData Central search.
///
/// Needs a personal API key. Without one the provider stays disabled and
/// answers every search with [`SearchError::ProviderDisabled`] without
/// touching the network.
pub struct UsdaProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    page_size: u32,
}

impl UsdaProvider {
    /// Create a new USDA provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Option<Duration>) -> Result<Self, SearchError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("USDA_API_KEY").ok());

        Ok(UsdaProvider {
            client: build_client(timeout)?,
            api_key: usable_key(api_key),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_size: config.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        UsdaProvider {
            client: Client::new(),
            api_key: usable_key(api_key),
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn to_suggestion(item: &Value) -> Option<FoodSuggestion> {
        let name = string_field(item, "description")?;
        let mut suggestion = FoodSuggestion::new(name, ProviderKind::Usda.as_str());
        if let Some(kcal) = energy_kcal(item) {
            suggestion = suggestion.with_calories(kcal);
        }
        Some(suggestion)
    }
}

fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

/// First "Energy" nutrient reported in kilocalories
fn energy_kcal(item: &Value) -> Option<f64> {
    item.get("foodNutrients")?
        .as_array()?
        .iter()
        .find(|n| {
            n.get("nutrientName").and_then(Value::as_str) == Some("Energy")
                && n.get("unitName").and_then(Value::as_str) == Some("KCAL")
        })
        .and_then(|n| number_field(n, "value"))
}

#[async_trait]
impl FoodProvider for UsdaProvider {
    fn provider_name(&self) -> &str {
        ProviderKind::Usda.as_str()
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SearchError::ProviderDisabled(
                self.provider_name().to_string(),
            ));
        };

        let page_size = self.page_size.to_string();
        let request = self
            .client
            .get(format!("{}/fdc/v1/foods/search", self.base_url))
            .query(&[
                ("query", query),
                ("api_key", api_key),
                ("pageSize", page_size.as_str()),
            ]);

        let body = fetch_json(request, self.provider_name()).await?;
        let foods = result_array(&body, "foods", self.provider_name())?;
        let suggestions: Vec<_> = foods.iter().filter_map(Self::to_suggestion).collect();
        debug!("usda: {} of {} foods usable", suggestions.len(), foods.len());
        Ok(suggestions)
    }
}
