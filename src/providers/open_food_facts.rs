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

const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Open Food Facts product search. No credential required.
pub struct OpenFoodFactsProvider {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl OpenFoodFactsProvider {
    /// Create a new Open Food Facts provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Option<Duration>) -> Result<Self, SearchError> {
        Ok(OpenFoodFactsProvider {
            client: build_client(timeout)?,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            page_size: config.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        OpenFoodFactsProvider {
            client: Client::new(),
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn to_suggestion(item: &Value) -> Option<FoodSuggestion> {
        let name = string_field(item, "product_name")?;
        let mut suggestion = FoodSuggestion::new(name, ProviderKind::OpenFoodFacts.as_str());
        if let Some(kcal) = item
            .get("nutriments")
            .and_then(|n| number_field(n, "energy-kcal_100g"))
        {
            suggestion = suggestion.with_calories(kcal.round());
        }
        if let Some(image) = string_field(item, "image_url") {
            suggestion = suggestion.with_image(image);
        }
        Some(suggestion)
    }
}

#[async_trait]
impl FoodProvider for OpenFoodFactsProvider {
    fn provider_name(&self) -> &str {
        ProviderKind::OpenFoodFacts.as_str()
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
        let page_size = self.page_size.to_string();
        let request = self
            .client
            .get(format!("{}/cgi/search.pl", self.base_url))
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ]);

        let body = fetch_json(request, self.provider_name()).await?;
        let products = result_array(&body, "products", self.provider_name())?;
        let suggestions: Vec<_> = products.iter().filter_map(Self::to_suggestion).collect();
        debug!(
            "openfoodfacts: {} of {} products usable",
            suggestions.len(),
            products.len()
        );
        Ok(suggestions)
    }
}
