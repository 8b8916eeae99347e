use crate::config::ProviderConfig;
use crate::error::SearchError;
use crate::model::{FoodSuggestion, ProviderKind};
use crate::providers::{build_client, fetch_json, result_array, string_field, FoodProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.themealdb.com";

/// TheMealDB dish search. Free test key baked into the path, no calories.
pub struct TheMealDbProvider {
    client: Client,
    base_url: String,
}

impl TheMealDbProvider {
    pub fn new(config: &ProviderConfig, timeout: Option<Duration>) -> Result<Self, SearchError> {
        Ok(TheMealDbProvider {
            client: build_client(timeout)?,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        TheMealDbProvider {
            client: Client::new(),
            base_url,
        }
    }

    fn to_suggestion(item: &Value) -> Option<FoodSuggestion> {
        let name = string_field(item, "strMeal")?;
        let mut suggestion = FoodSuggestion::new(name, ProviderKind::TheMealDb.as_str());
        if let Some(thumb) = string_field(item, "strMealThumb") {
            suggestion = suggestion.with_image(thumb);
        }
        Some(suggestion)
    }
}

#[async_trait]
impl FoodProvider for TheMealDbProvider {
    fn provider_name(&self) -> &str {
        ProviderKind::TheMealDb.as_str()
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
        let request = self
            .client
            .get(format!("{}/api/json/v1/1/search.php", self.base_url))
            .query(&[("s", query)]);

        let body = fetch_json(request, self.provider_name()).await?;
        // "meals": null is how the API says "nothing found"
        let meals = result_array(&body, "meals", self.provider_name())?;
        let suggestions: Vec<_> = meals.iter().filter_map(Self::to_suggestion).collect();
        debug!("themealdb: {} meals", suggestions.len());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_search() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/json/v1/1/search.php")
            .match_query(Matcher::UrlEncoded("s".into(), "apple pie".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"meals": [
                    {"idMeal": "52893", "strMeal": "Apple & Blackberry Crumble",
                     "strMealThumb": "https://www.themealdb.com/images/media/meals/xvsurr1511719182.jpg"},
                    {"idMeal": "1", "strMeal": null}
                ]}"#,
            )
            .create_async()
            .await;

        let provider = TheMealDbProvider::with_base_url(server.url());
        let results = provider.search("apple pie").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Apple & Blackberry Crumble");
        assert_eq!(results[0].calories_per_100g, None);
        assert!(results[0].image_url.as_deref().unwrap().ends_with(".jpg"));
        assert_eq!(results[0].source, "themealdb");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_null_meals() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/json/v1/1/search.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let provider = TheMealDbProvider::with_base_url(server.url());
        assert!(provider.search("xyzzy").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 9 of localhost in the test environment
        let provider = TheMealDbProvider::with_base_url("http://127.0.0.1:9".to_string());
        let err = provider.search("soup").await.unwrap_err();
        assert!(matches!(err, SearchError::Http(_)));
    }
}
