//! Concurrent fan-out over every configured provider, merged in priority
//! order and deduplicated by name.

use std::collections::HashSet;

use futures::future::join_all;
use log::{debug, info};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::model::FoodSuggestion;
use crate::providers::{IsolatedProvider, ProviderFactory};

/// Combines the results of several isolated providers.
///
/// Provider order is priority order: when two providers return the same
/// food name, the entry from the provider listed first is kept as-is.
#[derive(Debug)]
pub struct FoodSearchAggregator {
    providers: Vec<IsolatedProvider>,
}

impl FoodSearchAggregator {
    pub fn new(providers: Vec<IsolatedProvider>) -> Self {
        FoodSearchAggregator { providers }
    }

    /// Build the provider chain described by `config`
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::new(ProviderFactory::from_config(config)?))
    }

    pub fn providers(&self) -> &[IsolatedProvider] {
        &self.providers
    }

    /// Search every provider and merge the results.
    ///
    /// All providers run concurrently and are awaited to completion before
    /// merging, so the output order depends only on provider priority and
    /// never on which response arrived first. The query is passed through
    /// untouched; length checks belong to the caller.
    pub async fn search(&self, query: &str) -> Vec<FoodSuggestion> {
        let outcomes = join_all(self.providers.iter().map(|p| p.search(query))).await;

        let total: usize = outcomes.iter().map(Vec::len).sum();
        let merged = dedup_by_name(outcomes.into_iter().flatten());
        info!(
            "Food search merged {} suggestions from {} providers into {}",
            total,
            self.providers.len(),
            merged.len()
        );
        merged
    }
}

/// Drop nameless entries and keep only the first entry per name.
///
/// Names are compared after trimming surrounding whitespace and folding
/// case. Later duplicates are discarded whole; their fields are never merged
/// into the kept entry.
pub fn dedup_by_name(suggestions: impl IntoIterator<Item = FoodSuggestion>) -> Vec<FoodSuggestion> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| {
            if !s.has_name() {
                debug!("Dropping nameless suggestion from {}", s.source);
                return false;
            }
            seen.insert(s.dedup_key())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_first_seen_wins() {
        let input = vec![
            FoodSuggestion::new("Apple", "a"),
            FoodSuggestion::new("APPLE", "b").with_calories(52.0),
            FoodSuggestion::new(" apple ", "c").with_image("https://img/apple.png"),
            FoodSuggestion::new("Pear", "b"),
        ];

        let output = dedup_by_name(input);
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].source, "a");
        assert_eq!(output[0].calories_per_100g, None);
        assert_eq!(output[0].image_url, None);
        assert_eq!(output[1].name, "Pear");
    }

    #[test]
    fn test_dedup_drops_empty_names() {
        let input = vec![
            FoodSuggestion::new("", "a"),
            FoodSuggestion::new("  ", "a"),
            FoodSuggestion::new("Rice", "b"),
        ];
        let output = dedup_by_name(input);
        assert_eq!(output, vec![FoodSuggestion::new("Rice", "b")]);
    }

    #[test]
    fn test_dedup_keeps_near_duplicates() {
        let input = vec![
            FoodSuggestion::new("Apple", "a"),
            FoodSuggestion::new("Apple, raw", "b"),
        ];
        assert_eq!(dedup_by_name(input).len(), 2);
    }

    #[test]
    fn test_dedup_empty_input() {
        assert!(dedup_by_name(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_no_providers_yields_empty() {
        let aggregator = FoodSearchAggregator::new(Vec::new());
        assert!(aggregator.search("apple").await.is_empty());
    }
}
