//! UniFFI bindings for food-search
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::time::Duration;

use log::warn;

use crate::{FoodSearchAggregator, FoodSuggestion, ProviderKind};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible food suggestion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiFoodSuggestion {
    pub name: String,
    pub calories_per_100g: Option<f64>,
    pub image_url: Option<String>,
    pub source: String,
}

impl From<FoodSuggestion> for FfiFoodSuggestion {
    fn from(s: FoodSuggestion) -> Self {
        FfiFoodSuggestion {
            name: s.name,
            calories_per_100g: s.calories_per_100g,
            image_url: s.image_url,
            source: s.source,
        }
    }
}

/// FFI-compatible provider enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiProvider {
    OpenFoodFacts,
    Usda,
    TheMealDb,
}

impl From<FfiProvider> for ProviderKind {
    fn from(provider: FfiProvider) -> Self {
        match provider {
            FfiProvider::OpenFoodFacts => ProviderKind::OpenFoodFacts,
            FfiProvider::Usda => ProviderKind::Usda,
            FfiProvider::TheMealDb => ProviderKind::TheMealDb,
        }
    }
}

/// Configuration for a search from the mobile app
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSearchConfig {
    /// Providers in priority order (default order if empty)
    pub providers: Vec<FfiProvider>,
    /// USDA FoodData Central API key
    pub usda_api_key: Option<String>,
    /// Optional per-provider timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Optional cap on the number of returned suggestions
    pub max_results: Option<u32>,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(e) => {
            warn!("Failed to create async runtime: {}", e);
            None
        }
    }
}

fn build_aggregator(config: &FfiSearchConfig) -> Option<FoodSearchAggregator> {
    let mut builder = FoodSearchAggregator::builder();

    for provider in &config.providers {
        builder = builder.provider((*provider).into());
    }

    if let Some(key) = &config.usda_api_key {
        builder = builder.usda_api_key(key.clone());
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    match builder.build() {
        Ok(aggregator) => Some(aggregator),
        Err(e) => {
            warn!("Failed to set up food search: {}", e);
            None
        }
    }
}

/// Search all configured providers for `query`
///
/// Never fails: any setup or runtime problem yields an empty list, which the
/// app shows as "no results".
///
/// # Arguments
/// * `query` - Free-text food name typed by the user
/// * `config` - Optional provider selection and credentials
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn search_foods(query: String, config: Option<FfiSearchConfig>) -> Vec<FfiFoodSuggestion> {
    let config = config.unwrap_or_default();
    let (Some(rt), Some(aggregator)) = (create_runtime(), build_aggregator(&config)) else {
        return Vec::new();
    };

    let mut results = rt.block_on(aggregator.search(&query));
    if let Some(max) = config.max_results {
        results.truncate(max as usize);
    }
    results.into_iter().map(Into::into).collect()
}

/// Conversation identifier shared by a coach and a user
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn conversation_id_for(participant_a: String, participant_b: String) -> String {
    crate::conversation_id(&participant_a, &participant_b)
}
