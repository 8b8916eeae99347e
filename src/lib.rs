//! Food-name search across public nutrition APIs.
//!
//! A query is sent concurrently to Open Food Facts, USDA FoodData Central and
//! TheMealDB. Their answers are normalized into [`FoodSuggestion`]s, merged in
//! provider priority order and deduplicated by name. A provider that fails
//! simply contributes nothing.
//!
//! ```no_run
//! # async fn demo() {
//! let suggestions = food_search::search_all_food_apis("pomme").await;
//! for s in suggestions {
//!     println!("{} ({:?} kcal/100g) via {}", s.name, s.calories_per_100g, s.source);
//! }
//! # }
//! ```

pub mod aggregator;
pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod session;
pub mod store;
pub mod uniffi_bindings;

pub use aggregator::{dedup_by_name, FoodSearchAggregator};
pub use builder::FoodSearchBuilder;
pub use crate::config::{load_config, ProviderConfig, SearchConfig};
pub use error::{SearchError, StoreError};
pub use model::{ChatMessage, DaySummary, FoodSuggestion, MealEntry, MealSlot, ProviderKind};
pub use providers::{FoodProvider, IsolatedProvider, ProviderFactory};
pub use session::{SearchOutcome, SearchSession, SearchTicket, SessionConfig};
pub use store::{conversation_id, MealLogReader, MealLogWriter, MemoryStore, MessageStore};

use log::warn;

/// Aggregator built from `food_search.toml` and `FOOD_SEARCH__*` variables,
/// falling back to the built-in defaults when no usable configuration exists.
pub fn default_aggregator() -> FoodSearchAggregator {
    let config = SearchConfig::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable search configuration: {}", e);
        SearchConfig::default()
    });

    FoodSearchAggregator::from_config(&config).unwrap_or_else(|e| {
        warn!("Falling back to default providers: {}", e);
        FoodSearchAggregator::from_config(&SearchConfig::default()).unwrap_or_else(|_| {
            // Only reachable if the HTTP client itself cannot be constructed
            FoodSearchAggregator::new(Vec::new())
        })
    })
}

/// Search every configured provider for `query`.
///
/// Never fails: provider outages show up as fewer (or no) suggestions.
pub async fn search_all_food_apis(query: &str) -> Vec<FoodSuggestion> {
    default_aggregator().search(query).await
}
