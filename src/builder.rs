use std::collections::HashMap;
use std::time::Duration;

use crate::aggregator::FoodSearchAggregator;
use crate::config::{ProviderConfig, SearchConfig};
use crate::error::SearchError;
use crate::model::ProviderKind;
use crate::providers::{IsolatedProvider, ProviderFactory};

/// Builder for assembling a [`FoodSearchAggregator`] in code
///
/// Providers are queried in the order they are added. If none are added the
/// default order (Open Food Facts, USDA, TheMealDB) is used.
#[derive(Debug, Default)]
pub struct FoodSearchBuilder {
    providers: Vec<ProviderKind>,
    overrides: HashMap<ProviderKind, ProviderConfig>,
    timeout: Option<Duration>,
    no_timeout: bool,
}

impl FoodSearchAggregator {
    pub fn builder() -> FoodSearchBuilder {
        FoodSearchBuilder::default()
    }
}

impl FoodSearchBuilder {
    /// Append a provider to the priority order
    ///
    /// # Example
    /// ```
    /// use food_search::{FoodSearchAggregator, ProviderKind};
    ///
    /// let builder = FoodSearchAggregator::builder()
    ///     .provider(ProviderKind::TheMealDb)
    ///     .provider(ProviderKind::OpenFoodFacts);
    /// ```
    pub fn provider(mut self, kind: ProviderKind) -> Self {
        if !self.providers.contains(&kind) {
            self.providers.push(kind);
        }
        self
    }

    /// Set the USDA FoodData Central API key
    ///
    /// Without a key (or with the shared `DEMO_KEY`) USDA contributes no
    /// results.
    pub fn usda_api_key(mut self, key: impl Into<String>) -> Self {
        self.entry(ProviderKind::Usda).api_key = Some(key.into());
        self
    }

    /// Point a provider at a different host, e.g. a proxy or a mock server
    pub fn base_url(mut self, kind: ProviderKind, url: impl Into<String>) -> Self {
        self.entry(kind).base_url = Some(url.into());
        self
    }

    /// Number of results requested from each provider that supports paging
    pub fn page_size(mut self, size: u32) -> Self {
        for kind in ProviderKind::default_order() {
            self.entry(kind).page_size = Some(size);
        }
        self
    }

    /// Set a per-provider timeout
    ///
    /// # Example
    /// ```
    /// use food_search::FoodSearchAggregator;
    /// use std::time::Duration;
    ///
    /// let builder = FoodSearchAggregator::builder()
    ///     .timeout(Duration::from_secs(3));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self.no_timeout = false;
        self
    }

    /// Let providers take as long as they need
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self.no_timeout = true;
        self
    }

    fn entry(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        self.overrides.entry(kind).or_default()
    }

    fn effective_timeout(&self) -> Option<Duration> {
        if self.no_timeout {
            None
        } else {
            self.timeout.or_else(|| SearchConfig::default().provider_timeout())
        }
    }

    /// Build the aggregator
    pub fn build(self) -> Result<FoodSearchAggregator, SearchError> {
        let timeout = self.effective_timeout();
        let order = if self.providers.is_empty() {
            ProviderKind::default_order()
        } else {
            self.providers.clone()
        };

        let providers = order
            .iter()
            .map(|kind| {
                let config = self.overrides.get(kind).cloned().unwrap_or_default();
                let provider = ProviderFactory::create(kind.as_str(), &config, timeout)?;
                Ok(IsolatedProvider::new(provider, timeout))
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        Ok(FoodSearchAggregator::new(providers))
    }
}
