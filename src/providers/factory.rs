use crate::config::{ProviderConfig, SearchConfig};
use crate::error::SearchError;
use crate::model::ProviderKind;
use crate::providers::{
    FoodProvider, IsolatedProvider, OpenFoodFactsProvider, TheMealDbProvider, UsdaProvider,
};
use log::{info, warn};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn FoodProvider>, SearchError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(SearchError::ProviderDisabled(provider_name.to_string()));
        }

        let kind: ProviderKind = provider_name
            .parse()
            .map_err(|_| SearchError::UnknownProvider(provider_name.to_string()))?;

        let provider: Box<dyn FoodProvider> = match kind {
            ProviderKind::OpenFoodFacts => Box::new(OpenFoodFactsProvider::new(config, timeout)?),
            ProviderKind::Usda => Box::new(UsdaProvider::new(config, timeout)?),
            ProviderKind::TheMealDb => Box::new(TheMealDbProvider::new(config, timeout)?),
        };
        Ok(provider)
    }

    /// Build the isolated provider chain in `config.order`
    ///
    /// Providers switched off in configuration are left out. Unknown names
    /// are a configuration error.
    pub fn from_config(config: &SearchConfig) -> Result<Vec<IsolatedProvider>, SearchError> {
        let timeout = config.provider_timeout();
        let mut providers = Vec::new();

        for provider_name in &config.order {
            match Self::create(provider_name, &config.provider(provider_name), timeout) {
                Ok(provider) => {
                    info!("Added '{}' to search providers", provider_name);
                    providers.push(IsolatedProvider::new(provider, timeout));
                }
                Err(SearchError::ProviderDisabled(name)) => {
                    warn!("Provider '{}' is disabled in configuration", name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(providers)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        ProviderKind::default_order()
            .into_iter()
            .map(|kind| kind.as_str())
            .collect()
    }
}
