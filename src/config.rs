use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Main search configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider priority order (first wins on duplicate names)
    #[serde(default = "default_order")]
    pub order: Vec<String>,
    /// Per-provider timeout in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Minimum query length before a session search hits the providers
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Configuration for a specific nutrition provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// API key for authentication (USDA only)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for proxies and tests)
    pub base_url: Option<String>,
    /// Number of results requested from the provider
    pub page_size: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            base_url: None,
            page_size: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            order: default_order(),
            timeout: default_timeout(),
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

// Default value functions
fn default_enabled() -> bool {
    true
}

fn default_order() -> Vec<String> {
    vec![
        "openfoodfacts".to_string(),
        "usda".to_string(),
        "themealdb".to_string(),
    ]
}

fn default_timeout() -> u64 {
    10
}

fn default_min_query_len() -> usize {
    2
}

fn default_debounce_ms() -> u64 {
    400
}

impl SearchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FOOD_SEARCH__ prefix
    /// 2. food_search.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FOOD_SEARCH__PROVIDERS__USDA__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Settings for `name`, falling back to an enabled default entry
    pub fn provider(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }

    /// Per-provider timeout, `None` when disabled
    pub fn provider_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Load configuration from file and environment variables
///
/// See [`SearchConfig::load`] for the source priority.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("food_search").required(false))
        // Use double underscore for nested: FOOD_SEARCH__PROVIDERS__USDA__API_KEY
        .add_source(
            Environment::with_prefix("FOOD_SEARCH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("order"),
        )
        .build()?;

    settings.try_deserialize()
}
