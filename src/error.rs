use thiserror::Error;

/// Errors produced while searching nutrition providers.
///
/// `Http`, `Status`, `Parse`, `ProviderDisabled`, `Timeout` and `Panicked`
/// describe a provider being unavailable. They never escape an
/// [`IsolatedProvider`](crate::providers::IsolatedProvider); the remaining
/// variants are construction-time errors.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure talking to a provider
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status code
    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    /// Provider payload could not be decoded
    #[error("Malformed response from {provider}: {message}")]
    Parse { provider: String, message: String },

    /// Provider has no usable credential or was switched off
    #[error("Provider '{0}' is disabled")]
    ProviderDisabled(String),

    /// Provider did not answer within the configured timeout
    #[error("Provider '{0}' timed out")]
    Timeout(String),

    /// Provider panicked while searching
    #[error("Provider '{0}' panicked")]
    Panicked(String),

    /// Provider name not known to the factory
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SearchError {
    /// Whether this error means "provider unavailable" rather than a
    /// programming or configuration mistake.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            SearchError::Http(_)
                | SearchError::Status { .. }
                | SearchError::Parse { .. }
                | SearchError::ProviderDisabled(_)
                | SearchError::Timeout(_)
                | SearchError::Panicked(_)
        )
    }
}

/// Errors returned by the meal log and message stores
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input rejected before it reached the store
    #[error("Invalid input: {0}")]
    Invalid(String),
}
