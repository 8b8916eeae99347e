use crate::error::SearchError;
use crate::model::FoodSuggestion;
use crate::providers::FoodProvider;
use futures::FutureExt;
use log::{debug, error, warn};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::timeout;

/// Wraps a [`FoodProvider`] so that it can never fail.
///
/// Transport errors, bad statuses, malformed payloads, disabled credentials,
/// timeouts and panics inside the provider are logged and turned into an empty result set. The
/// aggregator only accepts isolated providers, so one outage can never abort
/// a combined search.
pub struct IsolatedProvider {
    inner: Box<dyn FoodProvider>,
    timeout: Option<Duration>,
}

impl IsolatedProvider {
    pub fn new(inner: Box<dyn FoodProvider>, timeout: Option<Duration>) -> Self {
        IsolatedProvider { inner, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the wrapped search, returning an empty vector on any failure
    pub async fn search(&self, query: &str) -> Vec<FoodSuggestion> {
        match self.try_search(query).await {
            Ok(results) => {
                debug!(
                    "{} returned {} suggestions",
                    self.provider_name(),
                    results.len()
                );
                results
            }
            Err(SearchError::ProviderDisabled(name)) => {
                debug!("Skipping disabled provider {}", name);
                Vec::new()
            }
            Err(e) if e.is_provider_unavailable() => {
                warn!("Provider {} failed: {}", self.provider_name(), e);
                Vec::new()
            }
            Err(e) => {
                error!("Provider {} failed unexpectedly: {}", self.provider_name(), e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
        let guarded = AssertUnwindSafe(self.inner.search(query)).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => timeout(limit, guarded)
                .await
                .map_err(|_| SearchError::Timeout(self.provider_name().to_string()))?,
            None => guarded.await,
        };
        outcome.map_err(|_| SearchError::Panicked(self.provider_name().to_string()))?
    }
}

impl std::fmt::Debug for IsolatedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolatedProvider")
            .field("provider", &self.provider_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubProvider {
        outcome: fn() -> Result<Vec<FoodSuggestion>, SearchError>,
        delay: Duration,
    }

    #[async_trait]
    impl FoodProvider for StubProvider {
        fn provider_name(&self) -> &str {
            "stub"
        }

        async fn search(&self, _query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
            tokio::time::sleep(self.delay).await;
            (self.outcome)()
        }
    }

    fn stub(outcome: fn() -> Result<Vec<FoodSuggestion>, SearchError>) -> Box<dyn FoodProvider> {
        Box::new(StubProvider {
            outcome,
            delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn test_passes_results_through() {
        let provider = IsolatedProvider::new(
            stub(|| Ok(vec![FoodSuggestion::new("Kiwi", "stub")])),
            None,
        );
        let results = provider.search("kiwi").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Kiwi");
    }

    #[tokio::test]
    async fn test_errors_become_empty() {
        let failures: [fn() -> Result<Vec<FoodSuggestion>, SearchError>; 3] = [
            || Err(SearchError::ProviderDisabled("stub".into())),
            || {
                Err(SearchError::Status {
                    provider: "stub".into(),
                    status: 500,
                })
            },
            || {
                Err(SearchError::Parse {
                    provider: "stub".into(),
                    message: "bad json".into(),
                })
            },
        ];

        for outcome in failures {
            let provider = IsolatedProvider::new(stub(outcome), None);
            assert!(provider.search("kiwi").await.is_empty());
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl FoodProvider for PanickingProvider {
        fn provider_name(&self) -> &str {
            "panicking"
        }

        async fn search(&self, _query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
            panic!("adapter bug");
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_empty() {
        let provider = IsolatedProvider::new(Box::new(PanickingProvider), None);
        assert!(provider.search("kiwi").await.is_empty());

        let with_timeout =
            IsolatedProvider::new(Box::new(PanickingProvider), Some(Duration::from_secs(5)));
        assert!(with_timeout.search("kiwi").await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_empty() {
        let slow = Box::new(StubProvider {
            outcome: || Ok(vec![FoodSuggestion::new("Late", "stub")]),
            delay: Duration::from_secs(30),
        });
        let provider = IsolatedProvider::new(slow, Some(Duration::from_secs(5)));
        assert!(provider.search("kiwi").await.is_empty());
    }

    #[test]
    fn test_debug_names_provider() {
        let provider = IsolatedProvider::new(stub(|| Ok(vec![])), Some(Duration::from_secs(1)));
        let rendered = format!("{:?}", provider);
        assert!(rendered.contains("stub"));
        assert_eq!(provider.timeout(), Some(Duration::from_secs(1)));
    }
}
