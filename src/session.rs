//! Caller-side guard around the aggregator: minimum query length, debounce
//! and discarding of superseded searches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::time::sleep;

use crate::aggregator::FoodSearchAggregator;
use crate::config::SearchConfig;
use crate::model::FoodSuggestion;

/// Timing and gating knobs for a [`SearchSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Queries shorter than this (in chars, after trimming) never search
    pub min_query_len: usize,
    /// Quiet period to wait before a search actually starts
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            min_query_len: 2,
            debounce: Duration::from_millis(400),
        }
    }
}

impl From<&SearchConfig> for SessionConfig {
    fn from(config: &SearchConfig) -> Self {
        SessionConfig {
            min_query_len: config.min_query_len,
            debounce: config.debounce(),
        }
    }
}

/// Token identifying one search request within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What a session search produced
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Query below the minimum length; the UI should clear its list
    TooShort,
    /// A newer search was started; this result must not be shown
    Superseded,
    /// Fresh results for the latest query
    Results(Vec<FoodSuggestion>),
}

impl SearchOutcome {
    /// Results to display, `None` when the outcome is stale.
    pub fn into_results(self) -> Option<Vec<FoodSuggestion>> {
        match self {
            SearchOutcome::TooShort => Some(Vec::new()),
            SearchOutcome::Superseded => None,
            SearchOutcome::Results(results) => Some(results),
        }
    }
}

/// Autocomplete session for a single search box.
///
/// Every call to [`SearchSession::search`] takes a new ticket. A search only
/// reports results if its ticket is still the latest one when it finishes,
/// so a slow response for "ap" can never overwrite results for "apple".
/// Clones share the same ticket counter.
#[derive(Debug, Clone)]
pub struct SearchSession {
    aggregator: Arc<FoodSearchAggregator>,
    config: SessionConfig,
    latest: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new(aggregator: Arc<FoodSearchAggregator>, config: SessionConfig) -> Self {
        SearchSession {
            aggregator,
            config,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Issue a new ticket, superseding every earlier one
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Debounced, staleness-guarded search for `query`
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.begin();

        if query.trim().chars().count() < self.config.min_query_len {
            return SearchOutcome::TooShort;
        }

        if !self.config.debounce.is_zero() {
            sleep(self.config.debounce).await;
            if !self.is_current(&ticket) {
                debug!("Search #{} superseded during debounce", ticket.0);
                return SearchOutcome::Superseded;
            }
        }

        let results = self.aggregator.search(query).await;
        if !self.is_current(&ticket) {
            debug!("Search #{} superseded while in flight", ticket.0);
            return SearchOutcome::Superseded;
        }
        SearchOutcome::Results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::providers::{FoodProvider, IsolatedProvider};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl FoodProvider for CountingProvider {
        fn provider_name(&self) -> &str {
            "counting"
        }

        async fn search(&self, query: &str) -> Result<Vec<FoodSuggestion>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            sleep(self.delay).await;
            Ok(vec![FoodSuggestion::new(query, "counting")])
        }
    }

    fn session(delay: Duration) -> (SearchSession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
            delay,
        };
        let aggregator = FoodSearchAggregator::new(vec![IsolatedProvider::new(
            Box::new(provider),
            None,
        )]);
        (
            SearchSession::new(Arc::new(aggregator), SessionConfig::default()),
            calls,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_searches() {
        let (session, calls) = session(Duration::ZERO);
        assert_eq!(session.search("a").await, SearchOutcome::TooShort);
        assert_eq!(session.search("  b  ").await, SearchOutcome::TooShort);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(SearchOutcome::TooShort.into_results(), Some(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_search_returns_results() {
        let (session, calls) = session(Duration::ZERO);
        let outcome = session.search("kiwi").await;
        assert_eq!(
            outcome.into_results(),
            Some(vec![FoodSuggestion::new("kiwi", "counting")])
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_is_debounced() {
        let (session, calls) = session(Duration::ZERO);

        let first = session.clone();
        let early = tokio::spawn(async move { first.search("ap").await });
        sleep(Duration::from_millis(100)).await;
        let late = session.search("apple").await;

        assert_eq!(early.await.unwrap(), SearchOutcome::Superseded);
        assert_eq!(
            late,
            SearchOutcome::Results(vec![FoodSuggestion::new("apple", "counting")])
        );
        // "ap" was dropped before it reached the providers
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_is_discarded() {
        let (session, calls) = session(Duration::from_secs(2));

        let first = session.clone();
        let early = tokio::spawn(async move { first.search("pom").await });
        // past the debounce, so "pom" is already in flight
        sleep(Duration::from_millis(500)).await;
        let late = session.search("pomme").await;

        assert_eq!(early.await.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(late, SearchOutcome::Results(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let (session, _) = session(Duration::ZERO);
        let a = session.begin();
        let b = session.begin();
        assert!(b > a);
        assert!(!session.is_current(&a));
        assert!(session.is_current(&b));
        assert_eq!(b.sequence(), a.sequence() + 1);
    }

    #[test]
    fn test_config_from_search_config() {
        let config = SessionConfig::from(&SearchConfig::default());
        assert_eq!(config, SessionConfig::default());
    }
}
