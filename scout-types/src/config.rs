//! Configuration types shared across the orchestrator and middleware.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration for the `Scout` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Maximum number of adapters invoked per session before it is exhausted.
    ///
    /// Adapters skipped because their quota is spent or they failed to
    /// initialize do not count against the cap.
    pub attempt_cap: usize,
    /// Hard timeout for a single adapter call. A timeout is a failed attempt.
    pub adapter_timeout: Duration,
    /// Consecutive failures after which an adapter is disabled until the next
    /// quota reset.
    pub failure_threshold: u32,
    /// Timeout applied to each adapter health check during a snapshot.
    pub health_check_timeout: Duration,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            attempt_cap: 2,
            adapter_timeout: Duration::from_secs(45),
            failure_threshold: 3,
            health_check_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for the adapter caching middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached search results. `None` disables search caching.
    pub search_ttl: Option<Duration>,
    /// Time-to-live for cached record details. `None` disables detail caching.
    pub detail_ttl: Option<Duration>,
    /// Maximum number of entries per cache store.
    pub max_entries: u64,
    /// Whether an empty search result is cached like any other.
    pub cache_empty_results: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_ttl: Some(Duration::from_secs(15 * 60)),
            detail_ttl: Some(Duration::from_secs(60 * 60)),
            max_entries: 1_000,
            cache_empty_results: false,
        }
    }
}
