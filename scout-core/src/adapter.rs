use async_trait::async_trait;

use crate::{AdapterHealth, AdapterKey, Query, RawResult, ScoutError};

/// Focused role trait for adapters that can fetch a single record by its source URI.
#[async_trait]
pub trait RecordDetailProvider: Send + Sync {
    /// Fetch the full raw record behind `source_uri`.
    async fn record_detail(&self, source_uri: &str) -> Result<RawResult, ScoutError>;
}

/// Uniform contract implemented by every acquisition strategy.
///
/// Adapters are opaque to the orchestrator: how they reach the target service
/// and parse its responses is entirely their own concern. They report failures
/// through `ScoutError::{Backend, BackendBlocked, BackendTimeout}` and return an
/// empty vector, not an error, when a query legitimately has no matches.
///
/// Optional capabilities are exposed through `as_*_provider` accessors in the
/// same way as [`as_detail_provider`](Self::as_detail_provider).
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Stable key; must match the `id` of the descriptor it is registered with.
    fn key(&self) -> AdapterKey;

    /// Prepare the adapter (credentials, sessions, browser handles).
    ///
    /// Called lazily before first use and must be idempotent.
    ///
    /// # Errors
    /// Returns `ScoutError::Initialization` when the adapter cannot be prepared.
    async fn initialize(&self) -> Result<(), ScoutError> {
        Ok(())
    }

    /// Run a search for `query`, returning at most `query.limit()` raw records.
    async fn search(&self, query: &Query) -> Result<Vec<RawResult>, ScoutError>;

    /// Advertise record-detail capability.
    fn as_detail_provider(&self) -> Option<&dyn RecordDetailProvider> {
        None
    }

    /// Self-reported health. Must not fail; problems are reported in the result.
    ///
    /// The default reports `Ok`, or `Degraded` when the record-detail capability
    /// is absent.
    async fn health_check(&self) -> AdapterHealth {
        if self.as_detail_provider().is_some() {
            AdapterHealth::ok()
        } else {
            AdapterHealth::degraded("record detail unsupported")
        }
    }

    /// Release adapter-owned resources. Must be idempotent.
    async fn close(&self) {}
}
