use async_trait::async_trait;
use scout_core::{
    AdapterHealth, AdapterKey, BackendAdapter, Query, RawResult, RecordDetailProvider, ScoutError,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockAdapter, DynamicMockController, MockBehavior};

/// Build a raw record the normalizer accepts, for use in tests.
#[must_use]
pub fn raw_person(name: &str, slug: &str) -> RawResult {
    RawResult::new()
        .with("displayName", name)
        .with("sourceUri", format!("https://people.example.com/in/{slug}"))
}

/// Mock adapter for CI-safe examples. Provides deterministic data from static fixtures.
pub struct MockAdapter {
    key: AdapterKey,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    /// Mock adapter registered as `scout-mock`.
    #[must_use]
    pub const fn new() -> Self {
        Self::named("scout-mock")
    }

    /// Mock adapter registered under a custom key, for multi-adapter registries.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            key: AdapterKey::new(name),
        }
    }

    async fn maybe_fail_or_timeout(
        &self,
        text: &str,
        capability: &'static str,
    ) -> Result<(), ScoutError> {
        match text {
            "FAIL" => Err(ScoutError::backend(
                self.key.as_str(),
                format!("forced failure: {capability}"),
            )),
            "BLOCK" => Err(ScoutError::blocked(
                self.key.as_str(),
                format!("challenge page served: {capability}"),
            )),
            "TIMEOUT" => {
                // Long enough to trip a short orchestrator timeout in tests.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BackendAdapter for MockAdapter {
    fn key(&self) -> AdapterKey {
        self.key
    }

    async fn search(&self, query: &Query) -> Result<Vec<RawResult>, ScoutError> {
        let text = query.text();
        self.maybe_fail_or_timeout(text, "search").await?;
        if text == "EMPTY" {
            return Ok(Vec::new());
        }
        Ok(fixtures::people::search(text, query.limit()))
    }

    fn as_detail_provider(&self) -> Option<&dyn RecordDetailProvider> {
        Some(self as &dyn RecordDetailProvider)
    }

    async fn health_check(&self) -> AdapterHealth {
        AdapterHealth::ok()
    }
}

#[async_trait]
impl RecordDetailProvider for MockAdapter {
    async fn record_detail(&self, source_uri: &str) -> Result<RawResult, ScoutError> {
        self.maybe_fail_or_timeout(source_uri, "record_detail").await?;
        fixtures::people::detail(source_uri)
            .ok_or_else(|| ScoutError::not_found(format!("record detail for {source_uri}")))
    }
}
