use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use scout_core::{
    AdapterHealth, AdapterKey, BackendAdapter, CacheConfig, Query, RawResult,
    RecordDetailProvider, ScoutError,
};

/// Search cache key: whitespace-collapsed, lowercased query text plus limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SearchKey {
    text: String,
    limit: usize,
}

impl From<&Query> for SearchKey {
    fn from(q: &Query) -> Self {
        let text = q
            .text()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            limit: q.limit(),
        }
    }
}

fn store<K, V>(ttl: Option<Duration>, max_entries: u64) -> Option<Cache<K, V>>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // A zero TTL disables the store just like `None`.
    let ttl = ttl.filter(|d| !d.is_zero())?;
    Some(
        Cache::builder()
            .max_capacity(max_entries.max(1))
            .time_to_live(ttl)
            .build(),
    )
}

/// Declarative wrapper that applies caching when building an adapter stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl scout_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn BackendAdapter>) -> Arc<dyn BackendAdapter> {
        let Self { cfg } = *self;
        Arc::new(CachingAdapter::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "search_ttl_ms": self.cfg.search_ttl.map(|d| d.as_millis()),
            "detail_ttl_ms": self.cfg.detail_ttl.map(|d| d.as_millis()),
            "max_entries": self.cfg.max_entries,
            "cache_empty_results": self.cfg.cache_empty_results,
        })
    }
}

/// Adapter wrapper serving repeated searches and detail lookups from memory.
///
/// Errors are never cached. Empty search results are cached only when
/// `cache_empty_results` is set, so an adapter that was briefly blocked is
/// asked again on the next session.
pub struct CachingAdapter {
    inner: Arc<dyn BackendAdapter>,
    search: Option<Cache<SearchKey, Arc<Vec<RawResult>>>>,
    detail: Option<Cache<String, Arc<RawResult>>>,
    cache_empty_results: bool,
}

impl CachingAdapter {
    #[must_use]
    pub fn new(inner: Arc<dyn BackendAdapter>, cfg: &CacheConfig) -> Self {
        Self {
            inner,
            search: store(cfg.search_ttl, cfg.max_entries),
            detail: store(cfg.detail_ttl, cfg.max_entries),
            cache_empty_results: cfg.cache_empty_results,
        }
    }

    /// Access the wrapped adapter.
    pub fn inner(&self) -> &Arc<dyn BackendAdapter> {
        &self.inner
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        if let Some(s) = &self.search {
            s.invalidate_all();
        }
        if let Some(d) = &self.detail {
            d.invalidate_all();
        }
    }
}

#[async_trait]
impl BackendAdapter for CachingAdapter {
    fn key(&self) -> AdapterKey {
        self.inner.key()
    }

    async fn initialize(&self) -> Result<(), ScoutError> {
        self.inner.initialize().await
    }

    async fn search(&self, query: &Query) -> Result<Vec<RawResult>, ScoutError> {
        let Some(store) = &self.search else {
            return self.inner.search(query).await;
        };
        let key = SearchKey::from(query);
        if let Some(hit) = store.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(adapter = %self.inner.key(), "search served from cache");
            return Ok((*hit).clone());
        }
        let value = self.inner.search(query).await?;
        if self.cache_empty_results || !value.is_empty() {
            store.insert(key, Arc::new(value.clone())).await;
        }
        Ok(value)
    }

    fn as_detail_provider(&self) -> Option<&dyn RecordDetailProvider> {
        self.inner
            .as_detail_provider()
            .map(|_| self as &dyn RecordDetailProvider)
    }

    async fn health_check(&self) -> AdapterHealth {
        self.inner.health_check().await
    }

    async fn close(&self) {
        self.invalidate_all();
        self.inner.close().await;
    }
}

#[async_trait]
impl RecordDetailProvider for CachingAdapter {
    async fn record_detail(&self, source_uri: &str) -> Result<RawResult, ScoutError> {
        let inner = self
            .inner
            .as_detail_provider()
            .ok_or_else(|| ScoutError::unsupported("record_detail"))?;
        let Some(store) = &self.detail else {
            return inner.record_detail(source_uri).await;
        };
        if let Some(hit) = store.get(source_uri).await {
            return Ok((*hit).clone());
        }
        let value = inner.record_detail(source_uri).await?;
        store
            .insert(source_uri.to_string(), Arc::new(value.clone()))
            .await;
        Ok(value)
    }
}
