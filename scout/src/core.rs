use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use scout_core::{
    AdapterDescriptor, AdapterKey, BackendAdapter, Clock, DelayPolicy, FallbackGenerator,
    Middleware, NoDelay, ScoutConfig, ScoutError, SystemClock,
};
use scout_middleware::QuotaTracker;
use tokio::sync::Mutex;

use crate::registry::Registry;

/// Orchestrator that runs search sessions across registered backend adapters.
///
/// Sessions are serialized: one search (or record-detail lookup) runs at a
/// time and concurrent callers queue on the session lock.
pub struct Scout {
    pub(crate) registry: Registry,
    pub(crate) quota: QuotaTracker,
    pub(crate) cfg: ScoutConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) fallback: Option<Arc<dyn FallbackGenerator>>,
    pub(crate) session: Mutex<()>,
    pub(crate) fallback_only: AtomicBool,
}

/// Builder for constructing a `Scout` orchestrator with custom configuration.
pub struct ScoutBuilder {
    adapters: Vec<(AdapterDescriptor, Arc<dyn BackendAdapter>)>,
    middleware: Vec<(AdapterKey, Box<dyn Middleware>)>,
    cfg: ScoutConfig,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn DelayPolicy>,
    fallback: Option<Arc<dyn FallbackGenerator>>,
}

impl Default for ScoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// - Starts with no adapters; register at least one via [`with_adapter`](Self::with_adapter).
    /// - Two invoked adapters per session, 45s adapter timeout, adapters disabled
    ///   after three consecutive failures.
    /// - System clock, no extra delay beyond each adapter's cooldown, no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            middleware: Vec::new(),
            cfg: ScoutConfig::default(),
            clock: Arc::new(SystemClock),
            delay: Arc::new(NoDelay),
            fallback: None,
        }
    }

    /// Register a backend adapter with its descriptor.
    ///
    /// The descriptor's `id` must equal `adapter.key()`. Registration order
    /// breaks ties between equal priorities.
    #[must_use]
    pub fn with_adapter(
        mut self,
        descriptor: AdapterDescriptor,
        adapter: Arc<dyn BackendAdapter>,
    ) -> Self {
        self.adapters.push((descriptor, adapter));
        self
    }

    /// Wrap the adapter registered under `key` with a middleware layer.
    ///
    /// Layers are applied in the order they are added, so the last one added
    /// is outermost.
    #[must_use]
    pub fn with_middleware(mut self, key: AdapterKey, middleware: Box<dyn Middleware>) -> Self {
        self.middleware.push((key, middleware));
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: ScoutConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Maximum number of adapters invoked per session.
    #[must_use]
    pub const fn attempt_cap(mut self, cap: usize) -> Self {
        self.cfg.attempt_cap = cap;
        self
    }

    /// Hard timeout for a single adapter call.
    #[must_use]
    pub const fn adapter_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.adapter_timeout = timeout;
        self
    }

    /// Consecutive failures after which an adapter is disabled until the next reset.
    #[must_use]
    pub const fn failure_threshold(mut self, threshold: u32) -> Self {
        self.cfg.failure_threshold = threshold;
        self
    }

    /// Timeout applied to each adapter health check.
    #[must_use]
    pub const fn health_check_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.health_check_timeout = timeout;
        self
    }

    /// Time source for quota bookkeeping and provenance timestamps.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Extra wait applied before each invocation, on top of the adapter's cooldown.
    #[must_use]
    pub fn delay_policy(mut self, delay: Arc<dyn DelayPolicy>) -> Self {
        self.delay = delay;
        self
    }

    /// Placeholder generator used when every adapter is exhausted.
    #[must_use]
    pub fn fallback(mut self, fallback: Arc<dyn FallbackGenerator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn validate(&self) -> Result<(), ScoutError> {
        if self.adapters.is_empty() {
            return Err(ScoutError::InvalidArg(
                "no adapters registered; add at least one via with_adapter(...)".to_string(),
            ));
        }
        if self.cfg.attempt_cap == 0 {
            return Err(ScoutError::InvalidArg("attempt_cap must be at least 1".into()));
        }
        if self.cfg.failure_threshold == 0 {
            return Err(ScoutError::InvalidArg(
                "failure_threshold must be at least 1".into(),
            ));
        }
        let mut seen = HashSet::new();
        for (desc, adapter) in &self.adapters {
            if !seen.insert(desc.id) {
                return Err(ScoutError::InvalidArg(format!(
                    "adapter '{}' registered twice",
                    desc.id
                )));
            }
            if adapter.key() != desc.id {
                return Err(ScoutError::InvalidArg(format!(
                    "descriptor '{}' does not match adapter '{}'",
                    desc.id,
                    adapter.key()
                )));
            }
            if desc.trust > 100 {
                return Err(ScoutError::InvalidArg(format!(
                    "trust for '{}' must be within 0..=100, got {}",
                    desc.id, desc.trust
                )));
            }
        }
        if let Some((key, _)) = self.middleware.iter().find(|(k, _)| !seen.contains(k)) {
            return Err(ScoutError::InvalidArg(format!(
                "middleware targets unknown adapter '{key}'"
            )));
        }
        Ok(())
    }

    /// Build the `Scout` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no adapter is registered, an adapter id is
    /// registered twice, a descriptor id differs from its adapter's key, a
    /// trust weight exceeds 100, a middleware targets an unknown adapter, or
    /// `attempt_cap`/`failure_threshold` is zero.
    pub fn build(self) -> Result<Scout, ScoutError> {
        self.validate()?;
        let Self {
            adapters,
            middleware,
            cfg,
            clock,
            delay,
            fallback,
        } = self;

        let mut layers: HashMap<AdapterKey, Vec<Box<dyn Middleware>>> = HashMap::new();
        for (key, m) in middleware {
            layers.entry(key).or_default().push(m);
        }
        let adapters = adapters
            .into_iter()
            .map(|(desc, raw)| {
                let wrapped = layers
                    .remove(&desc.id)
                    .unwrap_or_default()
                    .into_iter()
                    .fold(raw, |inner, m| m.apply(inner));
                (desc, wrapped)
            })
            .collect();

        let registry = Registry::new(adapters);
        let quota = QuotaTracker::new(
            registry.descriptors(),
            Arc::clone(&clock),
            delay,
            cfg.failure_threshold,
        );

        Ok(Scout {
            registry,
            quota,
            cfg,
            clock,
            fallback,
            session: Mutex::new(()),
            fallback_only: AtomicBool::new(false),
        })
    }
}

impl Scout {
    /// Start building a new `Scout` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use scout::{AdapterDescriptor, AdapterKey, PlaceholderFallback, Scout};
    ///
    /// let scout = Scout::builder()
    ///     .with_adapter(
    ///         AdapterDescriptor::new(AdapterKey::new("browser"), "Headless browser")
    ///             .priority(1)
    ///             .daily_quota(50),
    ///         browser,
    ///     )
    ///     .with_adapter(
    ///         AdapterDescriptor::new(AdapterKey::new("search-engine"), "Search engine")
    ///             .priority(2),
    ///         search_engine,
    ///     )
    ///     .fallback(Arc::new(PlaceholderFallback::default()))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> ScoutBuilder {
        ScoutBuilder::new()
    }

    /// Wrap an adapter future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "scout::core::adapter_call_with_timeout",
            skip(fut),
            fields(
                adapter = adapter.as_str(),
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn adapter_call_with_timeout<T, Fut>(
        adapter: AdapterKey,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, ScoutError>
    where
        Fut: std::future::Future<Output = Result<T, ScoutError>>,
    {
        #[cfg(not(feature = "tracing"))]
        let _ = capability;
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(ScoutError::timeout(adapter.as_str(), timeout)))
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoutConfig {
        &self.cfg
    }
}
