use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use scout_core::{
    AdapterHealth, AdapterKey, BackendAdapter, Query, RawResult, RecordDetailProvider, ScoutError,
};

/// Instruction for how a method should behave for a given call.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(ScoutError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
    /// Sleep for the given duration, then return the value.
    Slow(Duration, T),
}

#[derive(Default)]
struct InternalState {
    // Consumed one per call before falling back to `search_default`.
    search_script: VecDeque<MockBehavior<Vec<RawResult>>>,
    search_default: Option<MockBehavior<Vec<RawResult>>>,
    detail_rules: HashMap<String, MockBehavior<RawResult>>,
    init_failure: Option<String>,
    health: Option<AdapterHealth>,
    search_log: Vec<String>,
    detail_log: Vec<String>,
    init_calls: usize,
    close_calls: usize,
}

struct Shared {
    state: Mutex<InternalState>,
    supports_detail: AtomicBool,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    shared: Arc<Shared>,
}

impl DynamicMockController {
    /// Behavior for every `search` call not covered by a scripted step.
    pub async fn set_search_behavior(&self, behavior: MockBehavior<Vec<RawResult>>) {
        let mut guard = self.shared.state.lock().await;
        guard.search_default = Some(behavior);
    }

    /// Queue a behavior for the next unscripted `search` call.
    pub async fn push_search_behavior(&self, behavior: MockBehavior<Vec<RawResult>>) {
        let mut guard = self.shared.state.lock().await;
        guard.search_script.push_back(behavior);
    }

    /// Behavior for `record_detail` on one source URI.
    pub async fn set_detail_behavior(
        &self,
        source_uri: impl Into<String>,
        behavior: MockBehavior<RawResult>,
    ) {
        let mut guard = self.shared.state.lock().await;
        guard.detail_rules.insert(source_uri.into(), behavior);
    }

    /// Advertise (or stop advertising) the record detail capability.
    pub fn set_supports_detail(&self, supported: bool) {
        self.shared.supports_detail.store(supported, Ordering::SeqCst);
    }

    /// Make `initialize` fail with the given message; `None` restores success.
    pub async fn set_init_failure(&self, msg: Option<&str>) {
        let mut guard = self.shared.state.lock().await;
        guard.init_failure = msg.map(str::to_string);
    }

    /// Health reported by `health_check`.
    pub async fn set_health(&self, health: AdapterHealth) {
        let mut guard = self.shared.state.lock().await;
        guard.health = Some(health);
    }

    /// Query texts received by `search`, in call order.
    pub async fn search_calls(&self) -> Vec<String> {
        self.shared.state.lock().await.search_log.clone()
    }

    /// Source URIs received by `record_detail`, in call order.
    pub async fn detail_calls(&self) -> Vec<String> {
        self.shared.state.lock().await.detail_log.clone()
    }

    /// Number of `initialize` calls.
    pub async fn init_calls(&self) -> usize {
        self.shared.state.lock().await.init_calls
    }

    /// Number of `close` calls.
    pub async fn close_calls(&self) -> usize {
        self.shared.state.lock().await.close_calls
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.shared.state.lock().await;
        *guard = InternalState::default();
        self.shared.supports_detail.store(false, Ordering::SeqCst);
    }
}

async fn play<T>(behavior: MockBehavior<T>) -> Result<T, ScoutError> {
    match behavior {
        MockBehavior::Return(v) => Ok(v),
        MockBehavior::Fail(e) => Err(e),
        MockBehavior::Hang => {
            std::future::pending::<()>().await;
            unreachable!()
        }
        MockBehavior::Slow(d, v) => {
            tokio::time::sleep(d).await;
            Ok(v)
        }
    }
}

/// An adapter that defers all behavior to an external controller.
///
/// Unconfigured searches return no records.
pub struct DynamicMockAdapter {
    key: AdapterKey,
    shared: Arc<Shared>,
}

impl DynamicMockAdapter {
    /// Create a new dynamic mock adapter and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn BackendAdapter>, DynamicMockController) {
        let shared = Arc::new(Shared {
            state: Mutex::new(InternalState::default()),
            supports_detail: AtomicBool::new(false),
        });
        let controller = DynamicMockController {
            shared: Arc::clone(&shared),
        };
        let me = Arc::new(Self {
            key: AdapterKey::new(name),
            shared,
        });
        (me as Arc<dyn BackendAdapter>, controller)
    }
}

#[async_trait]
impl BackendAdapter for DynamicMockAdapter {
    fn key(&self) -> AdapterKey {
        self.key
    }

    async fn initialize(&self) -> Result<(), ScoutError> {
        let mut guard = self.shared.state.lock().await;
        guard.init_calls += 1;
        match &guard.init_failure {
            Some(msg) => Err(ScoutError::initialization(self.key.as_str(), msg.clone())),
            None => Ok(()),
        }
    }

    async fn search(&self, query: &Query) -> Result<Vec<RawResult>, ScoutError> {
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard.search_log.push(query.text().to_string());
            guard
                .search_script
                .pop_front()
                .or_else(|| guard.search_default.clone())
        };
        match behavior {
            Some(b) => play(b).await,
            None => Ok(Vec::new()),
        }
    }

    fn as_detail_provider(&self) -> Option<&dyn RecordDetailProvider> {
        if self.shared.supports_detail.load(Ordering::SeqCst) {
            Some(self as &dyn RecordDetailProvider)
        } else {
            None
        }
    }

    async fn health_check(&self) -> AdapterHealth {
        let guard = self.shared.state.lock().await;
        guard.health.clone().unwrap_or_else(AdapterHealth::ok)
    }

    async fn close(&self) {
        self.shared.state.lock().await.close_calls += 1;
    }
}

#[async_trait]
impl RecordDetailProvider for DynamicMockAdapter {
    async fn record_detail(&self, source_uri: &str) -> Result<RawResult, ScoutError> {
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard.detail_log.push(source_uri.to_string());
            guard.detail_rules.get(source_uri).cloned()
        };
        match behavior {
            Some(b) => play(b).await,
            None => Err(ScoutError::not_found(format!("record detail for {source_uri}"))),
        }
    }
}
