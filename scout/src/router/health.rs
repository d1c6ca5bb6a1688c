use std::sync::atomic::Ordering;

use futures::future::join_all;
use scout_core::{
    AdapterHealth, AdapterHealthReport, AdapterMode, AdapterRuntimeState, HealthSnapshot,
    HealthStatus, OverallHealth, RegistryEntry,
};

use crate::Scout;

/// Classify system health from per-adapter runtime states.
///
/// `Healthy` when some adapter is `Active` with quota left, `Down` when every
/// adapter is disabled or out of quota, `Degraded` otherwise (for instance
/// when the only funded adapters are cooling down). An empty slice is `Down`.
#[must_use]
pub fn classify<'a>(states: impl IntoIterator<Item = &'a AdapterRuntimeState>) -> OverallHealth {
    let mut any_healthy = false;
    let mut all_down = true;
    for s in states {
        if s.mode == AdapterMode::Active && !s.is_exhausted() {
            any_healthy = true;
        }
        if s.is_available() {
            all_down = false;
        }
    }
    if any_healthy {
        OverallHealth::Healthy
    } else if all_down {
        OverallHealth::Down
    } else {
        OverallHealth::Degraded
    }
}

impl Scout {
    /// Poll every adapter's health check and compose a system snapshot.
    ///
    /// Checks run concurrently, each bounded by `health_check_timeout`; a
    /// check that times out is reported as unavailable. This never fails and
    /// does not wait for an in-flight session.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "scout::router::health_check", skip(self))
    )]
    pub async fn health_check(&self) -> HealthSnapshot {
        let timeout = self.cfg.health_check_timeout;
        let checks = self.registry.entries().iter().map(|entry| async move {
            tokio::time::timeout(timeout, entry.adapter.health_check())
                .await
                .unwrap_or_else(|_| {
                    AdapterHealth::unavailable(format!(
                        "health check timed out after {}ms",
                        timeout.as_millis()
                    ))
                })
        });
        let results = join_all(checks).await;

        let mut states = Vec::with_capacity(results.len());
        let mut per_adapter = Vec::with_capacity(results.len());
        for (entry, health) in self.registry.entries().iter().zip(results) {
            let Some(state) = self.quota.state(entry.key()) else {
                continue;
            };
            let last_error = if health.status == HealthStatus::Unavailable {
                health.detail.or_else(|| state.last_error.clone())
            } else {
                state.last_error.clone()
            };
            per_adapter.push(AdapterHealthReport {
                adapter_id: entry.key(),
                mode: state.mode,
                remaining_quota: state.remaining_quota,
                last_error,
                status: health.status,
                supports_detail: entry.supports_detail(),
            });
            states.push(state);
        }

        let fallback_only = self.is_fallback_only();
        let mut overall = classify(&states);
        if fallback_only && overall == OverallHealth::Healthy {
            overall = OverallHealth::Degraded;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?overall, fallback_only, "health snapshot composed");

        HealthSnapshot {
            overall,
            per_adapter,
            fallback_only,
            checked_at: self.clock.now(),
        }
    }

    /// Descriptor, runtime state and capabilities of every adapter, in failover order.
    #[must_use]
    pub fn describe_registry(&self) -> Vec<RegistryEntry> {
        self.registry
            .entries()
            .iter()
            .filter_map(|entry| {
                self.quota.state(entry.key()).map(|state| RegistryEntry {
                    descriptor: entry.descriptor.clone(),
                    state,
                    supports_detail: entry.supports_detail(),
                })
            })
            .collect()
    }

    /// Switch operator mode.
    ///
    /// `true` routes every session straight to exhausted handling without
    /// touching a real adapter. `false` resumes normal routing and re-enables
    /// adapters disabled by consecutive failures; spent quota stays spent.
    pub fn set_mode(&self, fallback_only: bool) {
        self.fallback_only.store(fallback_only, Ordering::SeqCst);
        if !fallback_only {
            self.quota.enable_all();
        }
        #[cfg(feature = "tracing")]
        tracing::info!(fallback_only, "operator mode changed");
    }

    /// Whether fallback-only mode is on.
    #[must_use]
    pub fn is_fallback_only(&self) -> bool {
        self.fallback_only.load(Ordering::SeqCst)
    }

    /// Close every adapter.
    ///
    /// Waits for the in-flight session to finish. Closing twice is harmless;
    /// a later session initializes the adapters again.
    pub async fn close(&self) {
        let _session = self.session.lock().await;
        for entry in self.registry.entries() {
            entry.adapter.close().await;
            entry.mark_uninitialized();
        }
    }
}
