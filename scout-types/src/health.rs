//! Adapter and system health shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapter::AdapterKey;
use crate::state::AdapterMode;

/// Adapter self-reported status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Fully operational.
    Ok,
    /// Operational with reduced capability (e.g. an optional capability is missing).
    Degraded,
    /// Not usable right now.
    Unavailable,
}

/// Result of an adapter's own health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterHealth {
    /// Self-reported status.
    pub status: HealthStatus,
    /// Free-form detail.
    pub detail: Option<String>,
}

impl AdapterHealth {
    /// Healthy with no detail.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            detail: None,
        }
    }

    /// Degraded with a reason.
    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            detail: Some(detail.into()),
        }
    }

    /// Unavailable with a reason.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unavailable,
            detail: Some(detail.into()),
        }
    }
}

/// System-level health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallHealth {
    /// At least one adapter is active with quota left.
    Healthy,
    /// Some adapter is usable but none is both active and funded.
    Degraded,
    /// Every adapter is disabled or out of quota.
    Down,
}

/// Per-adapter line of a health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterHealthReport {
    /// Adapter id.
    pub adapter_id: AdapterKey,
    /// Mode as seen by the quota tracker.
    pub mode: AdapterMode,
    /// Remaining daily quota.
    pub remaining_quota: u64,
    /// Most recent error, from the health check or from the last failed call.
    pub last_error: Option<String>,
    /// Adapter self-reported status.
    pub status: HealthStatus,
    /// Whether the record-detail capability is available.
    pub supports_detail: bool,
}

/// System health snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    /// Aggregate classification.
    pub overall: OverallHealth,
    /// One entry per registered adapter, in failover order.
    pub per_adapter: Vec<AdapterHealthReport>,
    /// True while the operator has forced fallback-only mode.
    pub fallback_only: bool,
    /// When the snapshot was taken.
    pub checked_at: DateTime<Utc>,
}
