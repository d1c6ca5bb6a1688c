//! Per-adapter runtime state as tracked by the quota tracker.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adapter::AdapterKey;

/// Operating mode of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdapterMode {
    /// Eligible and not within its cooldown window.
    Active,
    /// Eligible, but its cooldown since the last invocation has not elapsed.
    CoolingDown,
    /// Excluded from selection until the next quota reset.
    Disabled,
}

impl fmt::Display for AdapterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::CoolingDown => "cooling_down",
            Self::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// Point-in-time snapshot of one adapter's quota bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterRuntimeState {
    /// Adapter this state belongs to.
    pub adapter_id: AdapterKey,
    /// Invocations still allowed before `quota_reset_at`.
    pub remaining_quota: u64,
    /// Next UTC-midnight boundary at which the quota refills.
    pub quota_reset_at: DateTime<Utc>,
    /// Time of the most recent reservation, if any.
    pub last_invocation_at: Option<DateTime<Utc>>,
    /// Failures since the last success (or reset).
    pub consecutive_failures: u32,
    /// Current mode.
    pub mode: AdapterMode,
    /// Most recent adapter-reported error, for health reporting.
    pub last_error: Option<String>,
}

impl AdapterRuntimeState {
    /// True when the daily budget is spent.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining_quota == 0
    }

    /// True when the adapter can be selected (not disabled, quota left).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.mode != AdapterMode::Disabled && !self.is_exhausted()
    }
}
