//! Adapter identity and registration metadata.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Typed key identifying a registered backend adapter.
///
/// Keys are `'static` so that adapters declare them as constants and the
/// registry can match descriptors to implementations without string lookups
/// at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterKey(pub &'static str);

impl AdapterKey {
    /// Construct a new typed adapter key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<AdapterKey> for &'static str {
    fn from(k: AdapterKey) -> Self {
        k.0
    }
}

impl fmt::Display for AdapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for AdapterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Static registration metadata for one adapter.
///
/// Registered once at startup and read-only afterwards. The daily quota is a
/// plain configuration value per adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterDescriptor {
    /// Key that must match the adapter implementation's own key.
    pub id: AdapterKey,
    /// Human-readable name for logs and registry listings.
    pub display_name: String,
    /// Failover priority; lower values are tried first.
    pub priority: u32,
    /// Maximum invocations per UTC day.
    pub daily_quota: u64,
    /// Minimum spacing between two invocations of this adapter.
    pub cooldown: Duration,
    /// Trust weight in `[0, 100]` used as the confidence of normalized records.
    pub trust: u8,
}

impl AdapterDescriptor {
    /// Default failover priority for descriptors that do not set one.
    pub const DEFAULT_PRIORITY: u32 = 100;
    /// Default daily quota for descriptors that do not set one.
    pub const DEFAULT_DAILY_QUOTA: u64 = 50;
    /// Default trust weight.
    pub const DEFAULT_TRUST: u8 = 100;

    /// Create a descriptor with default priority, quota, cooldown and trust.
    pub fn new(id: AdapterKey, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            priority: Self::DEFAULT_PRIORITY,
            daily_quota: Self::DEFAULT_DAILY_QUOTA,
            cooldown: Duration::ZERO,
            trust: Self::DEFAULT_TRUST,
        }
    }

    /// Set the failover priority (lower is tried first).
    #[must_use]
    pub const fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the daily invocation budget.
    #[must_use]
    pub const fn daily_quota(mut self, quota: u64) -> Self {
        self.daily_quota = quota;
        self
    }

    /// Set the minimum spacing between invocations.
    #[must_use]
    pub const fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the trust weight in `[0, 100]`. Values above 100 are rejected when
    /// the orchestrator is built.
    #[must_use]
    pub const fn trust(mut self, trust: u8) -> Self {
        self.trust = trust;
        self
    }
}
