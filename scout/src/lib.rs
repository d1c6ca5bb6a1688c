//! Scout orchestrates profile lookups across rate-limited acquisition backends.
//!
//! Overview
//! - Routes each search through registered adapters that implement the
//!   `scout_core::BackendAdapter` contract, strictly in priority order.
//! - Gates every invocation behind a per-adapter daily quota and cooldown, so
//!   backends are paced like a human would use them.
//! - Normalizes raw adapter output into canonical records and deduplicates them
//!   by identity key, keeping the most confident provenance.
//! - Composes a system health snapshot from adapter self-checks and quota state.
//!
//! Key behaviors and trade-offs
//! - One session at a time: concurrent callers queue on a session lock. This
//!   caps the automated-access footprint at the cost of throughput.
//! - Sequential failover: the first adapter whose answer survives
//!   normalization wins; failures and empty answers move on to the next one
//!   until `attempt_cap` adapters have been invoked.
//! - Permanent degradation: an adapter failing `failure_threshold` times in a
//!   row is disabled until the next UTC-midnight reset (or an operator
//!   re-enable via [`Scout::set_mode`]).
//! - Synthetic fallback: an exhausted session can return placeholder records
//!   marked with the `synthetic` adapter id and status `Partial`.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use scout::{AdapterDescriptor, AdapterKey, PlaceholderFallback, Scout};
//!
//! let scout = Scout::builder()
//!     .with_adapter(
//!         AdapterDescriptor::new(AdapterKey::new("browser"), "Headless browser")
//!             .priority(1)
//!             .daily_quota(50)
//!             .cooldown(std::time::Duration::from_secs(20)),
//!         browser,
//!     )
//!     .with_adapter(
//!         AdapterDescriptor::new(AdapterKey::new("search-engine"), "Search engine")
//!             .priority(2)
//!             .trust(80),
//!         search_engine,
//!     )
//!     .fallback(Arc::new(PlaceholderFallback::default()))
//!     .build()?;
//!
//! let report = scout.search("grace hopper navy", 10).await?;
//! for record in &report.records {
//!     println!("{} ({}%)", record.display_name, record.confidence);
//! }
//! let snapshot = scout.health_check().await;
//! ```
//!
//! See `scout/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod registry;
mod router;

pub use core::{Scout, ScoutBuilder};
pub use router::health::classify as classify_health;
pub use router::util::collapse_errors;
pub use tokio_util::sync::CancellationToken;

pub use scout_middleware::{
    CacheMiddleware, CachingAdapter, QuotaTracker, ReleaseOutcome, Reservation,
};

// Re-export core types for convenience
pub use scout_core::{
    AdapterDescriptor,
    AdapterHealth,
    AdapterHealthReport,
    AdapterKey,
    AdapterMode,
    AdapterRuntimeState,
    Attempt,
    AttemptOutcome,
    BackendAdapter,
    CacheConfig,
    CanonicalRecord,
    Clock,
    DelayPolicy,
    ExponentialDelay,
    FallbackGenerator,
    FixedDelay,
    HealthSnapshot,
    HealthStatus,
    IdentityKey,
    JitteredDelay,
    ManualClock,
    Middleware,
    NoDelay,
    OverallHealth,
    PlaceholderFallback,
    Provenance,
    Query,
    RawResult,
    RecordDetail,
    RecordDetailProvider,
    RecordSet,
    RegistryEntry,
    SYNTHETIC_ADAPTER_ID,
    ScoutConfig,
    ScoutError,
    SearchReport,
    SessionStatus,
    SystemClock,
};
