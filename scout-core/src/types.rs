//! Re-export of foundational types from `scout-types`.
// Consolidated re-exports so downstream crates can depend on `scout-core` only

pub use scout_types::{AdapterDescriptor, AdapterKey, ScoutError};
pub use scout_types::{
    AdapterHealth, AdapterHealthReport, HealthSnapshot, HealthStatus, OverallHealth,
};
pub use scout_types::{AdapterMode, AdapterRuntimeState};
pub use scout_types::{
    Attempt, AttemptOutcome, RecordDetail, RegistryEntry, SearchReport, SessionStatus,
};
pub use scout_types::{CacheConfig, ScoutConfig};
pub use scout_types::{
    CanonicalRecord, IdentityKey, Provenance, Query, RawResult, SYNTHETIC_ADAPTER_ID,
};
