//! Scout-specific data transfer objects and configuration primitives.
//!
//! Everything in this crate is plain data: adapter descriptors, records,
//! runtime state snapshots, session reports, health snapshots and the
//! unified [`ScoutError`]. Behavior lives in `scout-core`, `scout-middleware`
//! and the `scout` orchestrator.
#![warn(missing_docs)]

mod adapter;
mod config;
mod error;
mod health;
mod records;
mod reports;
mod state;

pub use adapter::{AdapterDescriptor, AdapterKey};
pub use config::{CacheConfig, ScoutConfig};
pub use error::ScoutError;
pub use health::{AdapterHealth, AdapterHealthReport, HealthSnapshot, HealthStatus, OverallHealth};
pub use records::{
    CanonicalRecord, IdentityKey, Provenance, Query, RawResult, SYNTHETIC_ADAPTER_ID,
};
pub use reports::{
    Attempt, AttemptOutcome, RecordDetail, RegistryEntry, SearchReport, SessionStatus,
};
pub use state::{AdapterMode, AdapterRuntimeState};
