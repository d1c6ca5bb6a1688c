//! scout-core
//!
//! Contracts and pure logic shared across the scout workspace.
//!
//! - `adapter`: the `BackendAdapter` trait every acquisition strategy implements,
//!   plus the optional `RecordDetailProvider` capability.
//! - `clock` / `delay`: injectable time source and pacing policy used by the
//!   quota tracker.
//! - `normalize` / `dedup`: turning raw adapter output into canonical records and
//!   merging them by identity key.
//! - `fallback`: synthetic placeholder generation for exhausted sessions.
//! - `middleware`: the wrapper trait implemented by adapter middleware.
#![warn(missing_docs)]

/// Backend adapter contract and capability traits.
pub mod adapter;
/// Time sources.
pub mod clock;
/// Record set merging by identity key.
pub mod dedup;
/// Pacing policies applied before adapter invocations.
pub mod delay;
/// Synthetic fallback generation.
pub mod fallback;
/// Middleware trait implemented by adapter wrappers.
pub mod middleware;
/// Raw-to-canonical record normalization.
pub mod normalize;
/// Domain types shared with `scout-types`.
pub mod types;

pub use adapter::{BackendAdapter, RecordDetailProvider};
pub use clock::{Clock, ManualClock, SystemClock, next_utc_midnight};
pub use dedup::{RecordSet, merge};
pub use delay::{DelayPolicy, ExponentialDelay, FixedDelay, JitteredDelay, NoDelay};
pub use fallback::{FallbackGenerator, PlaceholderFallback};
pub use middleware::Middleware;
pub use normalize::{
    Normalized, derive_identity_key, normalize, normalize_all, residual_attributes,
};
pub use types::*;
