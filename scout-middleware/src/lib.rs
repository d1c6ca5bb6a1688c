#![doc = include_str!("../README.md")]
//! scout-middleware
//!
//! Re-exports for the quota tracker and the caching wrapper.

mod cache;
mod quota;

pub use crate::cache::{CacheMiddleware, CachingAdapter};
pub use crate::quota::{QuotaTracker, ReleaseOutcome, Reservation};
