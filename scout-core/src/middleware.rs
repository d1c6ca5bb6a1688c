//! Middleware trait for wrapping `BackendAdapter` implementations.

use std::sync::Arc;

use crate::adapter::BackendAdapter;

/// Trait implemented by adapter middleware layers.
///
/// A middleware consumes an inner `BackendAdapter` and returns a wrapped adapter
/// that augments its behavior (e.g. caching). The wrapped adapter keeps the
/// inner adapter's key so registry matching is unaffected.
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner adapter and return the wrapped adapter.
    fn apply(self: Box<Self>, inner: Arc<dyn BackendAdapter>) -> Arc<dyn BackendAdapter>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}
