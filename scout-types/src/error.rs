use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the scout workspace.
///
/// Adapter-level variants (`Backend`, `BackendBlocked`, `BackendTimeout`,
/// `Initialization`) are absorbed by the orchestrator and only surface as
/// attempt outcomes or report warnings. Callers of a search see
/// `QuotaExceeded`, `AllBackendsExhausted` or `InvalidArg`.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoutError {
    /// The requested capability is not implemented by the target adapter(s).
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "record_detail").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Adapter could not be prepared (missing credential or configuration).
    #[error("{adapter} failed to initialize: {msg}")]
    Initialization {
        /// Adapter that failed to initialize.
        adapter: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An adapter failed for a reason other than blocking or timing out
    /// (e.g. the response could not be parsed).
    #[error("{adapter} failed: {msg}")]
    Backend {
        /// Adapter name that failed.
        adapter: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The target service detected and blocked the adapter.
    #[error("{adapter} blocked: {msg}")]
    BackendBlocked {
        /// Adapter name that was blocked.
        adapter: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An adapter call exceeded the configured timeout.
    #[error("{adapter} timed out after {timeout_ms}ms")]
    BackendTimeout {
        /// Adapter name that timed out.
        adapter: String,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The adapter is disabled after repeated failures until the next quota reset.
    #[error("{adapter} disabled: reset_in_ms={reset_in_ms}")]
    AdapterDisabled {
        /// Adapter name that is disabled.
        adapter: String,
        /// Milliseconds until the next quota reset re-enables it.
        reset_in_ms: u64,
    },

    /// No quota remains for the request in the current daily window.
    #[error("quota exceeded: remaining={remaining} reset_in_ms={reset_in_ms}")]
    QuotaExceeded {
        /// Remaining units at the time of rejection.
        remaining: u64,
        /// Milliseconds until the quota window resets.
        reset_in_ms: u64,
    },

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "record detail for <uri>".
        what: String,
    },

    /// Every eligible adapter was attempted without success and no synthetic
    /// fallback is configured. Contains the individual failures.
    #[error("all backends exhausted: {0:?}")]
    AllBackendsExhausted(Vec<ScoutError>),

    /// The session was cancelled by the caller.
    #[error("session cancelled")]
    Cancelled,
}

impl ScoutError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Backend` error with the adapter name and message.
    pub fn backend(adapter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Backend {
            adapter: adapter.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `BackendBlocked` error with the adapter name and message.
    pub fn blocked(adapter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::BackendBlocked {
            adapter: adapter.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `BackendTimeout` error.
    pub fn timeout(adapter: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::BackendTimeout {
            adapter: adapter.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Helper: build an `Initialization` error with the adapter name and message.
    pub fn initialization(adapter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Initialization {
            adapter: adapter.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Returns true if this error describes an adapter-side failure that
    /// should count against the adapter's consecutive-failure budget.
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::BackendBlocked { .. } | Self::BackendTimeout { .. }
        )
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Capability absence and benign not-found conditions are not actionable.
    /// Aggregates are classified based on their contents.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        match self {
            Self::Unsupported { .. } | Self::NotFound { .. } | Self::Cancelled => false,
            Self::AllBackendsExhausted(inner) => inner.iter().any(Self::is_actionable),
            _ => true,
        }
    }

    /// Flatten nested `AllBackendsExhausted` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllBackendsExhausted(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Tag an adapter-returned error with the adapter name when the adapter
    /// used a variant that carries no adapter attribution.
    #[must_use]
    pub fn tagged(self, adapter: &str) -> Self {
        match self {
            e @ (Self::Backend { .. }
            | Self::BackendBlocked { .. }
            | Self::BackendTimeout { .. }
            | Self::Initialization { .. }
            | Self::AdapterDisabled { .. }
            | Self::QuotaExceeded { .. }
            | Self::AllBackendsExhausted(_)) => e,
            other => Self::Backend {
                adapter: adapter.to_string(),
                msg: other.to_string(),
            },
        }
    }
}
