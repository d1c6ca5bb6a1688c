//! Report envelopes produced by the orchestrator.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::adapter::{AdapterDescriptor, AdapterKey};
use crate::error::ScoutError;
use crate::records::{CanonicalRecord, Query};
use crate::state::AdapterRuntimeState;

/// Terminal status of one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// An adapter returned at least one usable record.
    Succeeded,
    /// Every real adapter failed; records are synthetic placeholders.
    Partial,
    /// The session ended without records (only reachable via cancellation;
    /// otherwise exhaustion is reported as an error).
    Exhausted,
}

/// Outcome of one adapter attempt within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The adapter produced records that survived normalization.
    Success {
        /// Number of distinct canonical records contributed.
        records: usize,
    },
    /// The adapter answered but nothing usable came back.
    Empty,
    /// The adapter errored or timed out.
    Failed {
        /// The tagged adapter error.
        error: ScoutError,
    },
    /// The adapter was skipped because its daily quota is spent.
    QuotaExceeded,
    /// The adapter could not be initialized and is skipped for this session.
    InitializationFailed {
        /// The initialization error.
        error: ScoutError,
    },
}

impl AttemptOutcome {
    /// True when the adapter was actually invoked (counts against the attempt cap).
    #[must_use]
    pub const fn invoked(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Empty | Self::Failed { .. })
    }
}

/// One entry of a session's attempt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Adapter that was consulted.
    pub adapter_id: AdapterKey,
    /// What happened.
    pub outcome: AttemptOutcome,
    /// Wall time spent on this attempt, cooldown wait included.
    pub duration_ms: u64,
}

/// Result of a search session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// The query that was executed.
    pub query: Query,
    /// Terminal status.
    pub status: SessionStatus,
    /// Ranked, deduplicated records, truncated to the query limit.
    pub records: Vec<CanonicalRecord>,
    /// Adapters consulted, in order.
    pub attempts: Vec<Attempt>,
    /// Raw records dropped by normalization across all attempts.
    pub dropped: usize,
    /// True when the caller cancelled the session.
    pub cancelled: bool,
    /// Non-fatal adapter errors encountered along the way.
    pub warnings: Vec<ScoutError>,
}

impl SearchReport {
    /// Adapter ids in the order they were consulted.
    #[must_use]
    pub fn attempted_adapters(&self) -> Vec<AdapterKey> {
        self.attempts.iter().map(|a| a.adapter_id).collect()
    }

    /// True for synthetic placeholder results.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.status == SessionStatus::Partial
    }
}

/// A single record with the extra fields its adapter returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordDetail {
    /// The normalized record.
    pub record: CanonicalRecord,
    /// Raw fields not consumed by normalization.
    pub attributes: Map<String, Value>,
}

/// Registry listing entry: static descriptor plus current runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    /// Registration metadata.
    pub descriptor: AdapterDescriptor,
    /// Current quota bookkeeping.
    pub state: AdapterRuntimeState,
    /// Whether the adapter exposes the record-detail capability.
    pub supports_detail: bool,
}
