//! Query, raw and canonical record shapes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScoutError;

/// Adapter id recorded in the provenance of placeholder records produced by
/// the synthetic fallback.
pub const SYNTHETIC_ADAPTER_ID: &str = "synthetic";

/// A validated search request: non-empty text and a positive result limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    text: String,
    limit: usize,
}

impl Query {
    /// Build a query, trimming surrounding whitespace from `text`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the trimmed text is empty or `limit` is zero.
    pub fn new(text: impl AsRef<str>, limit: usize) -> Result<Self, ScoutError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ScoutError::InvalidArg("query text must not be empty".into()));
        }
        if limit == 0 {
            return Err(ScoutError::InvalidArg("limit must be positive".into()));
        }
        Ok(Self {
            text: text.to_string(),
            limit,
        })
    }

    /// The trimmed query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maximum number of records the caller wants back.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Backend-specific free-form record.
///
/// The orchestrator treats it as opaque apart from the handful of fields the
/// normalizer reads; adapters are free to include anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResult(Map<String, Value>);

impl RawResult {
    /// An empty raw record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert, convenient for adapters and fixtures.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw field access.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First non-blank string value among `keys`, trimmed.
    #[must_use]
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.0.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// First numeric value among `keys`.
    #[must_use]
    pub fn first_f64(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find_map(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawResult {
    type Error = ScoutError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ScoutError::InvalidArg(format!(
                "raw result must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Stable deduplication key derived from a record's source URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Wrap an already-derived key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a canonical record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// Id of the adapter that produced the raw record.
    pub adapter_id: String,
    /// When the record was normalized.
    pub extracted_at: DateTime<Utc>,
}

impl Provenance {
    /// True for placeholder records produced by the synthetic fallback.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.adapter_id == SYNTHETIC_ADAPTER_ID
    }
}

/// Normalized, adapter-independent profile record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Deduplication key.
    pub identity_key: IdentityKey,
    /// Name of the person or entity.
    pub display_name: String,
    /// Job title or headline, when known.
    pub title: Option<String>,
    /// Employer or organization, when known.
    pub organization: Option<String>,
    /// Location, when known.
    pub location: Option<String>,
    /// Canonical link to the profile.
    pub source_uri: String,
    /// Confidence in `[0, 100]`.
    pub confidence: u8,
    /// Producing adapter and extraction time.
    pub provenance: Provenance,
}
