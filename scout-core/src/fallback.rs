use chrono::{DateTime, Utc};

use crate::{CanonicalRecord, IdentityKey, Provenance, Query, SYNTHETIC_ADAPTER_ID};

/// Produces placeholder records when every real adapter is exhausted.
///
/// Output must be deterministic for a given query. The orchestrator stamps
/// every generated record with the synthetic adapter id and reports the
/// session as `Partial`.
pub trait FallbackGenerator: Send + Sync {
    /// Placeholder records for `query`; an empty result counts as no fallback.
    fn generate(&self, query: &Query) -> Vec<CanonicalRecord>;
}

/// Default generator: up to `count` placeholders echoing the query text,
/// with zero confidence and `synthetic://` source URIs.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderFallback {
    count: usize,
}

impl Default for PlaceholderFallback {
    fn default() -> Self {
        Self { count: 1 }
    }
}

impl PlaceholderFallback {
    /// Generate up to `count` placeholders per session (at least one).
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}

fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() { "query".to_string() } else { out }
}

impl FallbackGenerator for PlaceholderFallback {
    fn generate(&self, query: &Query) -> Vec<CanonicalRecord> {
        let slug = slug(query.text());
        let n = self.count.max(1).min(query.limit());
        (1..=n)
            .map(|i| CanonicalRecord {
                identity_key: IdentityKey::new(format!("synthetic-{slug}-{i}")),
                display_name: query.text().to_string(),
                title: Some("Placeholder: live sources unavailable".to_string()),
                organization: None,
                location: None,
                source_uri: format!("synthetic://placeholder/{slug}/{i}"),
                confidence: 0,
                provenance: Provenance {
                    adapter_id: SYNTHETIC_ADAPTER_ID.to_string(),
                    extracted_at: DateTime::<Utc>::UNIX_EPOCH,
                },
            })
            .collect()
    }
}
