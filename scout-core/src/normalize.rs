use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::dedup::RecordSet;
use crate::{AdapterKey, CanonicalRecord, IdentityKey, Provenance, RawResult};

/// Accepted spellings for each canonical field, first match wins.
const DISPLAY_NAME_FIELDS: &[&str] = &[
    "displayName",
    "display_name",
    "name",
    "fullName",
    "full_name",
];
const SOURCE_URI_FIELDS: &[&str] = &[
    "sourceUri",
    "source_uri",
    "url",
    "profileUrl",
    "profile_url",
    "link",
];
const TITLE_FIELDS: &[&str] = &["title", "headline", "jobTitle", "job_title"];
const ORGANIZATION_FIELDS: &[&str] = &["organization", "company", "employer"];
const LOCATION_FIELDS: &[&str] = &["location", "city", "region"];
const CONFIDENCE_FIELDS: &[&str] = &["confidence", "score"];

/// Output of normalizing one adapter's raw batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Deduplicated canonical records.
    pub records: RecordSet,
    /// Raw records dropped for missing mandatory fields.
    pub dropped: usize,
}

/// Derive the identity key from the trailing, non-empty path segment of a
/// source URI, lowercased. Falls back to the host for URIs without a path.
///
/// Query strings and fragments never contribute to the key, so tracking
/// parameters added by different adapters do not split one entity in two.
#[must_use]
pub fn derive_identity_key(source_uri: &str) -> Option<IdentityKey> {
    let trimmed = source_uri.trim();
    if trimmed.is_empty() {
        return None;
    }
    let segment = match Url::parse(trimmed) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .or_else(|| url.host_str().map(str::to_string)),
        Err(_) => trimmed
            .split(['?', '#'])
            .next()
            .and_then(|path| path.split('/').filter(|s| !s.is_empty()).last())
            .map(str::to_string),
    }?;
    Some(IdentityKey::new(segment.to_lowercase()))
}

/// Convert one raw record into a canonical record.
///
/// Returns `None` when `displayName` or `sourceUri` is missing (or the URI
/// yields no identity key). Confidence is the adapter's trust weight; when
/// the adapter attached its own match score (`confidence`/`score`, 0–100) the
/// trust weight scales that score instead.
#[must_use]
pub fn normalize(
    raw: &RawResult,
    adapter: AdapterKey,
    trust: u8,
    extracted_at: DateTime<Utc>,
) -> Option<CanonicalRecord> {
    let display_name = raw.first_str(DISPLAY_NAME_FIELDS)?;
    let source_uri = raw.first_str(SOURCE_URI_FIELDS)?;
    let identity_key = derive_identity_key(source_uri)?;

    let trust = trust.min(100);
    let confidence = raw
        .first_f64(CONFIDENCE_FIELDS)
        .filter(|hint| hint.is_finite())
        .map_or(trust, |hint| scale_confidence(hint, trust));

    Some(CanonicalRecord {
        identity_key,
        display_name: display_name.to_string(),
        title: raw.first_str(TITLE_FIELDS).map(str::to_string),
        organization: raw.first_str(ORGANIZATION_FIELDS).map(str::to_string),
        location: raw.first_str(LOCATION_FIELDS).map(str::to_string),
        source_uri: source_uri.to_string(),
        confidence,
        provenance: Provenance {
            adapter_id: adapter.as_str().to_string(),
            extracted_at,
        },
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_confidence(hint: f64, trust: u8) -> u8 {
    let clamped = hint.clamp(0.0, 100.0);
    (clamped * f64::from(trust) / 100.0).round() as u8
}

/// Normalize and deduplicate a whole batch from one adapter.
///
/// Within the batch a duplicate replaces the kept record only with strictly
/// higher confidence, so equal-confidence duplicates keep the first one seen.
#[must_use]
pub fn normalize_all(
    raws: &[RawResult],
    adapter: AdapterKey,
    trust: u8,
    extracted_at: DateTime<Utc>,
) -> Normalized {
    let mut out = Normalized::default();
    for raw in raws {
        match normalize(raw, adapter, trust, extracted_at) {
            Some(record) => {
                let seen = out.records.get(&record.identity_key);
                if seen.is_none_or(|kept| record.confidence > kept.confidence) {
                    out.records.insert(record);
                }
            }
            None => out.dropped += 1,
        }
    }
    #[cfg(feature = "tracing")]
    if out.dropped > 0 {
        tracing::debug!(
            adapter = %adapter,
            dropped = out.dropped,
            kept = out.records.len(),
            "dropped raw records missing mandatory fields"
        );
    }
    out
}

/// Raw fields not consumed by normalization.
#[must_use]
pub fn residual_attributes(raw: &RawResult) -> Map<String, Value> {
    let consumed = [
        DISPLAY_NAME_FIELDS,
        SOURCE_URI_FIELDS,
        TITLE_FIELDS,
        ORGANIZATION_FIELDS,
        LOCATION_FIELDS,
        CONFIDENCE_FIELDS,
    ];
    raw.fields()
        .iter()
        .filter(|(k, _)| !consumed.iter().any(|group| group.contains(&k.as_str())))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
