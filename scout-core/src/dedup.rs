use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::{CanonicalRecord, IdentityKey};

/// Set of canonical records with pairwise-distinct identity keys.
///
/// On collision the record with the higher confidence is kept. Equal
/// confidence keeps the earlier extraction, then the smaller adapter id, then
/// the smaller `source_uri`, then the smaller remaining fields, so merging
/// never depends on insertion order. First-seen order within one adapter's
/// batch is applied earlier, by [`normalize_all`](crate::normalize_all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeMap<IdentityKey, CanonicalRecord>,
}

/// Merge `record` into `set`; see [`RecordSet::merge`].
#[must_use]
pub fn merge(set: RecordSet, record: CanonicalRecord) -> RecordSet {
    set.merge(record)
}

/// Precedence between two records sharing an identity key.
/// `Ordering::Greater` means `a` wins over `b`.
fn precedence(a: &CanonicalRecord, b: &CanonicalRecord) -> Ordering {
    a.confidence
        .cmp(&b.confidence)
        .then_with(|| b.provenance.extracted_at.cmp(&a.provenance.extracted_at))
        .then_with(|| b.provenance.adapter_id.cmp(&a.provenance.adapter_id))
        .then_with(|| b.source_uri.cmp(&a.source_uri))
        .then_with(|| b.display_name.cmp(&a.display_name))
        .then_with(|| b.title.cmp(&a.title))
        .then_with(|| b.organization.cmp(&a.organization))
        .then_with(|| b.location.cmp(&a.location))
}

impl RecordSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record kept for `key`.
    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<&CanonicalRecord> {
        self.records.get(key)
    }

    /// Iterate in identity-key order.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.values()
    }

    /// Insert a record, returning whether it is now the kept record for its key.
    pub fn insert(&mut self, record: CanonicalRecord) -> bool {
        match self.records.entry(record.identity_key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(mut slot) => {
                if precedence(&record, slot.get()) == Ordering::Greater {
                    slot.insert(record);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Consuming merge of a single record.
    #[must_use]
    pub fn merge(mut self, record: CanonicalRecord) -> Self {
        self.insert(record);
        self
    }

    /// Merge every record of `other` into `self`.
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.extend(other.records.into_values());
        self
    }

    /// Records ordered by confidence (highest first), then identity key.
    #[must_use]
    pub fn into_ranked(self) -> Vec<CanonicalRecord> {
        let mut out: Vec<CanonicalRecord> = self.records.into_values().collect();
        out.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| a.identity_key.cmp(&b.identity_key))
        });
        out
    }
}

impl Extend<CanonicalRecord> for RecordSet {
    fn extend<I: IntoIterator<Item = CanonicalRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<CanonicalRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = CanonicalRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for RecordSet {
    type Item = CanonicalRecord;
    type IntoIter = std::collections::btree_map::IntoValues<IdentityKey, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}
