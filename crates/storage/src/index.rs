//! Attribute index: one field's value -> records holding it
//!
//! The index is a cache of a derived view, never a source of truth. It is
//! filled by a full scan ([`AttributeIndex::build`]) and afterwards grows
//! only through [`AttributeIndex::on_insert`].
//!
//! Updates and deletes are NOT patched in. A write can touch any record
//! through any filter, not just through the indexed field, so the index is
//! left to go stale until the next `build`. Callers that need the index to
//! reflect updates or deletes must rebuild it.
//!
//! `build` fetches only the indexed field (a projection), so buckets filled
//! by a scan hold single-field records, while buckets extended by
//! `on_insert` hold whole records as the caller submitted them.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use shelter_core::{Filter, KeyValue, Projection, Record, StoreAdapter, StoreResult, Value};

type Buckets = FxHashMap<KeyValue, Vec<Record>>;

/// Secondary hash index over a single record field.
///
/// Lookups are O(1) expected in the number of records: the bucket is found
/// by hashing the canonical form of the value.
#[derive(Debug)]
pub struct AttributeIndex {
    field: String,
    buckets: RwLock<Buckets>,
}

impl AttributeIndex {
    /// Create an empty index over `field`
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            buckets: RwLock::new(Buckets::default()),
        }
    }

    /// The indexed field name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Replace the index contents with a fresh scan of `store`.
    ///
    /// The scan runs without holding the index lock; the new buckets are
    /// swapped in at once, so concurrent lookups see either the old or the
    /// new index, never a mix. Inserts that land in the old buckets while
    /// the scan is running are dropped by the swap unless the scan saw them,
    /// and an insert the scan saw may be appended once more after the swap.
    /// Either way the next `build` restores an exact view.
    ///
    /// Returns the number of records indexed.
    ///
    /// # Errors
    ///
    /// Store faults propagate unchanged and the current index is kept.
    pub fn build<S: StoreAdapter + ?Sized>(&self, store: &S) -> StoreResult<usize> {
        debug!(target: "shelter::index", field = %self.field, "Scanning store for index build");
        let projection = Projection::only([self.field.as_str()]);
        let records = store.find_all(&Filter::match_all(), &projection)?;

        let mut fresh = Buckets::default();
        let mut indexed = 0usize;
        for record in records {
            if let Some(key) = self.key_of(&record) {
                fresh.entry(key).or_default().push(record);
                indexed += 1;
            }
        }

        let buckets = fresh.len();
        *self.buckets.write() = fresh;
        info!(
            target: "shelter::index",
            field = %self.field,
            buckets,
            records = indexed,
            "Attribute index built"
        );
        Ok(indexed)
    }

    /// Record a store-accepted insert.
    ///
    /// Appends the record to its value's bucket, creating the bucket if
    /// needed. A record without the indexed field, or with a blank value
    /// there (see [`Value::is_blank`]), is ignored. Returns whether the
    /// record was indexed.
    pub fn on_insert(&self, record: &Record) -> bool {
        let Some(key) = self.key_of(record) else {
            return false;
        };
        debug!(target: "shelter::index", field = %self.field, value = %key, "Indexing inserted record");
        self.buckets.write().entry(key).or_default().push(record.clone());
        true
    }

    /// Records believed to hold `value`, in bucket order. Empty if none.
    pub fn lookup(&self, value: &Value) -> Vec<Record> {
        let key = KeyValue::from(value);
        self.buckets.read().get(&key).cloned().unwrap_or_default()
    }

    /// Size of the bucket for `value`
    pub fn bucket_len(&self, value: &Value) -> usize {
        let key = KeyValue::from(value);
        self.buckets.read().get(&key).map_or(0, Vec::len)
    }

    /// Number of distinct values (buckets)
    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.buckets.read().is_empty()
    }

    /// Total records across all buckets
    pub fn record_count(&self) -> usize {
        self.buckets.read().values().map(Vec::len).sum()
    }

    fn key_of(&self, record: &Record) -> Option<KeyValue> {
        record
            .get(&self.field)
            .filter(|value| !value.is_blank())
            .map(KeyValue::from)
    }
}
