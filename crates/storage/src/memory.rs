//! InMemoryStore: reference store adapter backed by a BTreeMap
//!
//! This module implements the StoreAdapter trait using:
//! - `BTreeMap<u64, Record>` keyed by a store-assigned id
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing ids
//!
//! # Design Notes
//!
//! - **Ids stay internal**: records are returned without their id, matching
//!   a document store queried with the id projected away
//! - **Insertion order**: scans return records in id order, which is the
//!   order they were inserted
//! - **Id allocation before write lock**: keeps the critical section short

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use shelter_core::{
    Filter, InsertAck, Projection, Record, StoreAdapter, StoreResult, UpdateOutcome,
};

/// In-memory store adapter.
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Records by store-assigned id
    data: RwLock<BTreeMap<u64, Record>>,
    /// Last id handed out
    next_id: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with records, in iteration order
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let store = Self::new();
        {
            let mut data = store.data.write();
            for record in records {
                data.insert(store.allocate_id(), record);
            }
        }
        store
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True when the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Allocate the next id atomically
    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl StoreAdapter for InMemoryStore {
    fn insert(&self, record: &Record) -> StoreResult<InsertAck> {
        let id = self.allocate_id();
        self.data.write().insert(id, record.clone());
        Ok(InsertAck { acknowledged: true })
    }

    fn find_all(&self, filter: &Filter, projection: &Projection) -> StoreResult<Vec<Record>> {
        let data = self.data.read();
        Ok(data
            .values()
            .filter(|record| filter.matches(record))
            .map(|record| record.project(projection))
            .collect())
    }

    fn update_many(&self, filter: &Filter, changes: &Record) -> StoreResult<UpdateOutcome> {
        let mut data = self.data.write();
        let mut outcome = UpdateOutcome::default();
        for record in data.values_mut().filter(|record| filter.matches(record)) {
            outcome.matched += 1;
            if record.apply_set(changes) {
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }

    fn delete_many(&self, filter: &Filter) -> StoreResult<u64> {
        let mut data = self.data.write();
        let before = data.len();
        data.retain(|_, record| !filter.matches(record));
        Ok((before - data.len()) as u64)
    }
}
