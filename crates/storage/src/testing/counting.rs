//! Call-counting store wrapper

use std::sync::atomic::{AtomicU64, Ordering};

use shelter_core::{
    Filter, InsertAck, Projection, Record, StoreAdapter, StoreResult, UpdateOutcome,
};

/// Snapshot of per-operation call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `insert` calls
    pub inserts: u64,
    /// `find_all` calls
    pub finds: u64,
    /// `update_many` calls
    pub updates: u64,
    /// `delete_many` calls
    pub deletes: u64,
    /// `ping` calls
    pub pings: u64,
}

impl StoreCalls {
    /// All calls of every kind
    pub fn total(&self) -> u64 {
        self.inserts + self.finds + self.updates + self.deletes + self.pings
    }

    /// Calls that could mutate the store
    pub fn writes(&self) -> u64 {
        self.inserts + self.updates + self.deletes
    }
}

/// Wraps a store and counts every call, successful or not.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    inserts: AtomicU64,
    finds: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    pings: AtomicU64,
}

impl<S> CountingStore<S> {
    /// Wrap `inner`
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            inserts: AtomicU64::new(0),
            finds: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            pings: AtomicU64::new(0),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Current counts
    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            inserts: self.inserts.load(Ordering::SeqCst),
            finds: self.finds.load(Ordering::SeqCst),
            updates: self.updates.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
            pings: self.pings.load(Ordering::SeqCst),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        for counter in [
            &self.inserts,
            &self.finds,
            &self.updates,
            &self.deletes,
            &self.pings,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl<S: StoreAdapter> StoreAdapter for CountingStore<S> {
    fn insert(&self, record: &Record) -> StoreResult<InsertAck> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(record)
    }

    fn find_all(&self, filter: &Filter, projection: &Projection) -> StoreResult<Vec<Record>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all(filter, projection)
    }

    fn update_many(&self, filter: &Filter, changes: &Record) -> StoreResult<UpdateOutcome> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_many(filter, changes)
    }

    fn delete_many(&self, filter: &Filter) -> StoreResult<u64> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_many(filter)
    }

    fn ping(&self) -> StoreResult<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        self.inner.ping()
    }
}
