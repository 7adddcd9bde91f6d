//! Store adapter abstraction
//!
//! [`StoreAdapter`] is the only way the read-path layer talks to durable
//! storage. Implementations own matching semantics, identity assignment
//! and connection handling; the layer above only forwards calls and
//! reacts to their outcome.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::record::{Filter, Projection, Record};

/// Acknowledgment returned by an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertAck {
    /// Whether the store confirmed the write
    pub acknowledged: bool,
}

/// Counts returned by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records matching the filter
    pub matched: u64,
    /// Records whose content actually changed
    pub modified: u64,
}

/// Synchronous gateway to a persistent record collection.
///
/// Thread safety: all methods may be called concurrently from multiple
/// threads (requires Send + Sync).
pub trait StoreAdapter: Send + Sync {
    /// Insert one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or refuses the record.
    fn insert(&self, record: &Record) -> StoreResult<InsertAck>;

    /// Return every record matching `filter`, restricted to `projection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the query.
    fn find_all(&self, filter: &Filter, projection: &Projection) -> StoreResult<Vec<Record>>;

    /// Apply `changes` (field overwrite) to every record matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the update.
    fn update_many(&self, filter: &Filter, changes: &Record) -> StoreResult<UpdateOutcome>;

    /// Delete every record matching `filter`, returning how many went.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the delete.
    fn delete_many(&self, filter: &Filter) -> StoreResult<u64>;

    /// Connectivity check.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl<S: StoreAdapter + ?Sized> StoreAdapter for Arc<S> {
    fn insert(&self, record: &Record) -> StoreResult<InsertAck> {
        (**self).insert(record)
    }

    fn find_all(&self, filter: &Filter, projection: &Projection) -> StoreResult<Vec<Record>> {
        (**self).find_all(filter, projection)
    }

    fn update_many(&self, filter: &Filter, changes: &Record) -> StoreResult<UpdateOutcome> {
        (**self).update_many(filter, changes)
    }

    fn delete_many(&self, filter: &Filter) -> StoreResult<u64> {
        (**self).delete_many(filter)
    }

    fn ping(&self) -> StoreResult<()> {
        (**self).ping()
    }
}
