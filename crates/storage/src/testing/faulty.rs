//! Fault-injecting store wrapper

use parking_lot::Mutex;

use shelter_core::{
    Filter, InsertAck, Projection, Record, StoreAdapter, StoreError, StoreResult, UpdateOutcome,
};

/// Wraps a store; while a fault is armed every call fails with it and the
/// inner store is never reached.
#[derive(Debug, Default)]
pub struct FaultyStore<S> {
    inner: S,
    fault: Mutex<Option<StoreError>>,
}

impl<S> FaultyStore<S> {
    /// Wrap `inner` with no fault armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fault: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `error`
    pub fn fail_with(&self, error: StoreError) {
        *self.fault.lock() = Some(error);
    }

    /// Simulate connectivity loss
    pub fn disconnect(&self) {
        self.fail_with(StoreError::Unavailable("connection lost".to_string()));
    }

    /// Disarm the fault
    pub fn recover(&self) {
        *self.fault.lock() = None;
    }

    /// Is a fault armed?
    pub fn is_failing(&self) -> bool {
        self.fault.lock().is_some()
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self) -> StoreResult<()> {
        match self.fault.lock().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl<S: StoreAdapter> StoreAdapter for FaultyStore<S> {
    fn insert(&self, record: &Record) -> StoreResult<InsertAck> {
        self.check()?;
        self.inner.insert(record)
    }

    fn find_all(&self, filter: &Filter, projection: &Projection) -> StoreResult<Vec<Record>> {
        self.check()?;
        self.inner.find_all(filter, projection)
    }

    fn update_many(&self, filter: &Filter, changes: &Record) -> StoreResult<UpdateOutcome> {
        self.check()?;
        self.inner.update_many(filter, changes)
    }

    fn delete_many(&self, filter: &Filter) -> StoreResult<u64> {
        self.check()?;
        self.inner.delete_many(filter)
    }

    fn ping(&self) -> StoreResult<()> {
        self.check()?;
        self.inner.ping()
    }
}
