//! Coherent collection: store access with a query cache and attribute index
//!
//! [`CoherentCollection`] is the only entry point callers use. It decides,
//! for every operation, what the cache and index may serve and what they
//! must forget.
//!
//! ## Read path
//!
//! - bypass: straight to the store, cache untouched in both directions
//! - otherwise: normalize the filter, serve a hit verbatim, or fetch,
//!   cache and return on a miss
//!
//! ## Write path
//!
//! 1. Empty required arguments are rejected before the store is called
//! 2. The store applies the write; a store fault is returned unchanged and
//!    neither cache nor index is touched
//! 3. On success: `create` appends to the index, then every write purges
//!    the whole cache before returning
//!
//! ## Staleness contract
//!
//! The cache mirrors the store between a purge and the next successful
//! write. The index mirrors the store right after a build or a create; it
//! does not follow updates or deletes until [`CoherentCollection::rebuild_index`].

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use shelter_core::{
    Error, Filter, Projection, QueryKey, Record, Result, ResultSet, StoreAdapter, StoreError,
    Value,
};
use shelter_storage::AttributeIndex;

use crate::cache::{CacheStats, QueryCache};
use crate::config::EngineConfig;

/// A store wrapped with a coherent read-path cache and attribute index.
///
/// One instance per store connection. All methods take `&self` and may be
/// called from many threads at once.
pub struct CoherentCollection<S: StoreAdapter> {
    store: S,
    config: EngineConfig,
    index: AttributeIndex,
    cache: QueryCache,
}

impl<S: StoreAdapter> CoherentCollection<S> {
    /// Validate `config`, then build the attribute index from `store`.
    ///
    /// # Errors
    ///
    /// - configuration error for invalid settings (checked first)
    /// - store error if the initial index scan fails; there is no retry
    pub fn open(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let cache = QueryCache::new(config.cache_capacity)?;
        let index = AttributeIndex::new(config.index_field.clone());
        index.build(&store).map_err(|e| {
            error!(target: "shelter::collection", error = %e, "Initial index build failed");
            Error::from(e)
        })?;
        info!(
            target: "shelter::collection",
            index_field = %config.index_field,
            cache_capacity = config.cache_capacity,
            "Collection opened"
        );
        Ok(Self {
            store,
            config,
            index,
            cache,
        })
    }

    /// Open with [`EngineConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns a store error if the initial index scan fails.
    pub fn with_defaults(store: S) -> Result<Self> {
        Self::open(store, EngineConfig::default())
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Insert a record.
    ///
    /// Returns the store's acknowledgment flag. The record joins the index
    /// only when the store acknowledged it; the cache is purged either way.
    ///
    /// # Errors
    ///
    /// - validation error for an empty record (store not called)
    /// - store error from the insert (index and cache untouched)
    pub fn create(&self, record: &Record) -> Result<bool> {
        if record.is_empty() {
            return Err(self.reject("create", "Nothing to save, record is empty"));
        }

        let ack = self
            .store
            .insert(record)
            .map_err(|e| self.store_failed("create", e))?;
        info!(
            target: "shelter::collection",
            acknowledged = ack.acknowledged,
            "Record inserted"
        );

        if ack.acknowledged {
            self.index.on_insert(record);
        }
        self.purge("create");
        Ok(ack.acknowledged)
    }

    /// Read records matching `filter`.
    ///
    /// With `bypass_cache` the store is queried directly and the cache is
    /// neither consulted nor populated, and its statistics do not move.
    ///
    /// # Errors
    ///
    /// Store faults propagate unchanged; nothing is cached on failure.
    pub fn read(&self, filter: &Filter, bypass_cache: bool) -> Result<ResultSet> {
        if bypass_cache {
            info!(target: "shelter::collection", clauses = filter.len(), "Bypassing cache for read");
            let records = self
                .store
                .find_all(filter, &Projection::all())
                .map_err(|e| self.store_failed("read", e))?;
            return Ok(Arc::new(records));
        }

        let key = QueryKey::from_filter(filter);
        if let Some(results) = self.cache.get(&key) {
            debug!(target: "shelter::collection", query = %key, rows = results.len(), "Read served from cache");
            return Ok(results);
        }

        // Capture the epoch before querying so a purge that lands while we
        // are at the store keeps this result out of the cache.
        let epoch = self.cache.epoch();
        let records = self
            .store
            .find_all(filter, &Projection::all())
            .map_err(|e| self.store_failed("read", e))?;
        let results: ResultSet = Arc::new(records);
        if !self.cache.put_if_current(epoch, key.clone(), Arc::clone(&results)) {
            debug!(target: "shelter::collection", query = %key, "Result not cached, a write purged the cache meanwhile");
        }
        debug!(target: "shelter::collection", query = %key, rows = results.len(), "Read served from store");
        Ok(results)
    }

    /// Overwrite `changes` fields on every record matching `filter`.
    ///
    /// Returns the number of records modified. The index is not patched.
    ///
    /// # Errors
    ///
    /// - validation error if `filter` or `changes` is empty (store not called)
    /// - store error from the update (cache untouched)
    pub fn update(&self, filter: &Filter, changes: &Record) -> Result<u64> {
        if filter.is_empty() || changes.is_empty() {
            return Err(self.reject("update", "Update parameters cannot be empty"));
        }

        let outcome = self
            .store
            .update_many(filter, changes)
            .map_err(|e| self.store_failed("update", e))?;
        info!(
            target: "shelter::collection",
            matched = outcome.matched,
            modified = outcome.modified,
            "Update applied"
        );

        self.purge("update");
        Ok(outcome.modified)
    }

    /// Delete every record matching `filter`.
    ///
    /// Returns the number of records deleted. The index is not patched.
    ///
    /// # Errors
    ///
    /// - validation error if `filter` is empty (store not called)
    /// - store error from the delete (cache untouched)
    pub fn delete(&self, filter: &Filter) -> Result<u64> {
        if filter.is_empty() {
            return Err(self.reject("delete", "Delete parameters cannot be empty"));
        }

        let deleted = self
            .store
            .delete_many(filter)
            .map_err(|e| self.store_failed("delete", e))?;
        info!(target: "shelter::collection", deleted, "Delete applied");

        self.purge("delete");
        Ok(deleted)
    }

    /// Drop every cached query result.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!(target: "shelter::collection", "Cache cleared");
    }

    // ========================================================================
    // Index
    // ========================================================================

    /// Records the index holds for `value` of the indexed field.
    pub fn lookup(&self, value: &Value) -> Vec<Record> {
        self.index.lookup(value)
    }

    /// Rescan the store and replace the index.
    ///
    /// This is the only way updates and deletes reach the index.
    ///
    /// # Errors
    ///
    /// Store faults propagate; the previous index stays in place.
    pub fn rebuild_index(&self) -> Result<usize> {
        self.index
            .build(&self.store)
            .map_err(|e| self.store_failed("rebuild_index", e))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store's connectivity fault.
    pub fn ping(&self) -> Result<()> {
        self.store.ping().map_err(|e| self.store_failed("ping", e))
    }

    /// Cache usage counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The query cache
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The attribute index
    pub fn index(&self) -> &AttributeIndex {
        &self.index
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Settings this collection was opened with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn purge(&self, operation: &'static str) {
        let dropped = self.cache.clear();
        debug!(target: "shelter::collection", operation, dropped, "Cache purged after write");
    }

    fn reject(&self, operation: &'static str, reason: &str) -> Error {
        warn!(target: "shelter::collection", operation, reason, "Rejected write");
        Error::validation(reason)
    }

    fn store_failed(&self, operation: &'static str, e: StoreError) -> Error {
        error!(target: "shelter::collection", operation, error = %e, "Store operation failed");
        Error::from(e)
    }
}
