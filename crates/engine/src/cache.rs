//! Query result cache
//!
//! Bounded map from [`QueryKey`] to the [`ResultSet`] last fetched for it,
//! evicting the least recently used entry when full. Recency is a strict
//! total order (every `get` and `put` moves an entry to the front), so
//! entries never tie and eviction is deterministic.
//!
//! # Epochs
//!
//! Every [`QueryCache::clear`] starts a new epoch. A reader that misses
//! notes the epoch before going to the store and hands it back with the
//! result through [`QueryCache::put_if_current`]; if a purge happened in
//! between, the result is dropped instead of cached. Without this, a read
//! racing a write could re-insert pre-write data right after the write's
//! purge.
//!
//! All state lives behind one mutex. `get` updates recency, so even reads
//! are structural mutations here.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use shelter_core::{Error, QueryKey, Result, ResultSet};

/// Purge generation of a [`QueryCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheEpoch(u64);

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries written (new or overwritten)
    pub inserts: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Calls to `clear`
    pub purges: u64,
    /// Entries currently held
    pub entries: usize,
    /// Maximum entries
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState {
    entries: LruCache<QueryKey, ResultSet>,
    epoch: u64,
}

/// Bounded LRU cache of query results.
pub struct QueryCache {
    capacity: NonZeroUsize,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    purges: AtomicU64,
}

impl QueryCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// A zero capacity is a configuration error.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::config("query cache capacity must be at least 1"))?;
        Ok(Self {
            capacity,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                epoch: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            purges: AtomicU64::new(0),
        })
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&self, key: &QueryKey) -> Option<ResultSet> {
        let found = self.state.lock().entries.get(key).cloned();
        match found {
            Some(results) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(target: "shelter::cache", query = %key, "Cache hit");
                Some(results)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(target: "shelter::cache", query = %key, "Cache miss");
                None
            }
        }
    }

    /// Insert or overwrite `key`, marking it most recently used.
    ///
    /// Returns the key evicted to stay within capacity, if any.
    pub fn put(&self, key: QueryKey, results: ResultSet) -> Option<QueryKey> {
        let mut state = self.state.lock();
        self.insert_locked(&mut state, key, results)
    }

    /// Current purge generation.
    pub fn epoch(&self) -> CacheEpoch {
        CacheEpoch(self.state.lock().epoch)
    }

    /// Insert only if no purge has happened since `epoch` was read.
    ///
    /// Returns whether the entry was stored.
    pub fn put_if_current(&self, epoch: CacheEpoch, key: QueryKey, results: ResultSet) -> bool {
        let mut state = self.state.lock();
        if state.epoch != epoch.0 {
            debug!(
                target: "shelter::cache",
                query = %key,
                read_epoch = epoch.0,
                current_epoch = state.epoch,
                "Dropping result fetched before a purge"
            );
            return false;
        }
        self.insert_locked(&mut state, key, results);
        true
    }

    /// Drop every entry and start a new epoch.
    ///
    /// Returns how many entries were dropped.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut state = self.state.lock();
            let dropped = state.entries.len();
            state.entries.clear();
            state.epoch += 1;
            dropped
        };
        self.purges.fetch_add(1, Ordering::Relaxed);
        debug!(target: "shelter::cache", dropped, "Cache purged");
        dropped
    }

    /// Is `key` cached? Does not touch recency or statistics.
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.state.lock().entries.contains(key)
    }

    /// Cached keys, most recently used first. Does not touch recency.
    pub fn keys(&self) -> Vec<QueryKey> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Snapshot of usage counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            purges: self.purges.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity(),
        }
    }

    fn insert_locked(
        &self,
        state: &mut CacheState,
        key: QueryKey,
        results: ResultSet,
    ) -> Option<QueryKey> {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        // push hands back either the overwritten entry (same key) or the
        // evicted least recently used one
        match state.entries.push(key.clone(), results) {
            Some((old_key, _)) if old_key != key => {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(target: "shelter::cache", evicted = %old_key, "Evicted least recently used query");
                Some(old_key)
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}
