//! Collection engine for shelter
//!
//! This crate ties the lower layers together:
//! - CoherentCollection: CRUD entry point that keeps cache and index coherent
//! - QueryCache: bounded LRU of query results keyed by normalized filter
//! - EngineConfig: cache capacity and indexed field, loaded from `shelter.toml`
//!
//! The engine is the only component that knows when cached state must be
//! dropped after a write.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod collection;
pub mod config;

pub use cache::{CacheEpoch, CacheStats, QueryCache};
pub use collection::CoherentCollection;
pub use config::{EngineConfig, CONFIG_FILE_NAME, DEFAULT_CACHE_CAPACITY, DEFAULT_INDEX_FIELD};
