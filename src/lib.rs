//! Shelter - coherent read-path acceleration for a document store
//!
//! Shelter wraps a document store with two accelerators: a bounded LRU cache
//! of query results and a hash index over one record field. Every write goes
//! through the same entry point, so the accelerators never serve data the
//! caller could not explain.
//!
//! # Quick Start
//!
//! ```
//! use shelter::{CoherentCollection, EngineConfig, Filter, InMemoryStore, Record, Value};
//!
//! let shelter = CoherentCollection::open(InMemoryStore::new(), EngineConfig::default())?;
//!
//! shelter.create(&Record::new().with("name", "Rex").with("breed", "Beagle"))?;
//!
//! let beagles = shelter.read(&Filter::match_all().with("breed", "Beagle"), false)?;
//! assert_eq!(beagles.len(), 1);
//! assert_eq!(shelter.lookup(&Value::from("Beagle")).len(), 1);
//! # Ok::<(), shelter::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `shelter-core`: values, records, filters, query keys, errors, the store trait
//! - `shelter-storage`: the in-memory store, the attribute index, test doubles
//! - `shelter-engine`: the query cache, configuration, [`CoherentCollection`]

pub use shelter_core::*;
pub use shelter_engine::*;
pub use shelter_storage::{testing, AttributeIndex, InMemoryStore};
