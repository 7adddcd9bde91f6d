//! Store test doubles
//!
//! Wrappers that sit between a collection and a real adapter so tests can
//! observe or break the store without a live backend:
//!
//! - **CountingStore**: counts calls per operation
//! - **FaultyStore**: fails every call on demand
//!
//! # Example
//!
//! ```ignore
//! use shelter_storage::testing::{CountingStore, FaultyStore};
//! use shelter_storage::InMemoryStore;
//!
//! let store = CountingStore::new(FaultyStore::new(InMemoryStore::new()));
//! store.inner().fail_with(StoreError::Unavailable("down".into()));
//! assert_eq!(store.calls().total(), 0);
//! ```

mod counting;
mod faulty;

pub use counting::{CountingStore, StoreCalls};
pub use faulty::FaultyStore;
