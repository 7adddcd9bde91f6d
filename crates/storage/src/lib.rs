//! Storage layer for shelter
//!
//! This crate provides:
//! - InMemoryStore: BTreeMap-based reference store adapter with RwLock
//! - AttributeIndex: secondary hash index over one record field
//! - testing: store test doubles (call counting, fault injection)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;
pub mod testing;

pub use index::AttributeIndex;
pub use memory::InMemoryStore;
