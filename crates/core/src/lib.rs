//! Core types and traits for shelter
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: field value enum
//! - Record, Filter, Projection: documents and the queries over them
//! - QueryKey: canonical, hashable form of a filter (cache key)
//! - Error, StoreError: fault taxonomy
//! - StoreAdapter: the gateway trait to durable storage

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query_key;
pub mod record;
pub mod traits;
pub mod value;

pub use error::{Error, Result, StoreError, StoreResult};
pub use query_key::{KeyScalar, KeyValue, QueryKey};
pub use record::{Filter, Projection, Record, ResultSet};
pub use traits::{InsertAck, StoreAdapter, UpdateOutcome};
pub use value::Value;
