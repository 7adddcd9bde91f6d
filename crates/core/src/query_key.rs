//! Normalized query keys
//!
//! A [`QueryKey`] is the canonical, hashable shape of a [`Filter`]. Two
//! filters built from the same field/value pairs map to the same key no
//! matter which order the caller wrote them in.
//!
//! ## Canonicalization Rules
//!
//! - Top-level clauses are sorted by field name
//! - Object values become [`KeyValue::Mapping`], sorted by key, recursively
//! - Array values become [`KeyValue::Sequence`]; element order is kept
//! - Scalars become [`KeyScalar`]; floats are keyed by their bit pattern
//!   after folding `-0.0` into `0.0` and every NaN into one canonical NaN
//!
//! The float folding keeps keys in line with [`Value`] equality for zero.
//! NaN never equals itself as a [`Value`], but as a key every NaN is the
//! same key, so repeated NaN queries still share a cache entry.

use crate::record::Filter;
use crate::value::Value;
use std::fmt;

/// Hashable scalar leaf of a [`KeyValue`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyScalar {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Canonical float bits
    Float(u64),
    /// String
    String(String),
    /// Bytes
    Bytes(Vec<u8>),
}

impl KeyScalar {
    fn float(f: f64) -> Self {
        let canonical = if f.is_nan() {
            f64::NAN
        } else if f == 0.0 {
            0.0
        } else {
            f
        };
        KeyScalar::Float(canonical.to_bits())
    }
}

/// Canonical, totally ordered form of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    /// Leaf value
    Scalar(KeyScalar),
    /// Array, element order kept
    Sequence(Vec<KeyValue>),
    /// Object, entries sorted by key
    Mapping(Vec<(String, KeyValue)>),
}

impl From<&Value> for KeyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => KeyValue::Scalar(KeyScalar::Null),
            Value::Bool(b) => KeyValue::Scalar(KeyScalar::Bool(*b)),
            Value::Int(i) => KeyValue::Scalar(KeyScalar::Int(*i)),
            Value::Float(f) => KeyValue::Scalar(KeyScalar::float(*f)),
            Value::String(s) => KeyValue::Scalar(KeyScalar::String(s.clone())),
            Value::Bytes(b) => KeyValue::Scalar(KeyScalar::Bytes(b.clone())),
            Value::Array(items) => KeyValue::Sequence(items.iter().map(KeyValue::from).collect()),
            Value::Object(entries) => {
                let mut mapping: Vec<(String, KeyValue)> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), KeyValue::from(v)))
                    .collect();
                mapping.sort_by(|a, b| a.0.cmp(&b.0));
                KeyValue::Mapping(mapping)
            }
        }
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        KeyValue::from(&value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Scalar(KeyScalar::Null) => write!(f, "null"),
            KeyValue::Scalar(KeyScalar::Bool(b)) => write!(f, "{}", b),
            KeyValue::Scalar(KeyScalar::Int(i)) => write!(f, "{}", i),
            KeyValue::Scalar(KeyScalar::Float(bits)) => write!(f, "{}", f64::from_bits(*bits)),
            KeyValue::Scalar(KeyScalar::String(s)) => write!(f, "{:?}", s),
            KeyValue::Scalar(KeyScalar::Bytes(b)) => write!(f, "bytes[{}]", b.len()),
            KeyValue::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            KeyValue::Mapping(entries) => write_entries(f, entries),
        }
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[(String, KeyValue)]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", k, v)?;
    }
    write!(f, "}}")
}

/// Canonical cache key for a filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryKey {
    clauses: Vec<(String, KeyValue)>,
}

impl QueryKey {
    /// Normalize a filter.
    pub fn from_filter(filter: &Filter) -> Self {
        let mut clauses: Vec<(String, KeyValue)> = filter
            .clauses()
            .iter()
            .map(|(field, value)| (field.clone(), KeyValue::from(value)))
            .collect();
        clauses.sort_by(|a, b| a.0.cmp(&b.0));
        Self { clauses }
    }

    /// Canonical clauses, sorted by field
    pub fn clauses(&self) -> &[(String, KeyValue)] {
        &self.clauses
    }

    /// True for the match-all key
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl From<&Filter> for QueryKey {
    fn from(filter: &Filter) -> Self {
        QueryKey::from_filter(filter)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, &self.clauses)
    }
}
