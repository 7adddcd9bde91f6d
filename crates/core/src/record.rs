//! Records, filters and projections
//!
//! - [`Record`]: one document, field name -> [`Value`]
//! - [`Filter`]: equality clauses, kept in the order the caller wrote them
//! - [`Projection`]: which fields a scan should return
//!
//! Records carry no identity of their own. Whatever id the store assigns
//! stays inside the store.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Result of a read: shared so the query cache and callers hold the same
/// allocation.
pub type ResultSet = Arc<Vec<Record>>;

/// A single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field, returning the previous value if any
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Overwrite every field present in `changes`, leaving the rest alone.
    ///
    /// Returns true if any field actually changed value.
    pub fn apply_set(&mut self, changes: &Record) -> bool {
        let mut changed = false;
        for (field, value) in changes.iter() {
            if self.fields.get(field) != Some(value) {
                self.fields.insert(field.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    /// Copy of this record restricted to the projection's fields.
    pub fn project(&self, projection: &Projection) -> Record {
        if projection.is_all() {
            return self.clone();
        }
        let fields = self
            .fields
            .iter()
            .filter(|(field, _)| projection.includes(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Record { fields }
    }

    /// Build a record from a JSON object. Non-object JSON yields `None`.
    pub fn from_json(json: serde_json::Value) -> Option<Record> {
        match Value::from(json) {
            Value::Object(fields) => Some(Record { fields }),
            _ => None,
        }
    }
}

impl From<HashMap<String, Value>> for Record {
    fn from(fields: HashMap<String, Value>) -> Self {
        Record { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Equality filter over record fields.
///
/// Clauses keep caller order so that normalization is observable: two
/// filters written in different orders compare unequal here but share one
/// [`crate::QueryKey`]. Setting a field twice replaces the first clause in
/// place, like re-assigning a key in a map literal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// The empty filter, matching every record
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Builder-style clause
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, value);
        self
    }

    /// Add or replace a clause
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.clauses.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = value,
            None => self.clauses.push((field, value)),
        }
    }

    /// Clauses in caller order
    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// True for the match-all filter
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Does `record` satisfy every clause?
    ///
    /// A record missing a filtered field does not match.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|(field, wanted)| {
            record
                .get(field)
                .map(|have| have.matches(wanted))
                .unwrap_or(false)
        })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Filter::default();
        for (k, v) in iter {
            filter.push(k, v);
        }
        filter
    }
}

/// Field selection for scans. Empty means "whole record".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: BTreeSet<String>,
}

impl Projection {
    /// Return whole records
    pub fn all() -> Self {
        Self::default()
    }

    /// Return only the named fields
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// True when every field is returned
    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Is `field` part of the projection?
    pub fn includes(&self, field: &str) -> bool {
        self.is_all() || self.fields.contains(field)
    }
}
