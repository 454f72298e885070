//! In-memory index of the records loaded so far in a run.
//!
//! Keyed by `(Nautobot label, key)`. Pass-through references and generic-FK
//! discriminators are resolved against it, so a model can only reference
//! pass-through records of models loaded earlier in the run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::core::{PkValue, ResolvedRecord};

/// Records constructed during one run.
#[derive(Debug, Default)]
pub struct RecordIndex {
    records: HashMap<(&'static str, PkValue), ResolvedRecord>,
}

impl RecordIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns `false` and keeps the existing entry when a
    /// record with the same label and key is already indexed.
    pub fn insert(&mut self, record: ResolvedRecord) -> bool {
        match self.records.entry((record.label, record.key.clone())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Look up a record.
    pub fn get(&self, label: &'static str, key: &PkValue) -> Option<&ResolvedRecord> {
        self.records.get(&(label, key.clone()))
    }

    /// Look up a record by NetBox key.
    pub fn get_int(&self, label: &'static str, pk: i64) -> Option<&ResolvedRecord> {
        self.records.get(&(label, PkValue::Int(pk)))
    }

    /// Whether a record is indexed.
    pub fn contains(&self, label: &'static str, key: &PkValue) -> bool {
        self.get(label, key).is_some()
    }

    /// Number of indexed records with the given label.
    pub fn count(&self, label: &str) -> usize {
        self.records.keys().filter(|(l, _)| *l == label).count()
    }

    /// Iterate over every indexed record, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedRecord> {
        self.records.values()
    }

    /// Total number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
