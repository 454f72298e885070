//! Schema drift tracking.
//!
//! NetBox fields with values that no Nautobot model accepts are logged at
//! debug level for every record (by the loader) and escalated to a warning
//! here at most once per model and field name, so an import with ten
//! thousand interfaces carrying the same unsupported field warns once.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

/// Unsupported fields reported so far, per model.
#[derive(Debug, Default, Clone)]
pub struct DriftTracker {
    reported: BTreeMap<String, BTreeSet<String>>,
}

impl DriftTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fields one record of `model` carried but the importer
    /// ignored. Logs a warning for names not reported before and returns
    /// them.
    pub fn report(&mut self, model: &str, ignored_fields: &BTreeSet<String>) -> BTreeSet<String> {
        if ignored_fields.is_empty() {
            return BTreeSet::new();
        }

        let newly_seen: BTreeSet<String> = match self.reported.get(model) {
            Some(known) => ignored_fields.difference(known).cloned().collect(),
            None => ignored_fields.clone(),
        };
        if newly_seen.is_empty() {
            return newly_seen;
        }

        warn!(
            model,
            "The following fields are defined in NetBox for {}, but are not supported by this importer: {}",
            model,
            join(&newly_seen)
        );
        self.reported
            .entry(model.to_string())
            .or_default()
            .extend(newly_seen.iter().cloned());

        newly_seen
    }

    /// Fields reported for one model.
    pub fn unsupported_fields(&self, model: &str) -> Option<&BTreeSet<String>> {
        self.reported.get(model)
    }

    /// The whole drift table.
    pub fn table(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.reported
    }

    /// Consume the tracker, returning the drift table.
    pub fn into_table(self) -> BTreeMap<String, BTreeSet<String>> {
        self.reported
    }
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
