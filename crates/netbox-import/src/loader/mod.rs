//! Record loader: turns one NetBox record into one Nautobot record.
//!
//! For each source record the loader
//!
//! 1. copies the fields and injects the NetBox key as `pk`,
//! 2. rewrites every declared FK field through the [`ReferenceResolver`],
//! 3. applies the model's structural [`Fixup`], if it has one,
//! 4. constructs the target record (alias renames, required fields,
//!    ignore rule),
//! 5. reports NetBox fields the target dropped to the [`DriftTracker`],
//! 6. indexes the record and hands it to the sink.
//!
//! Per-field and per-record problems are logged and absorbed here; only
//! sink and registry failures propagate.

mod fixups;

pub use fixups::{Companions, Fixup, USER_CONFIG_LABEL};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::core::{
    derive, field_is_set, is_truthy, FieldMap, ModelRegistry, ModelSchema, Ownership, PkValue, RecordSink,
    ResolvedRecord, SourceRecord,
};
use crate::drift::DriftTracker;
use crate::error::{FieldError, Result};
use crate::index::RecordIndex;
use crate::resolver::ReferenceResolver;

/// Counters accumulated over a run.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Indexed records per model, synthesized ones included.
    pub loaded: BTreeMap<String, usize>,

    /// Records handed to the sink.
    pub sunk: usize,

    /// Records synthesized by fixups.
    pub synthesized: usize,

    /// Records indexed but withheld from the sink by an ignore rule.
    pub ignored: usize,

    /// Records rejected at construction.
    pub rejected: usize,

    /// Records whose key was already indexed.
    pub duplicates: usize,

    /// Fields (or list elements) that could not be resolved.
    pub field_errors: usize,

    /// Records whose companion record was missing.
    pub missing_companions: usize,
}

impl LoadStats {
    /// Total indexed records.
    pub fn total_loaded(&self) -> usize {
        self.loaded.values().sum()
    }
}

/// Loads source records into the run's index.
pub struct RecordLoader<'a> {
    registry: &'a ModelRegistry,
    resolver: ReferenceResolver<'a>,
    companions: Companions,
    index: RecordIndex,
    drift: DriftTracker,
    stats: LoadStats,
}

impl<'a> RecordLoader<'a> {
    /// Create a loader with an empty index.
    pub fn new(registry: &'a ModelRegistry, companions: Companions) -> Self {
        Self {
            registry,
            resolver: ReferenceResolver::new(registry),
            companions,
            index: RecordIndex::new(),
            drift: DriftTracker::new(),
            stats: LoadStats::default(),
        }
    }

    /// Load one source record as a `schema` record.
    ///
    /// Returns the indexed record, or `None` when the record was rejected
    /// or duplicated an already indexed key.
    pub fn load(
        &mut self,
        schema: &ModelSchema,
        record: &SourceRecord,
        sink: &mut dyn RecordSink,
    ) -> Result<Option<&ResolvedRecord>> {
        let mut data = record.fields.clone();
        data.insert("pk".to_string(), Value::from(record.pk));

        for (field, target) in schema.foreign_keys {
            if !field_is_set(&data, field) {
                continue;
            }
            let raw = data.get(*field).cloned().unwrap_or(Value::Null);

            let resolved = match self.resolver.resolve(&raw, *target, &record.fields, &self.index) {
                Ok(resolution) => {
                    for skipped in &resolution.skipped {
                        self.field_error(schema, record.pk, field, skipped);
                    }
                    resolution.value
                }
                Err(e) => {
                    self.field_error(schema, record.pk, field, &e);
                    Value::Null
                }
            };
            data.insert(field.to_string(), resolved);
        }

        if let Some(fixup) = Fixup::for_model(schema.name) {
            fixup.apply(self, record, &mut data, sink)?;
        }

        let Some(resolved) = self.construct(schema, PkValue::Int(record.pk), &data) else {
            return Ok(None);
        };

        let ignored = ignored_fields(schema, &data, &resolved);
        if !ignored.is_empty() {
            let details = ignored
                .iter()
                .map(|name| format!("{}={}", name, data.get(name).unwrap_or(&Value::Null)))
                .collect::<Vec<_>>()
                .join(", ");
            debug!(
                model = schema.name,
                pk = record.pk,
                "NetBox fields not defined for {} - {}, ignored by the Nautobot import: {}",
                schema.name,
                resolved,
                details
            );
            self.drift.report(schema.name, &ignored);
        }

        match self.commit(schema, resolved, sink)? {
            Some(key) => Ok(self.index.get(schema.label, &key)),
            None => Ok(None),
        }
    }

    /// Construct a record that did not come from the dump and feed it through
    /// the same construct/index/sink path.
    pub fn synthesize(
        &mut self,
        schema: &ModelSchema,
        key: PkValue,
        data: FieldMap,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        if let Some(record) = self.construct(schema, key, &data) {
            if self.commit(schema, record, sink)?.is_some() {
                self.stats.synthesized += 1;
            }
        }
        Ok(())
    }

    /// Build the target-shaped record from a fixed-up field map.
    fn construct(&mut self, schema: &ModelSchema, key: PkValue, data: &FieldMap) -> Option<ResolvedRecord> {
        let mut fields = FieldMap::new();
        for (name, value) in data {
            if let Some(field) = schema.field_for(name) {
                fields.insert(field.to_string(), value.clone());
            }
        }

        let missing = schema.missing_required(&fields);
        if !missing.is_empty() {
            error!(
                model = schema.name,
                pk = %key,
                missing = %missing.join(", "),
                "Invalid data according to internal data model"
            );
            self.stats.rejected += 1;
            return None;
        }

        let id = match (schema.ownership, &key) {
            (Ownership::PassThrough, _) => None,
            (Ownership::Owned, PkValue::Int(pk)) => Some(derive(schema.name, *pk)),
            (Ownership::Owned, PkValue::Uuid(id)) => Some(*id),
        };
        if let Some(id) = id {
            fields.insert("pk".to_string(), Value::String(id.to_string()));
        }

        let ignored = schema.ignore.map_or(false, |rule| rule(&fields, self.registry));

        Some(ResolvedRecord {
            model: schema.name,
            label: schema.label,
            key,
            id,
            fields,
            ignored,
        })
    }

    /// Index a constructed record and hand it to the sink. Returns the key
    /// it was indexed under, or `None` for a duplicate.
    fn commit(
        &mut self,
        schema: &ModelSchema,
        record: ResolvedRecord,
        sink: &mut dyn RecordSink,
    ) -> Result<Option<PkValue>> {
        let key = record.key.clone();
        let ignored = record.ignored;

        if !self.index.insert(record) {
            warn!(model = schema.name, pk = %key, "Apparent duplicate object encountered, keeping the first one");
            self.stats.duplicates += 1;
            return Ok(None);
        }

        if ignored {
            debug!(model = schema.name, pk = %key, "Record matches no Nautobot object, skipping it");
            self.stats.ignored += 1;
        } else if let Some(stored) = self.index.get(schema.label, &key) {
            sink.accept(schema, stored)?;
            self.stats.sunk += 1;
        }

        *self.stats.loaded.entry(schema.name.to_string()).or_default() += 1;
        Ok(Some(key))
    }

    fn field_error(&mut self, schema: &ModelSchema, pk: i64, field: &str, err: &FieldError) {
        if err.is_warning() {
            warn!(model = schema.name, pk, field, "{}", err);
        } else {
            error!(model = schema.name, pk, field, "{}", err);
        }
        self.stats.field_errors += 1;
    }

    /// The model registry.
    pub fn registry(&self) -> &'a ModelRegistry {
        self.registry
    }

    /// Records indexed so far.
    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    /// Drift reported so far.
    pub fn drift(&self) -> &DriftTracker {
        &self.drift
    }

    /// Counters so far.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Consume the loader, returning the index, drift table and counters.
    pub fn into_parts(self) -> (RecordIndex, DriftTracker, LoadStats) {
        (self.index, self.drift, self.stats)
    }
}

/// NetBox fields with values that the constructed record did not take.
///
/// Private fields (leading `_`), aliases and fields the model drops on
/// purpose are not drift.
pub fn ignored_fields(schema: &ModelSchema, data: &FieldMap, record: &ResolvedRecord) -> BTreeSet<String> {
    data.iter()
        .filter(|(name, value)| is_truthy(value) && !name.starts_with('_'))
        .map(|(name, _)| name)
        .filter(|name| {
            !record.fields.contains_key(name.as_str())
                && !schema.is_alias(name)
                && !schema.is_intentionally_ignored(name)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests;
