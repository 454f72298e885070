//! Import orchestrator - drives one run over a NetBox dump.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::NetboxVersion;
use crate::core::{ModelRegistry, ModelSchema, ProgressReporter, RecordSink};
use crate::error::{ImportError, Result};
use crate::loader::{Companions, LoadStats, RecordLoader, USER_CONFIG_LABEL};
use crate::progress::NoProgress;
use crate::source::SourceDataset;

/// Import orchestrator.
///
/// Owns the registry and progress display for exactly one run: [`run`]
/// consumes it, so the index and drift table it builds can never leak
/// into a second run.
///
/// [`run`]: Orchestrator::run
pub struct Orchestrator {
    registry: ModelRegistry,
    progress: Box<dyn ProgressReporter>,
    netbox_version: Option<NetboxVersion>,
}

/// Result of an import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status.
    pub status: String,

    /// NetBox release the dump came from, when known.
    pub netbox_version: Option<String>,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Records in the dump.
    pub records_read: usize,

    /// Loader counters.
    pub stats: LoadStats,

    /// NetBox fields no Nautobot model accepts, per model.
    pub unsupported_fields: BTreeMap<String, BTreeSet<String>>,

    /// Dump labels no model loads, with their record counts.
    pub unhandled_labels: BTreeMap<String, usize>,
}

impl ImportResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Orchestrator {
    /// Create an orchestrator with no progress display.
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            progress: Box::new(NoProgress),
            netbox_version: None,
        }
    }

    /// Report per-model progress.
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Record the NetBox release of the dump in the run summary.
    pub fn with_netbox_version(mut self, version: NetboxVersion) -> Self {
        self.netbox_version = Some(version);
        self
    }

    /// The model registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Load every record of `dataset` in registry load order, handing the
    /// resolved records to `sink`.
    pub fn run(self, dataset: SourceDataset, sink: &mut dyn RecordSink) -> Result<ImportResult> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();
        let Self {
            registry,
            mut progress,
            netbox_version,
        } = self;

        info!(
            run_id = %run_id,
            records = dataset.len(),
            "Loading imported NetBox source data"
        );

        let companions = Companions::collect(&dataset);
        debug!(user_configs = companions.len(), "Collected companion records");

        let mut loader = RecordLoader::new(&registry, companions);
        let mut handled: BTreeSet<&str> = BTreeSet::from([USER_CONFIG_LABEL]);

        for name in registry.load_order() {
            let schema = registry.get(name).ok_or_else(|| {
                ImportError::Registry(format!("load order names unregistered model '{}'", name))
            })?;
            let label = source_label(schema);
            handled.insert(label);

            let records: Vec<_> = dataset.records_for(label).collect();
            if records.is_empty() {
                continue;
            }

            debug!(model = name, label, records = records.len(), "Loading model");
            progress.start(name, records.len());
            for record in records {
                loader.load(schema, record, sink)?;
                progress.advance();
            }
            progress.finish();
        }

        sink.finish()?;

        let records_read = dataset.len();
        let unhandled_labels: BTreeMap<String, usize> = dataset
            .label_counts()
            .into_iter()
            .filter(|(label, _)| !handled.contains(label))
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        for (label, count) in &unhandled_labels {
            debug!(label = %label, records = count, "No model loads these records");
        }
        drop(dataset);

        let (_index, drift, stats) = loader.into_parts();
        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let result = ImportResult {
            run_id,
            status: "completed".to_string(),
            netbox_version: netbox_version.map(|v| v.to_string()),
            started_at,
            completed_at,
            duration_seconds,
            records_read,
            stats,
            unsupported_fields: drift.into_table(),
            unhandled_labels,
        };

        info!(
            "Data loading from NetBox source data complete: {} records loaded, {} written, {} rejected in {:.1}s",
            result.stats.total_loaded(),
            result.stats.sunk,
            result.stats.rejected,
            result.duration_seconds
        );

        Ok(result)
    }
}

/// NetBox label holding a model's records. Nautobot's `users.user` is
/// Django's `auth.user` in NetBox dumps.
pub fn source_label(schema: &ModelSchema) -> &'static str {
    match schema.label {
        "users.user" => "auth.user",
        label => label,
    }
}
