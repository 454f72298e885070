//! # netbox-import
//!
//! Transform a NetBox data dump into Nautobot-shaped records.
//!
//! This library provides the core of a NetBox to Nautobot import:
//!
//! - **Deterministic identifiers**: every NetBox integer key maps to the same
//!   Nautobot UUID on every run
//! - **Reference resolution** for plain, many-to-many and generic foreign keys
//! - **Structural fixups** for users, custom fields and virtual machines
//! - **Schema drift reporting** deduplicated per model and field
//! - **Pluggable sinks** (JSON lines, in-memory, dry run)
//!
//! ## Example
//!
//! ```rust,no_run
//! use netbox_import::{ModelRegistry, Orchestrator, SourceDataset};
//! use netbox_import::target::JsonLinesSink;
//!
//! fn main() -> netbox_import::Result<()> {
//!     let dataset = SourceDataset::load("netbox.json")?;
//!     let mut sink = JsonLinesSink::create("nautobot.jsonl")?;
//!     let result = Orchestrator::new(ModelRegistry::with_builtins()).run(dataset, &mut sink)?;
//!     println!("Loaded {} records", result.stats.total_loaded());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drift;
pub mod error;
pub mod index;
pub mod loader;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod resolver;
pub mod source;
pub mod target;

// Re-exports for convenient access
pub use config::{Config, ImportConfig, NetboxVersion, OutputConfig, SourceConfig};
pub use core::{ModelRegistry, ModelSchema, ProgressReporter, RecordSink, ResolvedRecord, SourceRecord};
pub use error::{FieldError, ImportError, Result};
pub use loader::{LoadStats, RecordLoader};
pub use orchestrator::{ImportResult, Orchestrator};
pub use source::SourceDataset;
