//! Core abstractions shared by every stage of an import.
//!
//! - [`identifier`]: deterministic NetBox key to Nautobot UUID derivation
//! - [`value`]: field maps, primary keys, truthiness
//! - [`record`]: source and resolved record types
//! - [`schema`]: target model descriptors and FK declarations
//! - [`catalog`]: the model registry
//! - [`traits`]: sink and progress seams

pub mod catalog;
pub mod identifier;
pub mod record;
pub mod schema;
pub mod traits;
pub mod value;

pub use catalog::{ModelRegistry, PRELOAD_MODELS};
pub use identifier::{derive, derive_child};
pub use record::{ResolvedRecord, SourceRecord};
pub use schema::{FkTarget, IgnoreRule, ModelSchema, Ownership};
pub use traits::{ProgressReporter, RecordSink};
pub use value::{field_is_set, is_truthy, FieldMap, PkValue};
