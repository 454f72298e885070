//! Model registry for explicit dependency injection.
//!
//! The [`ModelRegistry`] maps registry names (`"device"`) to their
//! [`ModelSchema`]. It is constructed once, handed to the orchestrator and
//! never mutated during a run. Target models are looked up by name from FK
//! declarations and by label from content-type records.

use std::collections::{HashMap, HashSet};

use super::record::ResolvedRecord;
use super::schema::{FkTarget, ModelSchema};

/// Models loaded before everything else, in this order, because every other
/// model may reference them by natural key.
pub const PRELOAD_MODELS: &[&str] = &["contenttype", "permission"];

/// Registry of target model descriptors.
///
/// # Example
///
/// ```rust
/// use netbox_import::core::{ModelRegistry, ModelSchema};
///
/// const TAG: ModelSchema = ModelSchema {
///     fields: &["name", "slug"],
///     ..ModelSchema::owned("tag", "extras.tag")
/// };
///
/// let mut registry = ModelRegistry::new();
/// registry.register(TAG);
/// assert_eq!(registry.label("tag"), Some("extras.tag"));
/// assert!(registry.get("site").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
    /// Registered models by name.
    models: HashMap<&'static str, ModelSchema>,

    /// Model names by Nautobot label.
    labels: HashMap<&'static str, &'static str>,

    /// Labels of Nautobot content types that exist in the target even though
    /// the importer does not transform their rows.
    extra_content_types: HashSet<&'static str>,

    /// Load order after [`PRELOAD_MODELS`].
    top_level: Vec<&'static str>,
}

impl ModelRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the builtin NetBox-to-Nautobot models.
    pub fn with_builtins() -> Self {
        crate::models::builtin_registry()
    }

    /// Register a model. Re-registering a name replaces the descriptor.
    pub fn register(&mut self, schema: ModelSchema) {
        self.labels.insert(schema.label, schema.name);
        self.models.insert(schema.name, schema);
    }

    /// Declare a Nautobot content type the importer does not transform.
    pub fn register_content_type(&mut self, label: &'static str) {
        self.extra_content_types.insert(label);
    }

    /// Set the load order of the non-preloaded models.
    pub fn set_top_level(&mut self, order: &[&'static str]) {
        self.top_level = order.to_vec();
    }

    /// Get a model by registry name.
    pub fn get(&self, name: &str) -> Option<&ModelSchema> {
        self.models.get(name)
    }

    /// Get a model by Nautobot label.
    pub fn get_by_label(&self, label: &str) -> Option<&ModelSchema> {
        self.labels.get(label).and_then(|name| self.models.get(name))
    }

    /// Whether Nautobot has a content type with this label.
    pub fn knows_content_type(&self, label: &str) -> bool {
        self.labels.contains_key(label) || self.extra_content_types.contains(label)
    }

    /// Accepted field names of a model.
    pub fn fields(&self, name: &str) -> Option<&'static [&'static str]> {
        self.get(name).map(|s| s.fields)
    }

    /// NetBox-to-Nautobot field renames of a model.
    pub fn aliases(&self, name: &str) -> Option<&'static [(&'static str, &'static str)]> {
        self.get(name).map(|s| s.aliases)
    }

    /// Foreign-key declarations of a model.
    pub fn fk_declarations(&self, name: &str) -> Option<&'static [(&'static str, FkTarget)]> {
        self.get(name).map(|s| s.foreign_keys)
    }

    /// Whether a model is referenced by natural key.
    pub fn is_pass_through(&self, name: &str) -> bool {
        self.get(name).map_or(false, ModelSchema::is_pass_through)
    }

    /// Whether a resolved record is skipped along with references to it.
    pub fn is_ignorable(&self, record: &ResolvedRecord) -> bool {
        record.ignored
    }

    /// Nautobot label of a model.
    pub fn label(&self, name: &str) -> Option<&'static str> {
        self.get(name).map(|s| s.label)
    }

    /// Full load order: [`PRELOAD_MODELS`] then the top-level order, with
    /// duplicates removed.
    pub fn load_order(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        PRELOAD_MODELS
            .iter()
            .chain(self.top_level.iter())
            .copied()
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
