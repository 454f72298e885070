//! Target model descriptors.
//!
//! A [`ModelSchema`] is the static description of one Nautobot model as the
//! importer sees it: which NetBox fields it accepts, which of them are
//! foreign keys and where they point, and whether Nautobot owns the model
//! (keyed by derived UUIDs) or merely references it by natural key.

use std::fmt;

use serde_json::Value;

use super::catalog::ModelRegistry;
use super::value::FieldMap;

/// Where a foreign-key field points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkTarget {
    /// A fixed target model, by registry name.
    Direct(&'static str),
    /// Generic FK: the named sibling field holds a content-type PK which
    /// decides the target model per record.
    Generic(&'static str),
    /// NetBox status choice, turned into a `{"slug": ...}` natural key.
    Status,
}

/// Whether Nautobot owns a model's primary keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Keyed by UUIDs the importer derives.
    Owned,
    /// Django-level model (content types, permissions, groups) whose rows
    /// already exist in Nautobot; referenced by natural key.
    PassThrough,
}

/// Predicate deciding whether a constructed pass-through record should be
/// skipped, along with every reference to it.
pub type IgnoreRule = fn(&FieldMap, &ModelRegistry) -> bool;

/// Static description of one target model.
#[derive(Clone)]
pub struct ModelSchema {
    /// Registry name, the lowercase model class name (`"device"`).
    pub name: &'static str,

    /// Nautobot label, `app_label.model` (`"dcim.device"`).
    pub label: &'static str,

    /// Owned or pass-through.
    pub ownership: Ownership,

    /// Field names the model accepts. `pk` is always accepted.
    pub fields: &'static [&'static str],

    /// NetBox field name to model field name renames.
    pub aliases: &'static [(&'static str, &'static str)],

    /// Foreign-key fields and their targets.
    pub foreign_keys: &'static [(&'static str, FkTarget)],

    /// NetBox fields that are dropped on purpose and never reported as drift.
    pub ignored_fields: &'static [&'static str],

    /// Fields that must be present and non-null for a record to be accepted.
    pub required: &'static [&'static str],

    /// Fields making up the natural key of a pass-through model.
    pub natural_key: &'static [&'static str],

    /// Optional skip predicate, evaluated after construction.
    pub ignore: Option<IgnoreRule>,
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("ownership", &self.ownership)
            .field("foreign_keys", &self.foreign_keys)
            .finish_non_exhaustive()
    }
}

impl ModelSchema {
    /// Base descriptor for a model whose keys the importer derives.
    pub const fn owned(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            ownership: Ownership::Owned,
            fields: &[],
            aliases: &[],
            foreign_keys: &[],
            ignored_fields: &[],
            required: &[],
            natural_key: &[],
            ignore: None,
        }
    }

    /// Base descriptor for a model referenced by natural key.
    pub const fn pass_through(name: &'static str, label: &'static str) -> Self {
        Self {
            ownership: Ownership::PassThrough,
            ..Self::owned(name, label)
        }
    }

    /// Whether Nautobot already has these rows and they are referenced by
    /// natural key rather than derived UUID.
    pub fn is_pass_through(&self) -> bool {
        self.ownership == Ownership::PassThrough
    }

    /// Whether `name` is a field of this model (`pk` always is).
    pub fn has_field(&self, name: &str) -> bool {
        name == "pk" || self.fields.contains(&name)
    }

    /// Model field name for a NetBox field name, following aliases.
    pub fn field_for(&self, source_name: &str) -> Option<&'static str> {
        if let Some((_, field)) = self.aliases.iter().find(|(alias, _)| *alias == source_name) {
            return Some(*field);
        }
        if source_name == "pk" {
            return Some("pk");
        }
        self.fields.iter().copied().find(|f| *f == source_name)
    }

    /// Whether `name` is a NetBox alias of some model field.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|(alias, _)| *alias == name)
    }

    /// Whether `name` is dropped on purpose.
    pub fn is_intentionally_ignored(&self, name: &str) -> bool {
        self.ignored_fields.contains(&name)
    }

    /// Declared FK target of `field`, if it is a foreign key.
    pub fn fk_target(&self, field: &str) -> Option<FkTarget> {
        self.foreign_keys
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, target)| *target)
    }

    /// Required fields missing (or null) from `fields`.
    pub fn missing_required(&self, fields: &FieldMap) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|name| fields.get(*name).map_or(true, Value::is_null))
            .collect()
    }
}
