//! Source and resolved record types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::schema::ModelSchema;
use super::value::{FieldMap, PkValue};

/// One row of the NetBox dump, in Django `dumpdata` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// NetBox label, `app_label.model`.
    pub model: String,

    /// NetBox surrogate key, unique within `model`.
    pub pk: i64,

    /// Column values.
    #[serde(default)]
    pub fields: FieldMap,
}

impl SourceRecord {
    /// Create a record.
    pub fn new(model: impl Into<String>, pk: i64, fields: FieldMap) -> Self {
        Self {
            model: model.into(),
            pk,
            fields,
        }
    }
}

/// A record re-expressed in the target schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    /// Registry name of the target model.
    pub model: &'static str,

    /// Nautobot label of the target model.
    pub label: &'static str,

    /// Key the record is indexed under.
    #[serde(skip)]
    pub key: PkValue,

    /// Derived Nautobot primary key (owned models only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Accepted fields, after FK resolution and alias renaming.
    pub fields: FieldMap,

    /// Set when the model's ignore rule matched; the record is indexed so
    /// references to it can be dropped, but it is never handed to a sink.
    #[serde(skip)]
    pub ignored: bool,
}

impl ResolvedRecord {
    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Names of the fields that were set on the record.
    pub fn fields_set(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Natural-key descriptor used to reference a pass-through record.
    pub fn natural_key(&self, schema: &ModelSchema) -> Value {
        let descriptor: FieldMap = schema
            .natural_key
            .iter()
            .map(|name| {
                let value = self.fields.get(*name).cloned().unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        Value::Object(descriptor)
    }
}

impl fmt::Display for ResolvedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} {} ({})", self.model, self.key, id),
            None => write!(f, "{} {}", self.model, self.key),
        }
    }
}
