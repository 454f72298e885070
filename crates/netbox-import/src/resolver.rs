//! Foreign-key reference resolution.
//!
//! Rewrites a NetBox FK value (an integer, or a list of integers for
//! many-to-many fields) into its Nautobot form:
//!
//! - owned target: the derived UUID, as a string
//! - pass-through target: the natural-key descriptor of the indexed record
//! - status pseudo-target: `{"slug": value}`
//!
//! Generic FKs first read their content-type discriminator from the same
//! record to find the actual target model.

use serde_json::{json, Value};
use tracing::debug;

use crate::core::{derive, FieldMap, FkTarget, ModelRegistry, ModelSchema, Ownership};
use crate::error::FieldError;
use crate::index::RecordIndex;

/// Registry name of the content-type model generic FKs dereference.
const CONTENT_TYPE_MODEL: &str = "contenttype";

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Value to store in the field.
    pub value: Value,

    /// List elements that were dropped because they could not be resolved.
    pub skipped: Vec<FieldError>,
}

impl Resolution {
    fn value(value: Value) -> Self {
        Self {
            value,
            skipped: Vec::new(),
        }
    }
}

/// Resolves FK values against a registry and the records indexed so far.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a resolver.
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `raw` declared with `target`.
    ///
    /// `record_fields` are the source record's own fields, used to read a
    /// generic FK's discriminator.
    pub fn resolve(
        &self,
        raw: &Value,
        target: FkTarget,
        record_fields: &FieldMap,
        index: &RecordIndex,
    ) -> Result<Resolution, FieldError> {
        if raw.is_null() {
            return Ok(Resolution::value(Value::Null));
        }

        let schema = match target {
            FkTarget::Status => return Ok(Resolution::value(json!({ "slug": raw }))),
            FkTarget::Direct(name) => self.target_schema(name)?,
            FkTarget::Generic(discriminator) => {
                let name = self.discriminated_model(discriminator, record_fields, index)?;
                self.target_schema(&name)?
            }
        };

        match raw {
            Value::Number(_) => {
                let pk = raw.as_i64().ok_or_else(|| FieldError::InvalidPk(raw.clone()))?;
                let value = self.resolve_key(schema, pk, index)?.unwrap_or(Value::Null);
                Ok(Resolution::value(value))
            }
            Value::Array(items) => {
                let pks = items
                    .iter()
                    .map(Value::as_i64)
                    .collect::<Option<Vec<i64>>>()
                    .ok_or_else(|| FieldError::InvalidPk(raw.clone()))?;

                let mut resolution = Resolution::value(Value::Null);
                let mut values = Vec::with_capacity(pks.len());
                for pk in pks {
                    match self.resolve_key(schema, pk, index) {
                        Ok(Some(value)) => values.push(value),
                        Ok(None) => debug!(target_model = schema.name, pk, "Dropping reference to ignored record"),
                        Err(e) => resolution.skipped.push(e),
                    }
                }
                resolution.value = Value::Array(values);
                Ok(resolution)
            }
            _ => Err(FieldError::InvalidPk(raw.clone())),
        }
    }

    /// Resolve one NetBox key of `schema`. `Ok(None)` means the referenced
    /// record exists but is ignored.
    fn resolve_key(
        &self,
        schema: &ModelSchema,
        pk: i64,
        index: &RecordIndex,
    ) -> Result<Option<Value>, FieldError> {
        match schema.ownership {
            Ownership::Owned => Ok(Some(Value::String(derive(schema.name, pk).to_string()))),
            Ownership::PassThrough => match index.get_int(schema.label, pk) {
                Some(record) if self.registry.is_ignorable(record) => Ok(None),
                Some(record) => Ok(Some(record.natural_key(schema))),
                None => Err(FieldError::MissingReference {
                    target: schema.name.to_string(),
                    pk,
                }),
            },
        }
    }

    /// Read a generic FK's content-type discriminator and return the model
    /// name it designates.
    fn discriminated_model(
        &self,
        discriminator: &str,
        record_fields: &FieldMap,
        index: &RecordIndex,
    ) -> Result<String, FieldError> {
        let raw = record_fields.get(discriminator).unwrap_or(&Value::Null);
        let pk = raw
            .as_i64()
            .ok_or_else(|| FieldError::InvalidContentTypePk(raw.clone()))?;

        let content_type = self.target_schema(CONTENT_TYPE_MODEL)?;
        let record = index
            .get_int(content_type.label, pk)
            .ok_or(FieldError::ContentTypeNotFound(pk))?;

        match record.get("model").and_then(Value::as_str) {
            Some(model) => Ok(model.to_string()),
            None => Err(FieldError::UnknownTarget(format!("content type {}", pk))),
        }
    }

    fn target_schema(&self, name: &str) -> Result<&'a ModelSchema, FieldError> {
        self.registry
            .get(name)
            .ok_or_else(|| FieldError::UnknownTarget(name.to_string()))
    }
}
