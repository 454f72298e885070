//! Per-model structural fixups.
//!
//! A few NetBox models differ from their Nautobot counterpart in shape, not
//! just in field names. The set is closed: every fixup is a variant of
//! [`Fixup`], selected by model name.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::RecordLoader;
use crate::core::{derive, derive_child, FieldMap, PkValue, RecordSink, SourceRecord};
use crate::error::{ImportError, Result};
use crate::models::auth::nautobot_app_label;

/// NetBox label of the per-user configuration records.
pub const USER_CONFIG_LABEL: &str = "users.userconfig";

const CHOICE_MODEL: &str = "customfieldchoice";

/// Records that belong to another record of a different model.
///
/// NetBox keeps user preferences in `users.userconfig`; Nautobot stores
/// them on the user itself. The companions are gathered once per run so
/// the user fixup does not rescan the dataset per user.
#[derive(Debug, Default, Clone)]
pub struct Companions {
    user_configs: HashMap<i64, Value>,
}

impl Companions {
    /// No companions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect companions from the whole dataset. When several configs
    /// name the same user, the first one wins.
    pub fn collect<'r, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'r SourceRecord>,
    {
        let mut user_configs = HashMap::new();
        for record in records {
            if record.model != USER_CONFIG_LABEL {
                continue;
            }
            let Some(user) = record.fields.get("user").and_then(Value::as_i64) else {
                continue;
            };
            let data = record.fields.get("data").cloned().unwrap_or(Value::Null);
            user_configs.entry(user).or_insert(data);
        }
        Self { user_configs }
    }

    /// Configuration payload for a NetBox user key.
    pub fn user_config(&self, user_pk: i64) -> Option<&Value> {
        self.user_configs.get(&user_pk)
    }

    /// Number of users with a configuration record.
    pub fn len(&self) -> usize {
        self.user_configs.len()
    }

    /// Returns true if no configuration records were found.
    pub fn is_empty(&self) -> bool {
        self.user_configs.is_empty()
    }
}

/// A structural fixup applied after FK resolution and before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixup {
    /// Rename content types whose app moved in Nautobot.
    ContentType,
    /// Merge the user's config record into `config_data`.
    User,
    /// Defer `required` and split select choices into their own records.
    CustomField,
    /// Cast the decimal `vcpus` to an integer.
    VirtualMachine,
}

impl Fixup {
    /// The fixup for a model, if it has one.
    pub fn for_model(name: &str) -> Option<Fixup> {
        match name {
            "contenttype" => Some(Fixup::ContentType),
            "user" => Some(Fixup::User),
            "customfield" => Some(Fixup::CustomField),
            "virtualmachine" => Some(Fixup::VirtualMachine),
            _ => None,
        }
    }

    /// Apply the fixup to `data`, the resolved field map of `record`.
    pub fn apply(
        self,
        loader: &mut RecordLoader<'_>,
        record: &SourceRecord,
        data: &mut FieldMap,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        match self {
            Fixup::ContentType => {
                rename_content_type(record, data);
                Ok(())
            }
            Fixup::User => {
                attach_user_config(loader, record, data);
                Ok(())
            }
            Fixup::CustomField => split_custom_field(loader, record, data, sink),
            Fixup::VirtualMachine => {
                cast_vcpus(record, data);
                Ok(())
            }
        }
    }
}

fn rename_content_type(record: &SourceRecord, data: &mut FieldMap) {
    let (Some(app_label), Some(model)) = (
        data.get("app_label").and_then(Value::as_str),
        data.get("model").and_then(Value::as_str),
    ) else {
        return;
    };
    let renamed = nautobot_app_label(app_label, model);
    if renamed == app_label {
        return;
    }

    debug!(pk = record.pk, from = app_label, to = renamed, model, "Renaming content type app label");
    let renamed = Value::String(renamed.to_string());
    data.insert("app_label".to_string(), renamed);
}

fn attach_user_config(loader: &mut RecordLoader<'_>, record: &SourceRecord, data: &mut FieldMap) {
    let username = data
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    debug!(username = %username, "Looking for UserConfig corresponding to User");

    let config = match loader.companions.user_config(record.pk) {
        Some(config) => config.clone(),
        None => {
            warn!(username = %username, pk = record.pk, "No UserConfig found for User");
            loader.stats.missing_companions += 1;
            Value::Object(FieldMap::new())
        }
    };
    data.insert("config_data".to_string(), config);
}

fn split_custom_field(
    loader: &mut RecordLoader<'_>,
    record: &SourceRecord,
    data: &mut FieldMap,
    sink: &mut dyn RecordSink,
) -> Result<()> {
    // Existing objects may predate the field, so it is never enforced here.
    let required = data.get("required").cloned().unwrap_or(Value::Bool(false));
    data.insert("actual_required".to_string(), required);
    data.insert("required".to_string(), Value::Bool(false));

    let choices = data.remove("choices");
    if data.get("type").and_then(Value::as_str) != Some("select") {
        return Ok(());
    }

    let registry = loader.registry();
    let schema = registry.get(CHOICE_MODEL).ok_or_else(|| {
        ImportError::Registry(format!("model '{}' is not registered", CHOICE_MODEL))
    })?;

    let parent = derive("customfield", record.pk).to_string();
    for (position, choice) in parse_choices(record.pk, choices.as_ref()).into_iter().enumerate() {
        let id = derive_child(CHOICE_MODEL, record.pk, &choice_discriminator(position, &choice));

        let mut fields = FieldMap::new();
        fields.insert("pk".to_string(), Value::String(id.to_string()));
        fields.insert("field".to_string(), Value::String(parent.clone()));
        fields.insert("value".to_string(), choice);
        loader.synthesize(schema, PkValue::Uuid(id), fields, sink)?;
    }
    Ok(())
}

/// Repeated choice values still get distinct ids.
fn choice_discriminator(position: usize, choice: &Value) -> String {
    match choice {
        Value::String(s) => format!("{}:{}", position, s),
        other => format!("{}:{}", position, other),
    }
}

/// Choices arrive either as a JSON-encoded array string or as an array.
fn parse_choices(pk: i64, raw: Option<&Value>) -> Vec<Value> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(encoded)) => match serde_json::from_str::<Vec<Value>>(encoded) {
            Ok(items) => items,
            Err(e) => {
                error!(pk, "Invalid choices for custom field: {}", e);
                Vec::new()
            }
        },
        Some(other) => {
            error!(pk, "Invalid choices for custom field: {}", other);
            Vec::new()
        }
    }
}

fn cast_vcpus(record: &SourceRecord, data: &mut FieldMap) {
    let Some(raw) = data.get("vcpus") else {
        return;
    };
    if raw.is_null() {
        return;
    }

    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let cast = match parsed {
        Some(v) if v.is_finite() => Value::from(v.trunc() as i64),
        _ => {
            error!(pk = record.pk, value = %raw, "Invalid vcpus value");
            Value::Null
        }
    };
    data.insert("vcpus".to_string(), cast);
}
