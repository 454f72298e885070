//! Tags, custom fields and their choices.

use crate::core::{FkTarget, ModelSchema};

pub const TAG: ModelSchema = ModelSchema {
    fields: &["name", "slug", "color", "description", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("tag", "extras.tag")
};

/// Tag assignment; `object_id` points at whatever `content_type` names.
pub const TAGGED_ITEM: ModelSchema = ModelSchema {
    fields: &["content_type", "object_id", "tag"],
    foreign_keys: &[
        ("content_type", FkTarget::Direct("contenttype")),
        ("object_id", FkTarget::Generic("content_type")),
        ("tag", FkTarget::Direct("tag")),
    ],
    required: &["tag"],
    ..ModelSchema::owned("taggeditem", "extras.taggeditem")
};

/// Custom field. `required` is deferred to `actual_required` and select
/// choices become [`CUSTOM_FIELD_CHOICE`] records.
pub const CUSTOM_FIELD: ModelSchema = ModelSchema {
    fields: &[
        "content_types",
        "type",
        "name",
        "label",
        "description",
        "required",
        "actual_required",
        "filter_logic",
        "default",
        "weight",
        "validation_minimum",
        "validation_maximum",
        "validation_regex",
    ],
    foreign_keys: &[("content_types", FkTarget::Direct("contenttype"))],
    required: &["name", "type"],
    ..ModelSchema::owned("customfield", "extras.customfield")
};

/// Synthesized from a select custom field's `choices`.
pub const CUSTOM_FIELD_CHOICE: ModelSchema = ModelSchema {
    fields: &["field", "value", "weight"],
    foreign_keys: &[("field", FkTarget::Direct("customfield"))],
    required: &["field", "value"],
    ..ModelSchema::owned("customfieldchoice", "extras.customfieldchoice")
};

pub const MODELS: &[ModelSchema] = &[TAG, TAGGED_ITEM, CUSTOM_FIELD, CUSTOM_FIELD_CHOICE];
