use crate::core::{FkTarget, ModelSchema};

pub const TENANT_GROUP: ModelSchema = ModelSchema {
    fields: &["name", "slug", "parent", "description", "custom_field_data", "created", "last_updated"],
    foreign_keys: &[("parent", FkTarget::Direct("tenantgroup"))],
    required: &["name", "slug"],
    ..ModelSchema::owned("tenantgroup", "tenancy.tenantgroup")
};

pub const TENANT: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "slug",
        "group",
        "description",
        "comments",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[("group", FkTarget::Direct("tenantgroup"))],
    required: &["name", "slug"],
    ..ModelSchema::owned("tenant", "tenancy.tenant")
};

pub const MODELS: &[ModelSchema] = &[TENANT_GROUP, TENANT];
