//! Django framework models and users.
//!
//! Content types, permissions and groups already exist in every Nautobot
//! install and are referenced by natural key. Users are owned: NetBox's
//! `auth.user` rows become `users.user` rows keyed by derived UUIDs.

use serde_json::Value;

use crate::core::{FieldMap, FkTarget, ModelRegistry, ModelSchema};

/// `contenttypes.contenttype`, skipped when Nautobot has no such model.
/// NetBox's `auth.user` row is renamed to `users.user` before the check.
pub const CONTENT_TYPE: ModelSchema = ModelSchema {
    fields: &["app_label", "model"],
    required: &["app_label", "model"],
    natural_key: &["app_label", "model"],
    ignore: Some(content_type_unknown),
    ..ModelSchema::pass_through("contenttype", "contenttypes.contenttype")
};

/// `auth.permission`, skipped when its content type was.
pub const PERMISSION: ModelSchema = ModelSchema {
    fields: &["name", "content_type", "codename"],
    foreign_keys: &[("content_type", FkTarget::Direct("contenttype"))],
    required: &["codename"],
    natural_key: &["codename", "content_type"],
    ignore: Some(content_type_missing),
    ..ModelSchema::pass_through("permission", "auth.permission")
};

pub const GROUP: ModelSchema = ModelSchema {
    fields: &["name", "permissions"],
    foreign_keys: &[("permissions", FkTarget::Direct("permission"))],
    required: &["name"],
    natural_key: &["name"],
    ..ModelSchema::pass_through("group", "auth.group")
};

/// Nautobot user; read from NetBox's `auth.user` rows.
pub const USER: ModelSchema = ModelSchema {
    fields: &[
        "password",
        "last_login",
        "is_superuser",
        "username",
        "first_name",
        "last_name",
        "email",
        "is_staff",
        "is_active",
        "date_joined",
        "groups",
        "user_permissions",
        "config_data",
    ],
    foreign_keys: &[
        ("groups", FkTarget::Direct("group")),
        ("user_permissions", FkTarget::Direct("permission")),
    ],
    required: &["username"],
    ..ModelSchema::owned("user", "users.user")
};

pub const MODELS: &[ModelSchema] = &[CONTENT_TYPE, PERMISSION, GROUP, USER];

/// Content types whose app moved between NetBox and Nautobot, as
/// `(netbox_app_label, model, nautobot_app_label)`.
const MOVED_CONTENT_TYPES: &[(&str, &str, &str)] = &[("auth", "user", "users")];

/// Nautobot app label of a NetBox content type.
pub fn nautobot_app_label<'a>(app_label: &'a str, model: &str) -> &'a str {
    MOVED_CONTENT_TYPES
        .iter()
        .find(|(from, name, _)| *from == app_label && *name == model)
        .map_or(app_label, |&(_, _, to)| to)
}

fn content_type_unknown(fields: &FieldMap, registry: &ModelRegistry) -> bool {
    let app_label = fields.get("app_label").and_then(Value::as_str).unwrap_or_default();
    let model = fields.get("model").and_then(Value::as_str).unwrap_or_default();
    let app_label = nautobot_app_label(app_label, model);
    !registry.knows_content_type(&format!("{}.{}", app_label, model))
}

fn content_type_missing(fields: &FieldMap, _registry: &ModelRegistry) -> bool {
    fields.get("content_type").map_or(true, Value::is_null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_content_type_rule() {
        let mut registry = ModelRegistry::new();
        registry.register(USER);
        registry.register_content_type("dcim.cable");

        let rule = CONTENT_TYPE.ignore.unwrap();
        assert!(!rule(&fields(json!({"app_label": "users", "model": "user"})), &registry));
        assert!(!rule(&fields(json!({"app_label": "auth", "model": "user"})), &registry));
        assert!(!rule(&fields(json!({"app_label": "dcim", "model": "cable"})), &registry));
        assert!(rule(&fields(json!({"app_label": "secrets", "model": "secret"})), &registry));
    }

    #[test]
    fn test_nautobot_app_label() {
        assert_eq!(nautobot_app_label("auth", "user"), "users");
        assert_eq!(nautobot_app_label("auth", "group"), "auth");
        assert_eq!(nautobot_app_label("dcim", "user"), "dcim");
    }

    #[test]
    fn test_permission_rule() {
        let registry = ModelRegistry::new();
        let rule = PERMISSION.ignore.unwrap();
        assert!(rule(&fields(json!({"codename": "view_secret", "content_type": null})), &registry));
        assert!(rule(&fields(json!({"codename": "view_secret"})), &registry));
        assert!(!rule(
            &fields(json!({"codename": "view_site", "content_type": {"app_label": "dcim", "model": "site"}})),
            &registry
        ));
    }
}
