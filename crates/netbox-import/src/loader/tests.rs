use serde_json::{json, Value};
use tracing::Level;

use super::*;
use crate::core::derive;
use crate::logging::capture;
use crate::target::MemorySink;

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

fn record(label: &str, pk: i64, value: Value) -> SourceRecord {
    SourceRecord::new(label, pk, fields(value))
}

fn uuid_of(model: &str, pk: i64) -> Value {
    Value::String(derive(model, pk).to_string())
}

fn load_one(
    loader: &mut RecordLoader<'_>,
    sink: &mut MemorySink,
    model: &str,
    source: SourceRecord,
) -> Option<ResolvedRecord> {
    let schema = loader.registry().get(model).unwrap();
    loader.load(schema, &source, sink).unwrap().cloned()
}

fn content_type(loader: &mut RecordLoader<'_>, sink: &mut MemorySink, pk: i64, app_label: &str, model: &str) {
    let source = record(
        "contenttypes.contenttype",
        pk,
        json!({"app_label": app_label, "model": model}),
    );
    load_one(loader, sink, "contenttype", source).unwrap();
}

#[test]
fn test_owned_fk_is_derived_and_pk_replaced() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let site = load_one(
        &mut loader,
        &mut sink,
        "site",
        record(
            "dcim.site",
            4,
            json!({"name": "HQ", "slug": "hq", "status": "active", "region": 3, "tenant": null}),
        ),
    )
    .unwrap();

    assert_eq!(site.id, Some(derive("site", 4)));
    assert_eq!(site.fields["pk"], uuid_of("site", 4));
    assert_eq!(site.fields["region"], uuid_of("region", 3));
    assert_eq!(site.fields["status"], json!({"slug": "active"}));
    assert_eq!(site.fields["tenant"], Value::Null);
    assert_eq!(sink.len(), 1);
    assert_eq!(loader.stats().sunk, 1);
    assert_eq!(loader.stats().loaded.get("site"), Some(&1));
}

#[test]
fn test_pass_through_records_keep_natural_key() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    content_type(&mut loader, &mut sink, 10, "dcim", "site");
    let stored = loader.index().get_int("contenttypes.contenttype", 10).unwrap();
    assert_eq!(stored.id, None);
    assert_eq!(stored.fields["pk"], json!(10));

    let (events, custom_field) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "customfield",
            record(
                "extras.customfield",
                1,
                json!({"name": "owner", "type": "text", "content_types": [10, 99]}),
            ),
        )
    });
    let custom_field = custom_field.unwrap();

    assert_eq!(
        custom_field.fields["content_types"],
        json!([{"app_label": "dcim", "model": "site"}])
    );
    let errors: Vec<_> = events.iter().filter(|e| e.level == Level::ERROR).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("field"), Some("content_types"));
    assert_eq!(loader.stats().field_errors, 1);
}

#[test]
fn test_ignored_pass_through_records_are_indexed_not_sunk() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    content_type(&mut loader, &mut sink, 11, "secrets", "secret");
    assert!(loader.index().get_int("contenttypes.contenttype", 11).unwrap().ignored);

    let permission = load_one(
        &mut loader,
        &mut sink,
        "permission",
        record(
            "auth.permission",
            5,
            json!({"name": "Can view secret", "codename": "view_secret", "content_type": 11}),
        ),
    )
    .unwrap();
    assert_eq!(permission.fields["content_type"], Value::Null);
    assert!(permission.ignored);

    let group = load_one(
        &mut loader,
        &mut sink,
        "group",
        record("auth.group", 1, json!({"name": "ops", "permissions": [5]})),
    )
    .unwrap();
    assert_eq!(group.fields["permissions"], json!([]));

    assert_eq!(sink.len(), 1);
    assert_eq!(sink.records()[0].model, "group");
    assert_eq!(loader.stats().ignored, 2);
    assert_eq!(loader.stats().field_errors, 0);
}

#[test]
fn test_select_custom_field_splits_choices() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let parent = load_one(
        &mut loader,
        &mut sink,
        "customfield",
        record(
            "extras.customfield",
            7,
            json!({"name": "tier", "type": "select", "required": true, "choices": "[\"a\", \"b\"]"}),
        ),
    )
    .unwrap();

    assert!(parent.get("choices").is_none());
    assert_eq!(parent.fields["required"], json!(false));
    assert_eq!(parent.fields["actual_required"], json!(true));

    let choices: Vec<_> = sink.of_model("customfieldchoice").collect();
    assert_eq!(choices.len(), 2);
    for (choice, (discriminator, value)) in choices.iter().zip([("0:a", "a"), ("1:b", "b")]) {
        assert_eq!(choice.fields["field"], uuid_of("customfield", 7));
        assert_eq!(choice.fields["value"], json!(value));
        assert_eq!(
            choice.id,
            Some(crate::core::derive_child("customfieldchoice", 7, discriminator))
        );
    }
    assert_eq!(sink.position("customfield"), Some(2));
    assert_eq!(loader.stats().synthesized, 2);
    assert_eq!(loader.index().count("extras.customfieldchoice"), 2);
}

#[test]
fn test_non_select_custom_field_defers_required_only() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let field = load_one(
        &mut loader,
        &mut sink,
        "customfield",
        record("extras.customfield", 8, json!({"name": "notes", "type": "text", "required": false})),
    )
    .unwrap();

    assert_eq!(field.fields["actual_required"], json!(false));
    assert_eq!(sink.of_model("customfieldchoice").count(), 0);
}

#[test]
fn test_repeated_choice_values_each_get_a_record() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, parent) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "customfield",
            record(
                "extras.customfield",
                3,
                json!({"name": "size", "type": "select", "choices": "[\"a\", \"a\", \"b\"]"}),
            ),
        )
    });
    assert!(parent.is_some());

    let values: Vec<_> = sink.of_model("customfieldchoice").map(|c| c.fields["value"].clone()).collect();
    assert_eq!(values, [json!("a"), json!("a"), json!("b")]);
    assert_eq!(loader.stats().synthesized, 3);
    assert_eq!(loader.stats().duplicates, 0);
    assert!(events.iter().all(|e| e.level != Level::WARN));
}

#[test]
fn test_non_select_custom_field_drops_choices() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, field) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "customfield",
            record(
                "extras.customfield",
                9,
                json!({"name": "notes", "type": "text", "choices": "[\"x\"]"}),
            ),
        )
    });

    assert!(field.unwrap().get("choices").is_none());
    assert_eq!(sink.of_model("customfieldchoice").count(), 0);
    assert!(loader.drift().table().is_empty());
    assert!(events.iter().all(|e| e.level != Level::WARN));
}

#[test]
fn test_virtual_machine_vcpus_cast() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let vm = load_one(
        &mut loader,
        &mut sink,
        "virtualmachine",
        record(
            "virtualization.virtualmachine",
            2,
            json!({"name": "vm1", "cluster": 1, "status": "active", "vcpus": "2.00"}),
        ),
    )
    .unwrap();
    assert_eq!(vm.fields["vcpus"], json!(2));
    assert_eq!(vm.fields["cluster"], uuid_of("cluster", 1));
}

#[test]
fn test_user_config_attached() {
    let registry = ModelRegistry::with_builtins();
    let dataset = vec![record(
        "users.userconfig",
        3,
        json!({"user": 1, "data": {"tables": {"SiteTable": {"columns": ["name"]}}}}),
    )];
    let mut loader = RecordLoader::new(&registry, Companions::collect(&dataset));
    let mut sink = MemorySink::new();

    let user = load_one(
        &mut loader,
        &mut sink,
        "user",
        record("auth.user", 1, json!({"username": "admin", "is_superuser": true})),
    )
    .unwrap();
    assert_eq!(user.label, "users.user");
    assert_eq!(user.id, Some(derive("user", 1)));
    assert_eq!(user.fields["config_data"]["tables"]["SiteTable"]["columns"], json!(["name"]));
    assert_eq!(loader.stats().missing_companions, 0);
}

#[test]
fn test_user_without_config_warns() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, user) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "user",
            record("auth.user", 2, json!({"username": "guest"})),
        )
    });

    assert_eq!(user.unwrap().fields["config_data"], json!({}));
    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "No UserConfig found for User");
    assert_eq!(warnings[0].field("username"), Some("guest"));
    assert_eq!(loader.stats().missing_companions, 1);
}

#[test]
fn test_drift_warns_once_and_details_every_record() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, _) = capture(|| {
        for pk in 1..=3 {
            load_one(
                &mut loader,
                &mut sink,
                "device",
                record(
                    "dcim.device",
                    pk,
                    json!({
                        "name": format!("d{}", pk),
                        "device_type": 1,
                        "device_role": 1,
                        "site": 1,
                        "status": "active",
                        "airflow": "front-to-rear",
                        "virtual_chassis": 9,
                        "_name": "sortable",
                    }),
                ),
            )
            .unwrap();
        }
    });

    let details = events
        .iter()
        .filter(|e| e.level == Level::DEBUG && e.message.starts_with("NetBox fields not defined for device"))
        .count();
    assert_eq!(details, 3);

    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.ends_with("not supported by this importer: airflow"));

    let reported = loader.drift().unsupported_fields("device").unwrap();
    assert_eq!(reported.iter().collect::<Vec<_>>(), ["airflow"]);
}

#[test]
fn test_duplicate_keeps_first() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let first = record("tenancy.tenant", 1, json!({"name": "first", "slug": "first"}));
    let second = record("tenancy.tenant", 1, json!({"name": "second", "slug": "second"}));
    assert!(load_one(&mut loader, &mut sink, "tenant", first).is_some());

    let (events, duplicate) = capture(|| load_one(&mut loader, &mut sink, "tenant", second));
    assert!(duplicate.is_none());
    assert!(events
        .iter()
        .any(|e| e.level == Level::WARN && e.message.starts_with("Apparent duplicate")));

    assert_eq!(sink.len(), 1);
    assert_eq!(loader.index().get_int("tenancy.tenant", 1).unwrap().fields["name"], "first");
    assert_eq!(loader.stats().duplicates, 1);
}

#[test]
fn test_missing_required_field_rejects_record() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, rejected) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "site",
            record("dcim.site", 9, json!({"slug": "nameless", "status": "active"})),
        )
    });

    assert!(rejected.is_none());
    let error = events.iter().find(|e| e.level == Level::ERROR).unwrap();
    assert_eq!(error.message, "Invalid data according to internal data model");
    assert_eq!(error.field("missing"), Some("name"));
    assert!(sink.is_empty());
    assert!(loader.index().is_empty());
    assert_eq!(loader.stats().rejected, 1);
}

#[test]
fn test_alias_renamed_and_not_drift() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, rack) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "rack",
            record("dcim.rack", 1, json!({"name": "R1", "site": 2, "status": "active", "location": 4})),
        )
    });

    let rack = rack.unwrap();
    assert_eq!(rack.fields["group"], uuid_of("rackgroup", 4));
    assert!(rack.get("location").is_none());
    assert!(events.iter().all(|e| e.level != Level::WARN));
    assert!(loader.drift().table().is_empty());
}

#[test]
fn test_generic_fk_follows_content_type() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    content_type(&mut loader, &mut sink, 12, "dcim", "interface");
    let address = load_one(
        &mut loader,
        &mut sink,
        "ipaddress",
        record(
            "ipam.ipaddress",
            1,
            json!({
                "address": "192.0.2.1/24",
                "status": "active",
                "assigned_object_type": 12,
                "assigned_object_id": 5,
            }),
        ),
    )
    .unwrap();

    assert_eq!(address.fields["assigned_object_id"], uuid_of("interface", 5));
    assert_eq!(
        address.fields["assigned_object_type"],
        json!({"app_label": "dcim", "model": "interface"})
    );
}

#[test]
fn test_generic_fk_without_content_type_is_nulled() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    let (events, item) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "taggeditem",
            record("extras.taggeditem", 1, json!({"tag": 1, "content_type": 40, "object_id": 3})),
        )
    });

    let item = item.unwrap();
    assert_eq!(item.fields["object_id"], Value::Null);
    assert_eq!(item.fields["content_type"], Value::Null);
    assert_eq!(item.fields["tag"], uuid_of("tag", 1));
    assert_eq!(events.iter().filter(|e| e.level == Level::ERROR).count(), 2);
}

#[test]
fn test_user_content_type_keeps_references() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();
    let user_type = json!({"app_label": "users", "model": "user"});

    content_type(&mut loader, &mut sink, 4, "auth", "user");
    let stored = loader.index().get_int("contenttypes.contenttype", 4).unwrap();
    assert!(!stored.ignored);
    assert_eq!(stored.fields["app_label"], "users");

    let permission = load_one(
        &mut loader,
        &mut sink,
        "permission",
        record(
            "auth.permission",
            10,
            json!({"name": "Can view user", "codename": "view_user", "content_type": 4}),
        ),
    )
    .unwrap();
    assert!(!permission.ignored);
    assert_eq!(permission.fields["content_type"], user_type);

    let user = load_one(
        &mut loader,
        &mut sink,
        "user",
        record("auth.user", 1, json!({"username": "admin", "user_permissions": [10]})),
    )
    .unwrap();
    let granted = user.fields["user_permissions"].as_array().unwrap();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0]["codename"], "view_user");
    assert_eq!(granted[0]["content_type"], user_type);

    let custom_field = load_one(
        &mut loader,
        &mut sink,
        "customfield",
        record("extras.customfield", 2, json!({"name": "badge", "type": "text", "content_types": [4]})),
    )
    .unwrap();
    assert_eq!(custom_field.fields["content_types"], json!([user_type.clone()]));

    let tagged = load_one(
        &mut loader,
        &mut sink,
        "taggeditem",
        record("extras.taggeditem", 1, json!({"tag": 1, "content_type": 4, "object_id": 1})),
    )
    .unwrap();
    assert_eq!(tagged.fields["object_id"], uuid_of("user", 1));

    assert_eq!(sink.of_model("permission").count(), 1);
    assert_eq!(loader.stats().ignored, 0);
    assert_eq!(loader.stats().field_errors, 0);
}

#[test]
fn test_generic_fk_to_model_without_importer() {
    let registry = ModelRegistry::with_builtins();
    let mut loader = RecordLoader::new(&registry, Companions::new());
    let mut sink = MemorySink::new();

    content_type(&mut loader, &mut sink, 30, "circuits", "circuit");
    assert!(!loader.index().get_int("contenttypes.contenttype", 30).unwrap().ignored);

    let (events, item) = capture(|| {
        load_one(
            &mut loader,
            &mut sink,
            "taggeditem",
            record("extras.taggeditem", 2, json!({"tag": 1, "content_type": 30, "object_id": 3})),
        )
    });

    let item = item.unwrap();
    assert_eq!(item.fields["object_id"], Value::Null);
    assert_eq!(
        item.fields["content_type"],
        json!({"app_label": "circuits", "model": "circuit"})
    );
    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("field"), Some("object_id"));
    assert!(events.iter().all(|e| e.level != Level::ERROR));
    assert_eq!(sink.of_model("taggeditem").count(), 1);
    assert_eq!(loader.stats().field_errors, 1);
}

#[test]
fn test_ignored_fields_helper() {
    let registry = ModelRegistry::with_builtins();
    let schema = registry.get("rack").unwrap();
    let data = fields(json!({
        "name": "R1",
        "location": 1,
        "outer_unit": "",
        "_private": 1,
        "weight": 40,
    }));
    let record = ResolvedRecord {
        model: "rack",
        label: "dcim.rack",
        key: PkValue::Int(1),
        id: None,
        fields: fields(json!({"name": "R1", "group": 1})),
        ignored: false,
    };

    let ignored = ignored_fields(schema, &data, &record);
    assert_eq!(ignored.into_iter().collect::<Vec<_>>(), ["weight"]);
}
