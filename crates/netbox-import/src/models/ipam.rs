//! IP address management.

use crate::core::{FkTarget, ModelSchema};

pub const RIR: ModelSchema = ModelSchema {
    fields: &["name", "slug", "is_private", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("rir", "ipam.rir")
};

pub const AGGREGATE: ModelSchema = ModelSchema {
    fields: &["prefix", "rir", "tenant", "date_added", "description", "custom_field_data", "created", "last_updated"],
    foreign_keys: &[
        ("rir", FkTarget::Direct("rir")),
        ("tenant", FkTarget::Direct("tenant")),
    ],
    required: &["prefix", "rir"],
    ..ModelSchema::owned("aggregate", "ipam.aggregate")
};

pub const ROLE: ModelSchema = ModelSchema {
    fields: &["name", "slug", "weight", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("role", "ipam.role")
};

pub const VRF: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "rd",
        "tenant",
        "enforce_unique",
        "description",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[("tenant", FkTarget::Direct("tenant"))],
    ignored_fields: &["import_targets", "export_targets"],
    required: &["name"],
    ..ModelSchema::owned("vrf", "ipam.vrf")
};

pub const VLAN_GROUP: ModelSchema = ModelSchema {
    fields: &["name", "slug", "site", "description", "custom_field_data", "created", "last_updated"],
    foreign_keys: &[("site", FkTarget::Direct("site"))],
    required: &["name", "slug"],
    ..ModelSchema::owned("vlangroup", "ipam.vlangroup")
};

pub const VLAN: ModelSchema = ModelSchema {
    fields: &[
        "site",
        "group",
        "vid",
        "name",
        "tenant",
        "status",
        "role",
        "description",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("site", FkTarget::Direct("site")),
        ("group", FkTarget::Direct("vlangroup")),
        ("tenant", FkTarget::Direct("tenant")),
        ("status", FkTarget::Status),
        ("role", FkTarget::Direct("role")),
    ],
    required: &["vid", "name", "status"],
    ..ModelSchema::owned("vlan", "ipam.vlan")
};

pub const PREFIX: ModelSchema = ModelSchema {
    fields: &[
        "prefix",
        "site",
        "vrf",
        "tenant",
        "vlan",
        "status",
        "role",
        "is_pool",
        "description",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("site", FkTarget::Direct("site")),
        ("vrf", FkTarget::Direct("vrf")),
        ("tenant", FkTarget::Direct("tenant")),
        ("vlan", FkTarget::Direct("vlan")),
        ("status", FkTarget::Status),
        ("role", FkTarget::Direct("role")),
    ],
    required: &["prefix", "status"],
    ..ModelSchema::owned("prefix", "ipam.prefix")
};

/// IP address; assigned to a device or VM interface through a generic FK.
pub const IP_ADDRESS: ModelSchema = ModelSchema {
    fields: &[
        "address",
        "vrf",
        "tenant",
        "status",
        "role",
        "assigned_object_type",
        "assigned_object_id",
        "nat_inside",
        "dns_name",
        "description",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("vrf", FkTarget::Direct("vrf")),
        ("tenant", FkTarget::Direct("tenant")),
        ("status", FkTarget::Status),
        ("assigned_object_type", FkTarget::Direct("contenttype")),
        ("assigned_object_id", FkTarget::Generic("assigned_object_type")),
        ("nat_inside", FkTarget::Direct("ipaddress")),
    ],
    required: &["address", "status"],
    ..ModelSchema::owned("ipaddress", "ipam.ipaddress")
};

pub const MODELS: &[ModelSchema] = &[RIR, AGGREGATE, ROLE, VRF, VLAN_GROUP, VLAN, PREFIX, IP_ADDRESS];
