//! Sites, racks and devices.

use crate::core::{FkTarget, ModelSchema};

const ORGANIZATIONAL: &[&str] = &["name", "slug", "description", "custom_field_data", "created", "last_updated"];

pub const REGION: ModelSchema = ModelSchema {
    fields: &["name", "slug", "parent", "description", "custom_field_data", "created", "last_updated"],
    foreign_keys: &[("parent", FkTarget::Direct("region"))],
    required: &["name", "slug"],
    ..ModelSchema::owned("region", "dcim.region")
};

pub const SITE: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "slug",
        "status",
        "region",
        "tenant",
        "facility",
        "asn",
        "time_zone",
        "description",
        "physical_address",
        "shipping_address",
        "latitude",
        "longitude",
        "contact_name",
        "contact_phone",
        "contact_email",
        "comments",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("status", FkTarget::Status),
        ("region", FkTarget::Direct("region")),
        ("tenant", FkTarget::Direct("tenant")),
    ],
    required: &["name", "slug", "status"],
    ..ModelSchema::owned("site", "dcim.site")
};

pub const RACK_GROUP: ModelSchema = ModelSchema {
    fields: &["name", "slug", "site", "parent", "description", "custom_field_data", "created", "last_updated"],
    foreign_keys: &[
        ("site", FkTarget::Direct("site")),
        ("parent", FkTarget::Direct("rackgroup")),
    ],
    required: &["name", "slug", "site"],
    ..ModelSchema::owned("rackgroup", "dcim.rackgroup")
};

pub const RACK_ROLE: ModelSchema = ModelSchema {
    fields: &["name", "slug", "color", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("rackrole", "dcim.rackrole")
};

/// Rack. NetBox 3.x calls the rack group `location`.
pub const RACK: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "facility_id",
        "site",
        "group",
        "tenant",
        "status",
        "role",
        "serial",
        "asset_tag",
        "type",
        "width",
        "u_height",
        "desc_units",
        "outer_width",
        "outer_depth",
        "outer_unit",
        "comments",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    aliases: &[("location", "group")],
    foreign_keys: &[
        ("site", FkTarget::Direct("site")),
        ("group", FkTarget::Direct("rackgroup")),
        ("location", FkTarget::Direct("rackgroup")),
        ("tenant", FkTarget::Direct("tenant")),
        ("status", FkTarget::Status),
        ("role", FkTarget::Direct("rackrole")),
    ],
    required: &["name", "site", "status"],
    ..ModelSchema::owned("rack", "dcim.rack")
};

pub const MANUFACTURER: ModelSchema = ModelSchema {
    fields: ORGANIZATIONAL,
    required: &["name", "slug"],
    ..ModelSchema::owned("manufacturer", "dcim.manufacturer")
};

pub const DEVICE_TYPE: ModelSchema = ModelSchema {
    fields: &[
        "manufacturer",
        "model",
        "slug",
        "part_number",
        "u_height",
        "is_full_depth",
        "subdevice_role",
        "front_image",
        "rear_image",
        "comments",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[("manufacturer", FkTarget::Direct("manufacturer"))],
    required: &["manufacturer", "model", "slug"],
    ..ModelSchema::owned("devicetype", "dcim.devicetype")
};

pub const DEVICE_ROLE: ModelSchema = ModelSchema {
    fields: &["name", "slug", "color", "vm_role", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("devicerole", "dcim.devicerole")
};

pub const PLATFORM: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "slug",
        "manufacturer",
        "napalm_driver",
        "napalm_args",
        "description",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[("manufacturer", FkTarget::Direct("manufacturer"))],
    required: &["name", "slug"],
    ..ModelSchema::owned("platform", "dcim.platform")
};

pub const DEVICE: ModelSchema = ModelSchema {
    fields: &[
        "device_type",
        "device_role",
        "tenant",
        "platform",
        "name",
        "serial",
        "asset_tag",
        "site",
        "rack",
        "position",
        "face",
        "status",
        "primary_ip4",
        "primary_ip6",
        "cluster",
        "vc_position",
        "vc_priority",
        "comments",
        "local_context_data",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("device_type", FkTarget::Direct("devicetype")),
        ("device_role", FkTarget::Direct("devicerole")),
        ("tenant", FkTarget::Direct("tenant")),
        ("platform", FkTarget::Direct("platform")),
        ("site", FkTarget::Direct("site")),
        ("rack", FkTarget::Direct("rack")),
        ("status", FkTarget::Status),
        ("primary_ip4", FkTarget::Direct("ipaddress")),
        ("primary_ip6", FkTarget::Direct("ipaddress")),
        ("cluster", FkTarget::Direct("cluster")),
    ],
    ignored_fields: &["virtual_chassis", "local_context_schema"],
    required: &["device_type", "device_role", "site", "status"],
    ..ModelSchema::owned("device", "dcim.device")
};

pub const INTERFACE: ModelSchema = ModelSchema {
    fields: &[
        "device",
        "name",
        "label",
        "type",
        "enabled",
        "lag",
        "mtu",
        "mac_address",
        "mgmt_only",
        "description",
        "mode",
        "untagged_vlan",
        "tagged_vlans",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("device", FkTarget::Direct("device")),
        ("lag", FkTarget::Direct("interface")),
        ("untagged_vlan", FkTarget::Direct("vlan")),
        ("tagged_vlans", FkTarget::Direct("vlan")),
    ],
    ignored_fields: &["cable"],
    required: &["device", "name", "type"],
    ..ModelSchema::owned("interface", "dcim.interface")
};

pub const MODELS: &[ModelSchema] = &[
    REGION,
    SITE,
    RACK_GROUP,
    RACK_ROLE,
    RACK,
    MANUFACTURER,
    DEVICE_TYPE,
    DEVICE_ROLE,
    PLATFORM,
    DEVICE,
    INTERFACE,
];
