//! Clusters and virtual machines.

use crate::core::{FkTarget, ModelSchema};

pub const CLUSTER_TYPE: ModelSchema = ModelSchema {
    fields: &["name", "slug", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("clustertype", "virtualization.clustertype")
};

pub const CLUSTER_GROUP: ModelSchema = ModelSchema {
    fields: &["name", "slug", "description", "custom_field_data", "created", "last_updated"],
    required: &["name", "slug"],
    ..ModelSchema::owned("clustergroup", "virtualization.clustergroup")
};

pub const CLUSTER: ModelSchema = ModelSchema {
    fields: &[
        "name",
        "type",
        "group",
        "tenant",
        "site",
        "comments",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("type", FkTarget::Direct("clustertype")),
        ("group", FkTarget::Direct("clustergroup")),
        ("tenant", FkTarget::Direct("tenant")),
        ("site", FkTarget::Direct("site")),
    ],
    required: &["name", "type"],
    ..ModelSchema::owned("cluster", "virtualization.cluster")
};

/// Virtual machine. `vcpus` is a decimal in NetBox and an integer here.
pub const VIRTUAL_MACHINE: ModelSchema = ModelSchema {
    fields: &[
        "cluster",
        "tenant",
        "platform",
        "name",
        "status",
        "role",
        "primary_ip4",
        "primary_ip6",
        "vcpus",
        "memory",
        "disk",
        "comments",
        "local_context_data",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("cluster", FkTarget::Direct("cluster")),
        ("tenant", FkTarget::Direct("tenant")),
        ("platform", FkTarget::Direct("platform")),
        ("status", FkTarget::Status),
        ("role", FkTarget::Direct("devicerole")),
        ("primary_ip4", FkTarget::Direct("ipaddress")),
        ("primary_ip6", FkTarget::Direct("ipaddress")),
    ],
    ignored_fields: &["local_context_schema"],
    required: &["cluster", "name", "status"],
    ..ModelSchema::owned("virtualmachine", "virtualization.virtualmachine")
};

pub const VM_INTERFACE: ModelSchema = ModelSchema {
    fields: &[
        "virtual_machine",
        "name",
        "enabled",
        "mtu",
        "mac_address",
        "description",
        "mode",
        "untagged_vlan",
        "tagged_vlans",
        "custom_field_data",
        "created",
        "last_updated",
    ],
    foreign_keys: &[
        ("virtual_machine", FkTarget::Direct("virtualmachine")),
        ("untagged_vlan", FkTarget::Direct("vlan")),
        ("tagged_vlans", FkTarget::Direct("vlan")),
    ],
    required: &["virtual_machine", "name"],
    ..ModelSchema::owned("vminterface", "virtualization.vminterface")
};

pub const MODELS: &[ModelSchema] = &[CLUSTER_TYPE, CLUSTER_GROUP, CLUSTER, VIRTUAL_MACHINE, VM_INTERFACE];
