//! Builtin NetBox-to-Nautobot model descriptors.
//!
//! One submodule per Nautobot app. [`builtin_registry`] assembles them
//! together with the top-level load order and the content types Nautobot
//! knows about but the importer does not transform.

pub mod auth;
pub mod dcim;
pub mod extras;
pub mod ipam;
pub mod tenancy;
pub mod virtualization;

use crate::core::ModelRegistry;

/// Load order after content types and permissions. Every model appears
/// after the pass-through models it references by natural key.
pub const TOP_LEVEL: &[&str] = &[
    "group",
    "user",
    "tag",
    "customfield",
    "customfieldchoice",
    "tenantgroup",
    "tenant",
    "region",
    "site",
    "rackgroup",
    "rackrole",
    "rack",
    "manufacturer",
    "devicetype",
    "devicerole",
    "platform",
    "clustertype",
    "clustergroup",
    "cluster",
    "device",
    "interface",
    "rir",
    "aggregate",
    "role",
    "vrf",
    "vlangroup",
    "vlan",
    "prefix",
    "virtualmachine",
    "vminterface",
    "ipaddress",
    "taggeditem",
];

/// Nautobot content types with no importer model. Content-type rows with
/// these labels are kept so permissions and generic FKs naming them survive.
pub const EXTRA_CONTENT_TYPES: &[&str] = &[
    "auth.group",
    "circuits.circuit",
    "circuits.circuittermination",
    "circuits.circuittype",
    "circuits.provider",
    "dcim.cable",
    "dcim.consoleport",
    "dcim.consoleserverport",
    "dcim.frontport",
    "dcim.powerfeed",
    "dcim.poweroutlet",
    "dcim.powerpanel",
    "dcim.powerport",
    "dcim.rearport",
    "dcim.virtualchassis",
    "extras.configcontext",
    "extras.customlink",
    "extras.exporttemplate",
    "extras.jobresult",
    "extras.objectchange",
    "extras.status",
    "extras.webhook",
    "ipam.routetarget",
    "ipam.service",
    "users.objectpermission",
    "users.token",
];

/// Registry with every builtin model.
pub fn builtin_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    for area in [
        auth::MODELS,
        extras::MODELS,
        tenancy::MODELS,
        dcim::MODELS,
        ipam::MODELS,
        virtualization::MODELS,
    ] {
        for schema in area {
            registry.register(schema.clone());
        }
    }
    for label in EXTRA_CONTENT_TYPES.iter().copied() {
        registry.register_content_type(label);
    }
    registry.set_top_level(TOP_LEVEL);
    registry
}
