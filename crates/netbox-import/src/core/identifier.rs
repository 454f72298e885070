//! Deterministic identifier derivation.
//!
//! NetBox identifies rows with small per-table integers; Nautobot uses UUIDs.
//! Every Nautobot primary key produced by the importer is a UUIDv5 computed
//! from the model name and the NetBox key, so any record can compute the
//! UUID of a record it references without that record having been loaded.
//!
//! ```
//! use netbox_import::core::identifier::derive;
//!
//! assert_eq!(derive("device", 17), derive("device", 17));
//! assert_ne!(derive("device", 17), derive("site", 17));
//! ```

use uuid::Uuid;

/// Namespace for every UUID derived by the importer.
///
/// Changing this value changes every identifier ever produced, which breaks
/// re-imports into a database populated by an earlier run.
pub const IMPORT_NAMESPACE: Uuid = Uuid::from_u128(0x8c1f_4d2a_6b7e_5f30_9a41_c0de_1b2e_3f47);

/// Derive the Nautobot UUID for the NetBox record `model_name` / `pk`.
pub fn derive(model_name: &str, pk: i64) -> Uuid {
    Uuid::new_v5(&IMPORT_NAMESPACE, format!("{}:{}", model_name, pk).as_bytes())
}

/// Derive the UUID of a record synthesized from a parent NetBox record.
///
/// `discriminator` tells siblings apart (a custom-field choice uses its
/// value). The name space cannot collide with [`derive`] because the parent
/// key is followed by a second `:` segment.
pub fn derive_child(model_name: &str, parent_pk: i64, discriminator: &str) -> Uuid {
    Uuid::new_v5(
        &IMPORT_NAMESPACE,
        format!("{}:{}:{}", model_name, parent_pk, discriminator).as_bytes(),
    )
}
