//! Field value helpers shared by the resolver and the loader.
//!
//! Record payloads stay as `serde_json` values end to end: the NetBox dump is
//! JSON and the resolved records are written back out as JSON, so there is
//! no intermediate typed value model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Field name to value mapping of one record.
pub type FieldMap = serde_json::Map<String, Value>;

/// Primary key of an indexed record.
///
/// Records read from the dump carry NetBox integer keys; records the loader
/// synthesizes (custom-field choices) have no NetBox key and are keyed by
/// their derived UUID instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PkValue {
    /// NetBox surrogate key.
    Int(i64),
    /// Derived identifier of a synthesized record.
    Uuid(Uuid),
}

impl PkValue {
    /// JSON form of the key, as stored in the `pk` field of a record.
    pub fn to_value(&self) -> Value {
        match self {
            PkValue::Int(v) => Value::from(*v),
            PkValue::Uuid(v) => Value::String(v.to_string()),
        }
    }

    /// The integer key, if this is a NetBox key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PkValue::Int(v) => Some(*v),
            PkValue::Uuid(_) => None,
        }
    }
}

impl fmt::Display for PkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PkValue::Int(v) => write!(f, "{}", v),
            PkValue::Uuid(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for PkValue {
    fn from(v: i64) -> Self {
        PkValue::Int(v)
    }
}

impl From<Uuid> for PkValue {
    fn from(v: Uuid) -> Self {
        PkValue::Uuid(v)
    }
}

/// Truthiness of a dumped value: null, `false`, zero, and empty
/// strings/arrays/objects are all "unset".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Look up a field and report whether it holds a truthy value.
pub fn field_is_set(fields: &FieldMap, name: &str) -> bool {
    fields.get(name).map_or(false, is_truthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(-1), json!(0.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn test_pk_value_json_forms() {
        assert_eq!(PkValue::from(12).to_value(), json!(12));
        let id = Uuid::nil();
        assert_eq!(
            PkValue::from(id).to_value(),
            json!("00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(PkValue::from(12).as_int(), Some(12));
        assert_eq!(PkValue::from(id).as_int(), None);
    }

    #[test]
    fn test_field_is_set() {
        let fields = json!({"name": "core-1", "asset_tag": "", "rack": null})
            .as_object()
            .cloned()
            .unwrap();
        assert!(field_is_set(&fields, "name"));
        assert!(!field_is_set(&fields, "asset_tag"));
        assert!(!field_is_set(&fields, "rack"));
        assert!(!field_is_set(&fields, "missing"));
    }
}
