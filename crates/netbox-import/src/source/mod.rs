//! NetBox dump input.
//!
//! A dump is the output of `manage.py dumpdata`: one JSON array of
//! `{"model": "app_label.model", "pk": 1, "fields": {...}}` objects.
//! Records are validated one by one so a malformed entry is reported with
//! its position in the array.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::core::{FieldMap, SourceRecord};
use crate::error::{ImportError, Result};

/// The records of one NetBox dump, in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceDataset {
    records: Vec<SourceRecord>,
}

impl SourceDataset {
    /// Wrap already parsed records.
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    /// Read and validate a dump file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading NetBox source data");
        let content = fs::read_to_string(path)?;
        let dataset = Self::from_json(&content)?;
        info!(records = dataset.len(), "Read NetBox source data");
        Ok(dataset)
    }

    /// Parse and validate a dump.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Validate an already parsed dump.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ImportError::dataset(0, "expected a JSON array of records"));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_record(index, item))
            .collect::<Result<Vec<_>>>()?;
        debug!(records = records.len(), "Validated NetBox source data");
        Ok(Self { records })
    }

    /// Records in file order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.iter()
    }

    /// Records with the given NetBox label, in file order.
    pub fn records_for<'s>(&'s self, label: &'s str) -> impl Iterator<Item = &'s SourceRecord> + 's {
        self.records.iter().filter(move |r| r.model == label)
    }

    /// Number of records per NetBox label.
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.model.as_str()).or_default() += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceDataset {
    type Item = &'a SourceRecord;
    type IntoIter = std::slice::Iter<'a, SourceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<SourceRecord> for SourceDataset {
    fn from_iter<I: IntoIterator<Item = SourceRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn parse_record(index: usize, item: Value) -> Result<SourceRecord> {
    let Value::Object(mut object) = item else {
        return Err(ImportError::dataset(index, "record is not a JSON object"));
    };

    let model = match object.remove("model") {
        Some(Value::String(model)) if model.contains('.') => model,
        Some(Value::String(model)) => {
            return Err(ImportError::dataset(
                index,
                format!("label '{}' is not of the form app_label.model", model),
            ))
        }
        Some(_) => return Err(ImportError::dataset(index, "'model' is not a string")),
        None => return Err(ImportError::dataset(index, "record has no 'model' label")),
    };

    let pk = match object.get("pk") {
        Some(pk) => pk.as_i64().ok_or_else(|| {
            ImportError::dataset(index, format!("{} record has a non-integer pk {}", model, pk))
        })?,
        None => return Err(ImportError::dataset(index, format!("{} record has no pk", model))),
    };

    let fields = match object.remove("fields") {
        Some(Value::Object(fields)) => fields,
        None | Some(Value::Null) => FieldMap::new(),
        Some(_) => {
            return Err(ImportError::dataset(
                index,
                format!("{} {} has non-object 'fields'", model, pk),
            ))
        }
    };

    Ok(SourceRecord { model, pk, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_from_json_keeps_file_order() {
        let dataset = SourceDataset::from_json(
            r#"[
                {"model": "dcim.site", "pk": 2, "fields": {"name": "B"}},
                {"model": "dcim.region", "pk": 1, "fields": {}},
                {"model": "dcim.site", "pk": 1, "fields": {"name": "A"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        let sites: Vec<i64> = dataset.records_for("dcim.site").map(|r| r.pk).collect();
        assert_eq!(sites, vec![2, 1]);
        assert_eq!(dataset.label_counts().get("dcim.site"), Some(&2));
    }

    #[test]
    fn test_missing_label_is_fatal() {
        let err = SourceDataset::from_value(json!([
            {"model": "dcim.site", "pk": 1, "fields": {}},
            {"pk": 2, "fields": {}}
        ]))
        .unwrap_err();
        assert!(matches!(err, ImportError::Dataset { index: 1, .. }));
    }

    #[test]
    fn test_malformed_records() {
        for (value, expected) in [
            (json!({"model": "dcim.site"}), "expected a JSON array"),
            (json!(["site"]), "not a JSON object"),
            (json!([{"model": 4, "pk": 1}]), "not a string"),
            (json!([{"model": "site", "pk": 1}]), "app_label.model"),
            (json!([{"model": "dcim.site", "pk": "a"}]), "non-integer pk"),
            (json!([{"model": "dcim.site"}]), "has no pk"),
            (json!([{"model": "dcim.site", "pk": 1, "fields": []}]), "non-object"),
        ] {
            let err = SourceDataset::from_value(value).unwrap_err();
            assert!(err.to_string().contains(expected), "{} lacks {}", err, expected);
        }
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let dataset = SourceDataset::from_value(json!([{"model": "auth.group", "pk": 3}])).unwrap();
        assert!(dataset.iter().next().unwrap().fields.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"model": "tenancy.tenant", "pk": 1, "fields": {{"name": "T"}}}}]"#).unwrap();
        let dataset = SourceDataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);

        let missing = SourceDataset::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ImportError::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SourceDataset::from_json("[{"), Err(ImportError::Json(_))));
    }
}
