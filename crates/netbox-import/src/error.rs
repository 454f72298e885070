//! Error types for the import library.
//!
//! Two layers exist. [`ImportError`] is fatal and propagates out of
//! [`Orchestrator::run`](crate::Orchestrator::run). [`FieldError`] is
//! local to a single field of a single record: the loader logs it, nulls
//! the field and keeps going.

use serde_json::Value;
use thiserror::Error;

/// Main error type for import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration error (invalid YAML, missing fields, unsupported version).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source dataset is structurally malformed and cannot be iterated.
    #[error("Malformed source dataset at record {index}: {message}")]
    Dataset { index: usize, message: String },

    /// The load order names an entity type the registry does not know.
    #[error("Model registry error: {0}")]
    Registry(String),

    /// The record sink refused a record.
    #[error("Sink failed for {model}: {message}")]
    Sink { model: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImportError {
    /// Create a Dataset error for the record at `index`.
    pub fn dataset(index: usize, message: impl Into<String>) -> Self {
        ImportError::Dataset {
            index,
            message: message.into(),
        }
    }

    /// Create a Sink error
    pub fn sink(model: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::Sink {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error category.
    pub fn exit_code(&self) -> u8 {
        match self {
            ImportError::Config(_) | ImportError::Yaml(_) => 2,
            ImportError::Dataset { .. } | ImportError::Json(_) => 3,
            ImportError::Registry(_) => 4,
            ImportError::Sink { .. } | ImportError::Io(_) => 5,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Non-fatal failure to resolve one foreign-key field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The generic-FK discriminator is not an integer content-type key.
    #[error("Invalid content-type PK value {0}")]
    InvalidContentTypePk(Value),

    /// The generic-FK discriminator points at no loaded content type.
    #[error("No content type with PK {0} has been loaded")]
    ContentTypeNotFound(i64),

    /// The declared or discriminated target is not a registered model.
    #[error("Unknown/unrecognized class name {0}")]
    UnknownTarget(String),

    /// A pass-through reference points at a record that was never loaded.
    #[error("No {target} record with PK {pk} has been loaded")]
    MissingReference { target: String, pk: i64 },

    /// The raw value is neither null, an integer nor a list of integers.
    #[error("Invalid PK value {0}")]
    InvalidPk(Value),
}

impl FieldError {
    /// Whether this error is logged at warning rather than error severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, FieldError::UnknownTarget(_))
    }
}
