//! Error types for the sift crate.

use thiserror::Error;

/// Errors that can occur when defining schemas or evaluating queries.
///
/// All variants describe programmer errors: a query or schema that does not
/// fit the declared record shape. They are raised before any record is
/// examined.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A filter or sort references a field the schema does not declare.
    #[error("invalid query: unknown field '{field}' referenced by {context}")]
    InvalidQuery { field: String, context: &'static str },

    /// A filter, sort, or operand is incompatible with the field's type.
    #[error("type mismatch on field '{field}': {kind} is not valid for {field_type} fields")]
    TypeMismatch {
        field: String,
        kind: &'static str,
        field_type: &'static str,
    },

    /// Evaluation was attempted with a schema that declares no fields.
    #[error("schema is empty: define the record fields before evaluating queries")]
    EmptySchema,

    /// The same field name was declared twice.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// More than one field was marked as the record key.
    #[error("multiple key fields declared: '{first}' and '{second}'")]
    MultipleKeys { first: String, second: String },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// JSON configuration could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file extension is not one of json, yaml, yml.
    #[error("unsupported configuration format: '{0}'")]
    UnsupportedFormat(String),
}

impl SiftError {
    pub(crate) fn unknown_field(field: &str, context: &'static str) -> Self {
        SiftError::InvalidQuery {
            field: field.to_string(),
            context,
        }
    }

    pub(crate) fn mismatch(field: &str, kind: &'static str, field_type: &'static str) -> Self {
        SiftError::TypeMismatch {
            field: field.to_string(),
            kind,
            field_type,
        }
    }
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
