//! Record schemas.
//!
//! A [`Schema`] declares the fields a collection's records carry, their
//! semantic [`FieldType`], which of them take part in free-text search, and
//! which one identifies a record. Queries are validated against it before
//! evaluation.
//!
//! Schemas can be built in code or loaded from configuration:
//!
//! ```yaml
//! fields:
//!   - name: id
//!     type: text
//!     key: true
//!   - name: title
//!     type: text
//!     searchable: true
//!   - name: topics
//!     type: tag-set
//!     searchable: true
//!   - name: duration
//!     type: number
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SiftError};

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Free text (titles, descriptions).
    Text,
    /// Text drawn from a small closed set (category, difficulty).
    Enum,
    /// Integer or floating point number.
    Number,
    /// Set of text tags.
    TagSet,
    /// Point in time.
    Date,
    /// Boolean flag.
    Bool,
}

impl FieldType {
    /// Returns `true` if values of this type can take part in free-text search.
    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Enum | FieldType::TagSet)
    }

    /// Returns `true` if values of this type are ordered and support ranges.
    pub fn is_ordered(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Date)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Enum => "enum",
            FieldType::Number => "number",
            FieldType::TagSet => "tag-set",
            FieldType::Date => "date",
            FieldType::Bool => "bool",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field is matched by the query's search text.
    #[serde(default)]
    pub searchable: bool,
    /// Whether the field is the record's unique key.
    #[serde(default)]
    pub key: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldSpec {
            name: name.into(),
            field_type,
            searchable: false,
            key: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Text)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Enum)
    }

    pub fn number(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Number)
    }

    pub fn tags(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::TagSet)
    }

    pub fn date(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Date)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        FieldSpec::new(name, FieldType::Bool)
    }

    /// Marks the field as part of free-text search.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Marks the field as the record key.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }
}

#[derive(Deserialize)]
struct SchemaConfig {
    fields: Vec<FieldSpec>,
}

/// The declared shape of a collection's records.
///
/// A default schema has no fields; evaluating against it fails with
/// [`SiftError::EmptySchema`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    key: Option<usize>,
}

impl Schema {
    /// Registers a set of field declarations.
    ///
    /// The key is the field marked with [`FieldSpec::key`], or a field named
    /// `id` when none is marked. Without either, ties in sorting fall back to
    /// input order.
    ///
    /// # Errors
    ///
    /// - [`SiftError::DuplicateField`] if a name is declared twice
    /// - [`SiftError::MultipleKeys`] if more than one field is marked as key
    /// - [`SiftError::TypeMismatch`] if a number, date, or bool field is
    ///   marked searchable
    pub fn define(fields: impl IntoIterator<Item = FieldSpec>) -> Result<Schema> {
        let fields: Vec<FieldSpec> = fields.into_iter().collect();
        let mut index = HashMap::with_capacity(fields.len());
        let mut key: Option<usize> = None;

        for (position, spec) in fields.iter().enumerate() {
            if index.insert(spec.name.clone(), position).is_some() {
                return Err(SiftError::DuplicateField(spec.name.clone()));
            }
            if spec.searchable && !spec.field_type.is_textual() {
                return Err(SiftError::mismatch(
                    &spec.name,
                    "free-text search",
                    spec.field_type.as_str(),
                ));
            }
            if spec.key {
                if let Some(previous) = key {
                    return Err(SiftError::MultipleKeys {
                        first: fields[previous].name.clone(),
                        second: spec.name.clone(),
                    });
                }
                key = Some(position);
            }
        }

        let key = key.or_else(|| index.get("id").copied());
        debug!(
            fields = fields.len(),
            key = key.map(|k| fields[k].name.as_str()),
            "schema defined"
        );

        Ok(Schema { fields, index, key })
    }

    /// Starts a schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parses a schema from YAML.
    pub fn from_yaml_str(source: &str) -> Result<Schema> {
        let config: SchemaConfig = serde_yaml::from_str(source)?;
        Schema::define(config.fields)
    }

    /// Parses a schema from JSON.
    pub fn from_json_str(source: &str) -> Result<Schema> {
        let config: SchemaConfig = serde_json::from_str(source)?;
        Schema::define(config.fields)
    }

    /// Loads a schema file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Schema> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let source = std::fs::read_to_string(path)?;

        match extension.as_str() {
            "json" => Schema::from_json_str(&source),
            "yaml" | "yml" => Schema::from_yaml_str(&source),
            other => Err(SiftError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Looks up a field, failing with [`SiftError::InvalidQuery`] if it is
    /// not declared.
    pub(crate) fn require(&self, name: &str, context: &'static str) -> Result<&FieldSpec> {
        self.get(name)
            .ok_or_else(|| SiftError::unknown_field(name, context))
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Fields matched by free-text search, in declaration order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| spec.searchable)
    }

    /// The record key field, if one is declared.
    pub fn key_field(&self) -> Option<&FieldSpec> {
        self.key.map(|i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Incremental schema construction.
///
/// ```
/// use sift::{FieldSpec, Schema};
///
/// let schema = Schema::builder()
///     .field(FieldSpec::text("id").key())
///     .field(FieldSpec::text("title").searchable())
///     .field(FieldSpec::number("duration"))
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.key_field().map(|f| f.name.as_str()), Some("id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> Result<Schema> {
        Schema::define(self.fields)
    }
}
