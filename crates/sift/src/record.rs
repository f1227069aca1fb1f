//! Record access.
//!
//! The engine reads records only through the [`Record`] trait. Typed structs
//! implement it by hand; [`Document`] implements it for dynamically shaped
//! records such as JSON objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, Value};

/// Trait for types that can be queried by the engine.
///
/// # Example
///
/// ```
/// use sift::{Record, Value, Number};
///
/// struct Thread {
///     title: String,
///     replies: u32,
///     tags: Vec<String>,
/// }
///
/// impl Record for Thread {
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "title" => Value::Text(&self.title),
///             "replies" => Value::Number(Number::from(self.replies)),
///             "tags" => Value::Tags(&self.tags),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if the record does
    /// not carry it.
    fn field(&self, name: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

/// A record backed by a field-name map.
///
/// Deserializes from a flat JSON/YAML object whose values are strings,
/// numbers, booleans, arrays of strings, or null.
///
/// ```
/// use sift::{Document, Record, Value};
///
/// let doc: Document = serde_json::from_str(
///     r#"{"id": "c1", "title": "Rust Basics", "topics": ["rust"]}"#,
/// ).unwrap();
///
/// assert_eq!(doc.field("title"), Value::Text("Rust Basics"));
/// assert!(doc.field("missing").is_missing());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Sets a field, returning the document for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Record for Document {
    fn field(&self, name: &str) -> Value<'_> {
        self.fields
            .get(name)
            .map(FieldValue::as_value)
            .unwrap_or(Value::None)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(tags: Vec<String>) -> Self {
        FieldValue::Tags(tags)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(tags: Vec<&str>) -> Self {
        FieldValue::Tags(tags.into_iter().map(str::to_string).collect())
    }
}

macro_rules! field_value_from_number {
    ($($t:ty),+) => {
        $(
            impl From<$t> for FieldValue {
                fn from(n: $t) -> Self {
                    FieldValue::Number(crate::value::Number::from(n))
                }
            }
        )+
    };
}

field_value_from_number!(i32, i64, u32, u64, usize, f64);
