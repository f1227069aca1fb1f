//! Sift - declarative search, filter and sort over in-memory collections.
//!
//! Sift evaluates a [`Query`] (free-text search, per-field filters and a sort
//! order) against a slice of records and returns the matching, ordered
//! subset. Records are read through the [`Record`] trait and validated
//! against a [`Schema`] that declares each field's type.
//!
//! - Field types: text, enum, number, tag-set, date, bool
//! - Filters: equality, multi-value, inclusive range, regex
//! - Deterministic sort with a secondary key and a record-key tie-break
//! - Pagination with the total match count preserved
//! - Schemas from YAML/JSON, queries from JSON
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{FieldSpec, Number, Query, QueryEngine, Range, Record, Schema, Value};
//!
//! struct Course {
//!     id: &'static str,
//!     title: &'static str,
//!     difficulty: &'static str,
//!     duration: u32,
//! }
//!
//! impl Record for Course {
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "id" => Value::Text(self.id),
//!             "title" => Value::Text(self.title),
//!             "difficulty" => Value::Text(self.difficulty),
//!             "duration" => Value::Number(Number::from(self.duration)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let schema = Schema::define([
//!     FieldSpec::text("id").key(),
//!     FieldSpec::text("title").searchable(),
//!     FieldSpec::enumeration("difficulty"),
//!     FieldSpec::number("duration"),
//! ]).unwrap();
//!
//! let courses = vec![
//!     Course { id: "c1", title: "Intro to Python", difficulty: "Beginner", duration: 8 },
//!     Course { id: "c2", title: "Web Security", difficulty: "Intermediate", duration: 35 },
//!     Course { id: "c3", title: "Systems in Rust", difficulty: "Advanced", duration: 84 },
//! ];
//!
//! let query = Query::new()
//!     .filter_any("difficulty", ["Beginner", "Advanced"])
//!     .filter_range("duration", Range::at_least(10))
//!     .build();
//!
//! let results = QueryEngine::new(&schema).evaluate(&courses, &query).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].id, "c3");
//! ```
//!
//! # Query Semantics
//!
//! ```text
//! match = (search empty, or search text is a substring of a searchable field)
//!       ∧ (every filter passes)
//! ```
//!
//! Filters on different fields AND together; the values of one multi-value
//! filter OR together. Without a sort, records keep their input order. With a
//! sort, ties fall to the secondary key, then the record key ascending, then
//! input order, so repeated calls always produce the same order.
//!
//! # Field Types and Filters
//!
//! | Type | Filters |
//! |------|---------|
//! | text, enum | `Equals`, `AnyOf`, `Matches` |
//! | tag-set | `AnyOf`, `Matches` |
//! | number, date | `Equals`, `Range` |
//! | bool | `Equals` |

mod engine;
mod error;
mod filter;
mod ordering;
mod query;
mod record;
mod schema;
mod search;
mod value;

// Re-export public API
pub use engine::{evaluate, QueryEngine, ResultSet};
pub use error::{Result, SiftError};
pub use filter::{Filter, Range};
pub use ordering::{compare_values, Dir, Sort, SortKey};
pub use query::Query;
pub use record::{Document, Record};
pub use schema::{FieldSpec, FieldType, Schema, SchemaBuilder};
pub use search::{normalize, SearchText};
pub use value::{FieldValue, Number, Scalar, Timestamp, Value};
