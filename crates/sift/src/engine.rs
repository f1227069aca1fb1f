//! Query evaluation.
//!
//! [`QueryEngine`] runs a [`Query`] against a slice of records in three
//! stages (text search, filters, sort) and paginates the result. A query is
//! checked against the schema before any record is read, so a bad query
//! fails the same way on an empty collection as on a full one.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::error::{Result, SiftError};
use crate::filter::Filter;
use crate::ordering::SortKey;
use crate::query::Query;
use crate::record::Record;
use crate::schema::{FieldType, Schema};
use crate::search::SearchText;
use crate::value::{Timestamp, Value};

/// Evaluates queries against collections described by one schema.
///
/// The engine holds no state besides the borrowed schema; every call to
/// [`evaluate`](Self::evaluate) is independent and side-effect free.
///
/// # Example
///
/// ```
/// use sift::{Document, FieldSpec, Query, QueryEngine, Schema};
///
/// let schema = Schema::define([
///     FieldSpec::text("id"),
///     FieldSpec::text("title").searchable(),
///     FieldSpec::number("enrolled"),
/// ]).unwrap();
///
/// let courses = vec![
///     Document::new().with("id", "a").with("title", "Rust").with("enrolled", 15420),
///     Document::new().with("id", "b").with("title", "Go").with("enrolled", 18500),
/// ];
///
/// let engine = QueryEngine::new(&schema);
/// let results = engine
///     .evaluate(&courses, &Query::new().sort_desc("enrolled"))
///     .unwrap();
///
/// assert_eq!(results.total(), 2);
/// assert_eq!(results[0].get("id"), courses[1].get("id"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'s> {
    schema: &'s Schema,
}

impl<'s> QueryEngine<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        QueryEngine { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Checks a query against the schema without evaluating it.
    ///
    /// # Errors
    ///
    /// - [`SiftError::EmptySchema`] if the schema declares no fields
    /// - [`SiftError::InvalidQuery`] if a filter or sort names an undeclared field
    /// - [`SiftError::TypeMismatch`] if a filter or sort does not fit its field
    pub fn validate(&self, query: &Query) -> Result<()> {
        Plan::compile(self.schema, query).map(|_| ())
    }

    /// Returns the records matching `query`, ordered and paginated.
    pub fn evaluate<'a, R: Record>(
        &self,
        collection: &'a [R],
        query: &Query,
    ) -> Result<ResultSet<'a, R>> {
        let plan = Plan::compile(self.schema, query)?;

        let mut matched: Vec<(usize, &'a R)> = collection
            .iter()
            .enumerate()
            .filter(|(_, record)| plan.matches(*record))
            .collect();
        trace!(
            records = collection.len(),
            matched = matched.len(),
            "search and filter stages done"
        );

        if !plan.sort_keys.is_empty() {
            matched.sort_by(|(ia, a), (ib, b)| plan.compare(*a, *b).then(ia.cmp(ib)));
        }

        let total = matched.len();
        let offset = query.get_offset().unwrap_or(0);
        let limit = query.get_limit().unwrap_or(usize::MAX);
        let records: Vec<&'a R> = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record)
            .collect();

        debug!(
            records = collection.len(),
            total,
            returned = records.len(),
            "query evaluated"
        );
        Ok(ResultSet { records, total })
    }

    /// Returns `true` if a single record passes the query's search and
    /// filters. Sorting and pagination do not apply.
    pub fn matches<R: Record>(&self, record: &R, query: &Query) -> Result<bool> {
        Ok(Plan::compile(self.schema, query)?.matches(record))
    }

    /// Counts matching records, ignoring pagination.
    pub fn count<R: Record>(&self, collection: &[R], query: &Query) -> Result<usize> {
        let plan = Plan::compile(self.schema, query)?;
        Ok(collection.iter().filter(|record| plan.matches(*record)).count())
    }
}

/// Evaluates `query` against `collection` under `schema`.
///
/// Shorthand for `QueryEngine::new(schema).evaluate(collection, query)`.
pub fn evaluate<'a, R: Record>(
    collection: &'a [R],
    query: &Query,
    schema: &Schema,
) -> Result<ResultSet<'a, R>> {
    QueryEngine::new(schema).evaluate(collection, query)
}

/// Ordered records matching a query.
///
/// `total` counts every match before `offset`/`limit` were applied.
#[derive(Debug)]
pub struct ResultSet<'a, R> {
    records: Vec<&'a R>,
    total: usize,
}

impl<'a, R> ResultSet<'a, R> {
    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of matching records before pagination.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn records(&self) -> &[&'a R] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.records.iter().copied()
    }

    pub fn first(&self) -> Option<&'a R> {
        self.records.first().copied()
    }

    pub fn into_records(self) -> Vec<&'a R> {
        self.records
    }

    /// Clones the records out of the collection.
    pub fn to_owned_records(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.records.iter().map(|record| (*record).clone()).collect()
    }
}

// Manual impl: the derive would require `R: Clone`.
impl<R> Clone for ResultSet<'_, R> {
    fn clone(&self) -> Self {
        ResultSet {
            records: self.records.clone(),
            total: self.total,
        }
    }
}

impl<R> PartialEq for ResultSet<'_, R> {
    /// Two result sets are equal when they hold the same records (by
    /// identity) in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
            && self.records.len() == other.records.len()
            && self
                .records
                .iter()
                .zip(&other.records)
                .all(|(a, b)| std::ptr::eq(*a, *b))
    }
}

impl<'a, R> std::ops::Index<usize> for ResultSet<'a, R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        self.records[index]
    }
}

impl<'a, R> IntoIterator for ResultSet<'a, R> {
    type Item = &'a R;
    type IntoIter = std::vec::IntoIter<&'a R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// A query resolved against a schema: fields looked up, types checked,
/// search text normalized and no-op filters dropped.
struct Plan<'q> {
    search: Option<SearchText>,
    searchable: Vec<(&'q str, FieldType)>,
    filters: Vec<(&'q str, FieldType, &'q Filter)>,
    sort_keys: Vec<(SortKey, FieldType)>,
}

impl<'q> Plan<'q> {
    fn compile(schema: &'q Schema, query: &'q Query) -> Result<Plan<'q>> {
        if schema.is_empty() {
            return Err(SiftError::EmptySchema);
        }

        let mut filters = Vec::with_capacity(query.filters().len());
        for (field, filter) in query.filters() {
            let spec = schema.require(field, "filter")?;
            filter.validate(spec)?;
            if filter.is_sentinel(query.sentinel()) {
                trace!(field = %field, "skipping 'all' filter");
                continue;
            }
            filters.push((spec.name.as_str(), spec.field_type, filter));
        }

        let mut sort_keys = Vec::new();
        if let Some(sort) = query.sort_order() {
            for key in sort.keys() {
                let spec = schema.require(&key.field, "sort")?;
                if spec.field_type == FieldType::TagSet {
                    return Err(SiftError::mismatch(&spec.name, "sort", "tag-set"));
                }
                sort_keys.push((key.clone(), spec.field_type));
            }
            if let Some(key) = schema.key_field() {
                sort_keys.push((SortKey::asc(key.name.as_str()), key.field_type));
            }
        }

        let search = query.search_text().and_then(SearchText::new);
        let searchable = schema
            .searchable_fields()
            .map(|spec| (spec.name.as_str(), spec.field_type))
            .collect();

        Ok(Plan {
            search,
            searchable,
            filters,
            sort_keys,
        })
    }

    fn matches<R: Record>(&self, record: &R) -> bool {
        if let Some(search) = &self.search {
            let found = self
                .searchable
                .iter()
                .any(|(field, _)| search.matches(&record.field(field)));
            if !found {
                return false;
            }
        }

        self.filters.iter().all(|(field, field_type, filter)| {
            filter.matches(&read(record, field, *field_type))
        })
    }

    /// Orders two records by the sort keys, the first non-equal key deciding.
    fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        for (key, field_type) in &self.sort_keys {
            let ordering = key.compare(
                &read(a, &key.field, *field_type),
                &read(b, &key.field, *field_type),
            );
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Reads a field as its declared type. Integral numbers in date fields are
/// epoch milliseconds; any other value that does not fit the type reads as
/// missing.
fn read<'r, R: Record>(record: &'r R, field: &str, field_type: FieldType) -> Value<'r> {
    match (field_type, record.field(field)) {
        (FieldType::Date, Value::Number(n)) => n
            .as_millis()
            .map_or(Value::None, |millis| Value::Timestamp(Timestamp(millis))),
        (field_type, value) if fits(field_type, &value) => value,
        (field_type, value) => {
            trace!(field, expected = %field_type, found = value.kind(), "value read as missing");
            Value::None
        }
    }
}

fn fits(field_type: FieldType, value: &Value<'_>) -> bool {
    matches!(
        (field_type, value),
        (_, Value::None)
            | (FieldType::Text | FieldType::Enum, Value::Text(_))
            | (FieldType::Number, Value::Number(_))
            | (FieldType::Date, Value::Timestamp(_))
            | (FieldType::Bool, Value::Bool(_))
            | (FieldType::TagSet, Value::Tags(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Range;
    use crate::record::Document;
    use crate::schema::FieldSpec;

    fn schema() -> Schema {
        Schema::define([
            FieldSpec::text("id"),
            FieldSpec::text("title").searchable(),
            FieldSpec::number("rating"),
            FieldSpec::date("published"),
            FieldSpec::tags("topics"),
        ])
        .unwrap()
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::new()
                .with("id", "c")
                .with("title", "Gamma")
                .with("rating", 4.5)
                .with("published", 3000i64),
            Document::new()
                .with("id", "a")
                .with("title", "Alpha")
                .with("rating", 4.5)
                .with("published", 1000i64),
            Document::new()
                .with("id", "b")
                .with("title", "Beta")
                .with("rating", 4.9)
                .with("published", 2000i64),
        ]
    }

    fn ids<R: Record>(results: &ResultSet<'_, R>) -> Vec<String> {
        results
            .iter()
            .map(|r| r.field("id").as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn empty_schema_fails() {
        let empty = Schema::default();
        let err = QueryEngine::new(&empty)
            .evaluate::<Document>(&[], &Query::new())
            .unwrap_err();
        assert!(matches!(err, SiftError::EmptySchema));
    }

    #[test]
    fn validation_runs_on_empty_collection() {
        let schema = schema();
        let err = evaluate::<Document>(&[], &Query::new().filter_eq("foo", "x"), &schema)
            .unwrap_err();
        assert!(matches!(err, SiftError::InvalidQuery { field, context: "filter" } if field == "foo"));
    }

    #[test]
    fn unknown_sort_field() {
        let schema = schema();
        let err = evaluate(&docs(), &Query::new().sort_asc("foo"), &schema).unwrap_err();
        assert!(matches!(err, SiftError::InvalidQuery { context: "sort", .. }));
    }

    #[test]
    fn tag_set_sort_rejected() {
        let schema = schema();
        let err = evaluate(&docs(), &Query::new().sort_asc("topics"), &schema).unwrap_err();
        assert!(matches!(err, SiftError::TypeMismatch { kind: "sort", .. }));
    }

    #[test]
    fn ties_broken_by_key() {
        let schema = schema();
        let docs = docs();
        let results = evaluate(&docs, &Query::new().sort_desc("rating"), &schema).unwrap();
        assert_eq!(ids(&results), vec!["b", "a", "c"]);
    }

    #[test]
    fn date_numbers_compare_as_timestamps() {
        let schema = schema();
        let docs = docs();
        let query = Query::new()
            .filter_range("published", Range::at_least(Timestamp(1500)))
            .sort_desc("published");
        let results = evaluate(&docs, &query, &schema).unwrap();
        assert_eq!(ids(&results), vec!["c", "b"]);
    }

    #[test]
    fn mistyped_values_sort_as_missing() {
        let schema = Schema::define([FieldSpec::text("id"), FieldSpec::number("rating")]).unwrap();
        let a = Document::new().with("id", "a").with("rating", 3);
        let b = Document::new().with("id", "b").with("rating", "x");
        let c = Document::new().with("id", "c").with("rating", 1);
        let query = Query::new().sort_asc("rating");

        let forward = vec![a.clone(), b.clone(), c.clone()];
        let backward = vec![c, b, a];
        let forward_ids = ids(&evaluate(&forward, &query, &schema).unwrap());
        let backward_ids = ids(&evaluate(&backward, &query, &schema).unwrap());

        assert_eq!(forward_ids, vec!["c", "a", "b"]);
        assert_eq!(backward_ids, forward_ids);
    }

    #[test]
    fn mistyped_values_never_pass_filters() {
        let schema = Schema::define([FieldSpec::text("id"), FieldSpec::number("rating")]).unwrap();
        let docs = vec![
            Document::new().with("id", "a").with("rating", "4.5"),
            Document::new().with("id", "b").with("rating", 4.5),
        ];
        let query = Query::new().filter_range("rating", Range::at_least(4));
        assert_eq!(ids(&evaluate(&docs, &query, &schema).unwrap()), vec!["b"]);
    }

    #[test]
    fn pagination_reports_total() {
        let schema = schema();
        let docs = docs();
        let query = Query::new().sort_asc("title").offset(1).limit(1);
        let results = evaluate(&docs, &query, &schema).unwrap();
        assert_eq!(results.total(), 3);
        assert_eq!(ids(&results), vec!["b"]);

        let past_end = evaluate(&docs, &Query::new().offset(10), &schema).unwrap();
        assert!(past_end.is_empty());
        assert_eq!(past_end.total(), 3);
    }

    #[test]
    fn matches_and_count() {
        let schema = schema();
        let docs = docs();
        let engine = QueryEngine::new(&schema);
        let query = Query::new().search("ALPHA");
        assert!(engine.matches(&docs[1], &query).unwrap());
        assert!(!engine.matches(&docs[0], &query).unwrap());
        assert_eq!(engine.count(&docs, &query).unwrap(), 1);
    }

    #[test]
    fn result_set_equality_is_identity() {
        let schema = schema();
        let docs = docs();
        let query = Query::new().sort_asc("title");
        let first = evaluate(&docs, &query, &schema).unwrap();
        let second = evaluate(&docs, &query, &schema).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.clone().into_records().len(), 3);
    }
}
