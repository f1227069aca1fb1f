//! Query builder.
//!
//! The [`Query`] struct is an immutable description of what a user selected:
//! search text, per-field filters and a sort order. It is built fluently in
//! code or deserialized from JSON and handed to
//! [`QueryEngine::evaluate`](crate::QueryEngine::evaluate).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::{Filter, Range};
use crate::ordering::{Dir, Sort, SortKey};
use crate::value::Scalar;

/// A declarative query: search text, filters, sort and pagination.
///
/// Filters combine with fixed logic:
///
/// ```text
/// match = (search text empty, or found in a searchable field)
///       ∧ (every filter passes)
/// ```
///
/// Within a multi-value filter the accepted values are alternatives.
///
/// # Example
///
/// ```
/// use sift::{Query, Range};
///
/// let query = Query::new()
///     .search("python")
///     .filter_any("difficulty", ["Beginner", "Advanced"])
///     .filter_range("duration", Range::between(15, 50))
///     .sort_desc("enrolledCount")
///     .limit(20)
///     .build();
///
/// assert_eq!(query.filters().len(), 2);
/// ```
///
/// The same query as JSON:
///
/// ```
/// use sift::Query;
///
/// let query = Query::from_json_str(r#"{
///     "search": "python",
///     "filters": {
///         "difficulty": ["Beginner", "Advanced"],
///         "duration": {"min": 15, "max": 50}
///     },
///     "sort": {"field": "enrolledCount", "dir": "desc"},
///     "limit": 20
/// }"#).unwrap();
///
/// assert_eq!(query.search_text(), Some("python"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Query {
    #[serde(alias = "searchText", skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(with = "ordered_filters", skip_serializing_if = "Vec::is_empty")]
    filters: Vec<(String, Filter)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all_sentinel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all records and keeps their input order.
    pub fn new() -> Self {
        Query::default()
    }

    /// Parses a query from JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Sets the free-text search. Blank text disables the search stage.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Sets the filter for a field.
    ///
    /// Filters are kept in insertion order, one per field; setting a field
    /// again replaces its filter in place.
    pub fn filter(mut self, field: &str, filter: impl Into<Filter>) -> Self {
        insert_filter(&mut self.filters, field.to_string(), filter.into());
        self
    }

    /// Adds an equality filter.
    pub fn filter_eq(self, field: &str, value: impl Into<Scalar>) -> Self {
        self.filter(field, Filter::Equals(value.into()))
    }

    /// Adds a multi-value filter: any of the values is accepted.
    pub fn filter_any<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        self.filter(field, Filter::any_of(values))
    }

    /// Adds an inclusive range filter.
    pub fn filter_range(self, field: &str, range: Range) -> Self {
        self.filter(field, Filter::Range(range))
    }

    /// Adds a regex filter.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn filter_matches(self, field: &str, pattern: &str) -> Result<Self> {
        Ok(self.filter(field, Filter::pattern(pattern)?))
    }

    /// Removes the filter for a field, if any.
    pub fn without_filter(mut self, field: &str) -> Self {
        self.filters.retain(|(name, _)| name != field);
        self
    }

    /// Sets the value that turns an equality filter into a no-op, such as
    /// `"all"` in a category dropdown.
    pub fn all_sentinel(mut self, value: impl Into<String>) -> Self {
        self.all_sentinel = Some(value.into());
        self
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Sets the sort order.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sorts ascending by a field.
    pub fn sort_asc(self, field: &str) -> Self {
        self.sort(Sort::asc(field))
    }

    /// Sorts descending by a field.
    pub fn sort_desc(self, field: &str) -> Self {
        self.sort(Sort::desc(field))
    }

    /// Sets the secondary tie-break key. Without a primary sort, the key
    /// becomes the primary.
    pub fn then_by(mut self, field: &str, dir: Dir) -> Self {
        let key = SortKey::new(field, dir);
        self.sort = Some(match self.sort.take() {
            Some(sort) => sort.then(key),
            None => Sort::new(key),
        });
        self
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The raw search text, if set.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Field filters in insertion order.
    pub fn filters(&self) -> &[(String, Filter)] {
        &self.filters
    }

    /// The filter for a field, if any.
    pub fn filter_for(&self, field: &str) -> Option<&Filter> {
        self.filters
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, filter)| filter)
    }

    pub fn sort_order(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn sentinel(&self) -> Option<&str> {
        self.all_sentinel.as_deref()
    }

    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if this query selects and orders nothing: every record
    /// is returned in input order.
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.filters.is_empty()
            && self.sort.is_none()
    }
}

fn insert_filter(filters: &mut Vec<(String, Filter)>, field: String, filter: Filter) {
    match filters.iter_mut().find(|(name, _)| *name == field) {
        Some(slot) => slot.1 = filter,
        None => filters.push((field, filter)),
    }
}

/// Serializes filters as a JSON object while keeping their order.
mod ordered_filters {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::insert_filter;
    use crate::filter::Filter;

    pub fn serialize<S: Serializer>(
        filters: &[(String, Filter)],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(filters.len()))?;
        for (field, filter) in filters {
            map.serialize_entry(field, filter)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<(String, Filter)>, D::Error> {
        deserializer.deserialize_map(FiltersVisitor)
    }

    struct FiltersVisitor;

    impl<'de> Visitor<'de> for FiltersVisitor {
        type Value = Vec<(String, Filter)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to filters")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut filters = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((field, filter)) = access.next_entry::<String, Filter>()? {
                insert_filter(&mut filters, field, filter);
            }
            Ok(filters)
        }
    }
}
