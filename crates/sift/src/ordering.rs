//! Sort order for query results.
//!
//! Provides [`Dir`] for sort direction, [`SortKey`] for a single field
//! ordering and [`Sort`] for a primary key with an optional tie-break.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    /// Descending order (largest first).
    #[serde(alias = "descending")]
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field and the direction to sort it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub dir: Dir,
}

impl SortKey {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortKey {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Desc)
    }

    /// Compares two field values under this key's direction.
    ///
    /// Missing values sort after present ones in either direction. Values of
    /// different kinds order by kind, so the comparison stays a total order.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(
                compare_values(a, b).unwrap_or_else(|| kind_rank(a).cmp(&kind_rank(b))),
            ),
        }
    }
}

/// Primary sort key plus an optional secondary tie-break.
///
/// In JSON: `{"field": "rating", "dir": "desc", "then": {"field": "title"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(flatten)]
    pub primary: SortKey,
    #[serde(default, rename = "then", skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SortKey>,
}

impl Sort {
    pub fn new(primary: SortKey) -> Self {
        Sort {
            primary,
            secondary: None,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Sort::new(SortKey::asc(field))
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort::new(SortKey::desc(field))
    }

    /// Sets the secondary tie-break key.
    pub fn then(mut self, key: SortKey) -> Self {
        self.secondary = Some(key);
        self
    }

    /// The declared keys, primary first.
    pub fn keys(&self) -> impl Iterator<Item = &SortKey> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }
}

/// Compares two values of the same type.
///
/// Text compares case-insensitively first so that "alphabetical" reads
/// naturally, then by raw bytes. Numbers use a total order (NaN last).
/// Returns `None` if the types don't match or either side is missing.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => Some(
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
                .then_with(|| a.cmp(b)),
        ),
        (Value::Number(a), Value::Number(b)) => Some(a.total_cmp(*b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Tags(a), Value::Tags(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::Timestamp(_) => 2,
        Value::Text(_) => 3,
        Value::Tags(_) => 4,
        Value::None => 5,
    }
}
