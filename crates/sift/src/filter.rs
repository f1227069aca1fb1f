//! Field filters.
//!
//! A [`Filter`] is the predicate a query attaches to one field. The filter's
//! kind decides which field types it accepts:
//!
//! | Filter | Field types | Passes when |
//! |--------|-------------|-------------|
//! | `Equals` | text, enum, number, date, bool | field equals the operand |
//! | `AnyOf` | tag-set, enum, text | a tag, or the value, is one of the operands |
//! | `Range` | number, date | field lies within the inclusive bounds |
//! | `Matches` | text, enum, tag-set | the value, or any tag, matches the regex |
//!
//! A record whose field is missing never passes a filter.

use std::cmp::Ordering;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::schema::{FieldSpec, FieldType};
use crate::value::{Scalar, Value};

/// Predicate applied to a single field.
///
/// In JSON a filter is written by shape: a scalar is an equality filter, an
/// array is a multi-value filter, `{"min": .., "max": ..}` is a range and
/// `{"matches": ".."}` is a regex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FilterRepr", into = "FilterRepr")]
pub enum Filter {
    /// Field equals the operand.
    Equals(Scalar),
    /// Field (or one of its tags) is one of the operands.
    AnyOf(Vec<Scalar>),
    /// Field lies within the range, bounds inclusive.
    Range(Range),
    /// Field (or one of its tags) matches the regex.
    Matches(Regex),
}

impl Filter {
    /// Builds a regex filter.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn pattern(pattern: &str) -> Result<Filter> {
        Ok(Filter::Matches(Regex::new(pattern)?))
    }

    /// Builds a multi-value filter from any iterable of operands.
    pub fn any_of<I, S>(values: I) -> Filter
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Filter::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Returns the display name of this filter kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Equals(_) => "equality filter",
            Filter::AnyOf(_) => "multi-value filter",
            Filter::Range(_) => "range filter",
            Filter::Matches(_) => "pattern filter",
        }
    }

    /// Returns `true` for an equality filter whose operand is the caller's
    /// "all" sentinel.
    pub fn is_sentinel(&self, sentinel: Option<&str>) -> bool {
        match (self, sentinel) {
            (Filter::Equals(Scalar::Text(value)), Some(sentinel)) => value == sentinel,
            _ => false,
        }
    }

    /// Checks that this filter, and its operands, fit the field's type.
    pub fn validate(&self, spec: &FieldSpec) -> Result<()> {
        let field_type = spec.field_type;
        let accepts_kind = match self {
            Filter::Equals(_) => field_type != FieldType::TagSet,
            Filter::AnyOf(_) => field_type.is_textual(),
            Filter::Range(_) => field_type.is_ordered(),
            Filter::Matches(_) => field_type.is_textual(),
        };
        if !accepts_kind {
            return Err(SiftError::mismatch(
                &spec.name,
                self.kind(),
                field_type.as_str(),
            ));
        }

        let operands: Vec<&Scalar> = match self {
            Filter::Equals(value) => vec![value],
            Filter::AnyOf(values) => values.iter().collect(),
            Filter::Range(range) => range.bounds().collect(),
            Filter::Matches(_) => Vec::new(),
        };
        for operand in operands {
            if !operand_fits(operand, field_type) {
                return Err(SiftError::mismatch(
                    &spec.name,
                    operand_kind(operand),
                    field_type.as_str(),
                ));
            }
        }
        Ok(())
    }

    /// Evaluates this filter against a field value.
    ///
    /// Operand/value type combinations that [`validate`](Self::validate)
    /// would reject never match.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (_, Value::None) => false,
            (Filter::Equals(operand), value) => equals(operand, value),
            (Filter::AnyOf(operands), Value::Tags(tags)) => tags
                .iter()
                .any(|tag| operands.iter().any(|op| op.as_str() == Some(tag.as_str()))),
            (Filter::AnyOf(operands), Value::Text(text)) => {
                operands.iter().any(|op| op.as_str() == Some(*text))
            }
            (Filter::Range(range), value) => range.contains(value),
            (Filter::Matches(regex), Value::Text(text)) => regex.is_match(text),
            (Filter::Matches(regex), Value::Tags(tags)) => {
                tags.iter().any(|tag| regex.is_match(tag))
            }
            _ => false,
        }
    }
}

fn equals(operand: &Scalar, value: &Value<'_>) -> bool {
    match (operand, value) {
        (Scalar::Text(expected), Value::Text(actual)) => expected == actual,
        (Scalar::Number(expected), Value::Number(actual)) => {
            actual.compare(*expected) == Some(Ordering::Equal)
        }
        (Scalar::Bool(expected), Value::Bool(actual)) => expected == actual,
        (operand, Value::Timestamp(actual)) => operand.as_timestamp() == Some(*actual),
        _ => false,
    }
}

fn operand_fits(operand: &Scalar, field_type: FieldType) -> bool {
    match field_type {
        FieldType::Text | FieldType::Enum | FieldType::TagSet => {
            matches!(operand, Scalar::Text(_))
        }
        FieldType::Number => matches!(operand, Scalar::Number(_)),
        FieldType::Date => operand.as_timestamp().is_some(),
        FieldType::Bool => matches!(operand, Scalar::Bool(_)),
    }
}

fn operand_kind(operand: &Scalar) -> &'static str {
    match operand {
        Scalar::Bool(_) => "bool operand",
        Scalar::Number(_) => "number operand",
        Scalar::Text(_) => "text operand",
        Scalar::Timestamp(_) => "date operand",
    }
}

/// Inclusive range over a number or date field. An absent bound is unbounded
/// on that side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Scalar>,
}

impl Range {
    /// Range with both bounds, inclusive.
    pub fn between(min: impl Into<Scalar>, max: impl Into<Scalar>) -> Self {
        Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Range bounded below only.
    pub fn at_least(min: impl Into<Scalar>) -> Self {
        Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Range bounded above only.
    pub fn at_most(max: impl Into<Scalar>) -> Self {
        Range {
            min: None,
            max: Some(max.into()),
        }
    }

    fn bounds(&self) -> impl Iterator<Item = &Scalar> {
        self.min.iter().chain(self.max.iter())
    }

    /// Returns `true` if the value lies within the range.
    pub fn contains(&self, value: &Value<'_>) -> bool {
        let above_min = self
            .min
            .as_ref()
            .map_or(true, |min| compare(value, min).is_some_and(Ordering::is_ge));
        let below_max = self
            .max
            .as_ref()
            .map_or(true, |max| compare(value, max).is_some_and(Ordering::is_le));
        above_min && below_max
    }
}

/// Compares a field value against a bound, `None` when they are not comparable.
fn compare(value: &Value<'_>, bound: &Scalar) -> Option<Ordering> {
    match (value, bound) {
        (Value::Number(n), Scalar::Number(b)) => n.compare(*b),
        (Value::Timestamp(t), bound) => bound.as_timestamp().map(|b| t.cmp(&b)),
        _ => None,
    }
}

/// Wire shape of a filter.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FilterRepr {
    Equals(Scalar),
    AnyOf(Vec<Scalar>),
    Pattern { matches: String },
    Range(Range),
}

impl TryFrom<FilterRepr> for Filter {
    type Error = regex::Error;

    fn try_from(repr: FilterRepr) -> std::result::Result<Self, Self::Error> {
        Ok(match repr {
            FilterRepr::Equals(value) => Filter::Equals(value),
            FilterRepr::AnyOf(values) => Filter::AnyOf(values),
            FilterRepr::Pattern { matches } => Filter::Matches(Regex::new(&matches)?),
            FilterRepr::Range(range) => Filter::Range(range),
        })
    }
}

impl From<Filter> for FilterRepr {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Equals(value) => FilterRepr::Equals(value),
            Filter::AnyOf(values) => FilterRepr::AnyOf(values),
            Filter::Range(range) => FilterRepr::Range(range),
            Filter::Matches(regex) => FilterRepr::Pattern {
                matches: regex.as_str().to_string(),
            },
        }
    }
}

impl From<Range> for Filter {
    fn from(range: Range) -> Self {
        Filter::Range(range)
    }
}

impl From<Regex> for Filter {
    fn from(regex: Regex) -> Self {
        Filter::Matches(regex)
    }
}
