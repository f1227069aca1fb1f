//! Field values and query operands.
//!
//! [`Value`] is the borrowed view of a record field handed to the engine.
//! [`Scalar`] is the owned operand stored inside filters, and [`FieldValue`]
//! is the owned field storage used by [`Document`](crate::Document).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use sift::{Value, Number};
///
/// struct Course {
///     title: String,
///     duration: u32,
///     topics: Vec<String>,
/// }
///
/// fn field<'a>(course: &'a Course, name: &str) -> Value<'a> {
///     match name {
///         "title" => Value::Text(&course.title),
///         "duration" => Value::Number(Number::from(course.duration)),
///         "topics" => Value::Tags(&course.topics),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value, used for both free text and enum fields.
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Date value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// Set of tags.
    Tags(&'a [String]),
    /// Field not present or null.
    None,
}

impl<'a> Value<'a> {
    /// `true` when the record has nothing in this field.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&'a [String]> {
        match *self {
            Value::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "date",
            Value::Bool(_) => "bool",
            Value::Tags(_) => "tag-set",
            Value::None => "missing",
        }
    }
}

/// A number as read from a record or written in a query.
///
/// Integers stay integers so that large counts and epoch milliseconds compare
/// exactly; only comparisons that involve a float go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Orders two numbers across representations. `None` if either is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        use Number::{F64, I64, U64};

        match (self, other) {
            (I64(a), I64(b)) => Some(a.cmp(&b)),
            (U64(a), U64(b)) => Some(a.cmp(&b)),
            (I64(a), U64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (U64(a), I64(b)) => Some(i128::from(a).cmp(&i128::from(b))),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Total order for sorting; NaN goes after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.as_f64().total_cmp(&other.as_f64()))
    }

    /// The value as whole milliseconds, when it is integral.
    pub(crate) fn as_millis(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(n) if n.is_finite() && n.fract() == 0.0 => Some(n as i64),
            Number::F64(_) => None,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// A point in time, in milliseconds since the Unix epoch.
///
/// ```
/// use sift::Timestamp;
///
/// assert!(Timestamp::from_secs(1) < Timestamp::from_millis(1500));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Whole seconds, rounding toward negative infinity.
    pub fn as_secs(self) -> i64 {
        self.0.div_euclid(1000)
    }
}

/// Owned operand stored in a filter.
///
/// Deserializes untagged, so a JSON integer becomes a [`Number`]; the engine
/// reads integral numbers as dates when the target field is a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
    #[serde(skip_deserializing)]
    Timestamp(Timestamp),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the operand as a date: either a timestamp or an integral number.
    pub(crate) fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Scalar::Timestamp(t) => Some(*t),
            Scalar::Number(n) => n.as_millis().map(Timestamp),
            _ => None,
        }
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Timestamp> for Scalar {
    fn from(t: Timestamp) -> Self {
        Scalar::Timestamp(t)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

macro_rules! scalar_from_number {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )+
    };
}

scalar_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Owned field storage for dynamically shaped records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Tags(Vec<String>),
}

impl FieldValue {
    /// Borrows this field as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            FieldValue::Null => Value::None,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(*n),
            FieldValue::Text(s) => Value::Text(s),
            FieldValue::Tags(tags) => Value::Tags(tags),
        }
    }
}
