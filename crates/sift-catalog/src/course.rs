//! Course records and the catalog filter panel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sift::{FieldSpec, Number, Query, Range, Record, Schema, Sort, SortKey, Timestamp, Value};

use crate::error::CatalogError;
use crate::ALL;

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub category: String,
    pub difficulty: String,
    pub duration_hours: u32,
    pub lessons: u32,
    pub enrolled_count: u64,
    pub rating: f64,
    /// Price in dollars; zero for free courses.
    pub price: f64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub is_new: bool,
    pub published: Timestamp,
}

impl Course {
    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const DESCRIPTION: &'static str = "description";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const CATEGORY: &'static str = "category";
    pub const DIFFICULTY: &'static str = "difficulty";
    pub const DURATION: &'static str = "duration";
    pub const LESSONS: &'static str = "lessons";
    pub const ENROLLED: &'static str = "enrolledCount";
    pub const RATING: &'static str = "rating";
    pub const PRICE: &'static str = "price";
    pub const TOPICS: &'static str = "topics";
    pub const IS_NEW: &'static str = "isNew";
    pub const PUBLISHED: &'static str = "published";

    /// Field declarations for course collections.
    pub fn schema() -> sift::Result<Schema> {
        Schema::builder()
            .field(FieldSpec::text(Self::ID).key())
            .field(FieldSpec::text(Self::TITLE).searchable())
            .field(FieldSpec::text(Self::DESCRIPTION).searchable())
            .field(FieldSpec::text(Self::INSTRUCTOR).searchable())
            .field(FieldSpec::enumeration(Self::CATEGORY))
            .field(FieldSpec::enumeration(Self::DIFFICULTY))
            .field(FieldSpec::number(Self::DURATION))
            .field(FieldSpec::number(Self::LESSONS))
            .field(FieldSpec::number(Self::ENROLLED))
            .field(FieldSpec::number(Self::RATING))
            .field(FieldSpec::number(Self::PRICE))
            .field(FieldSpec::tags(Self::TOPICS).searchable())
            .field(FieldSpec::boolean(Self::IS_NEW))
            .field(FieldSpec::date(Self::PUBLISHED))
            .build()
    }

    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }
}

impl Record for Course {
    fn field(&self, name: &str) -> Value<'_> {
        match name {
            Self::ID => Value::Text(&self.id),
            Self::TITLE => Value::Text(&self.title),
            Self::DESCRIPTION => Value::Text(&self.description),
            Self::INSTRUCTOR => Value::Text(&self.instructor),
            Self::CATEGORY => Value::Text(&self.category),
            Self::DIFFICULTY => Value::Text(&self.difficulty),
            Self::DURATION => Value::Number(Number::from(self.duration_hours)),
            Self::LESSONS => Value::Number(Number::from(self.lessons)),
            Self::ENROLLED => Value::Number(Number::from(self.enrolled_count)),
            Self::RATING => Value::Number(Number::from(self.rating)),
            Self::PRICE => Value::Number(Number::from(self.price)),
            Self::TOPICS => Value::Tags(&self.topics),
            Self::IS_NEW => Value::Bool(self.is_new),
            Self::PUBLISHED => Value::Timestamp(self.published),
            _ => Value::None,
        }
    }
}

// ============================================================================
// Sort presets
// ============================================================================

/// The sort choices offered by the catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseSort {
    /// Most enrolled first.
    #[default]
    Popularity,
    Rating,
    Newest,
    /// Shortest first.
    Duration,
    Alphabetical,
    PriceLowHigh,
    PriceHighLow,
}

impl CourseSort {
    pub const ALL: [CourseSort; 7] = [
        CourseSort::Popularity,
        CourseSort::Rating,
        CourseSort::Newest,
        CourseSort::Duration,
        CourseSort::Alphabetical,
        CourseSort::PriceLowHigh,
        CourseSort::PriceHighLow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CourseSort::Popularity => "popularity",
            CourseSort::Rating => "rating",
            CourseSort::Newest => "newest",
            CourseSort::Duration => "duration",
            CourseSort::Alphabetical => "alphabetical",
            CourseSort::PriceLowHigh => "price-low-high",
            CourseSort::PriceHighLow => "price-high-low",
        }
    }

    /// The sort order this preset stands for.
    pub fn sort(self) -> Sort {
        match self {
            CourseSort::Popularity => {
                Sort::desc(Course::ENROLLED).then(SortKey::desc(Course::RATING))
            }
            CourseSort::Rating => Sort::desc(Course::RATING).then(SortKey::desc(Course::ENROLLED)),
            CourseSort::Newest => Sort::desc(Course::PUBLISHED),
            CourseSort::Duration => Sort::asc(Course::DURATION),
            CourseSort::Alphabetical => Sort::asc(Course::TITLE),
            CourseSort::PriceLowHigh => Sort::asc(Course::PRICE).then(SortKey::desc(Course::RATING)),
            CourseSort::PriceHighLow => Sort::desc(Course::PRICE).then(SortKey::desc(Course::RATING)),
        }
    }
}

impl fmt::Display for CourseSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CourseSort::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownSort(s.to_string()))
    }
}

// ============================================================================
// Duration buckets
// ============================================================================

/// Coarse duration choices. Durations are whole hours, so the inclusive
/// bounds leave no gaps between buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    #[default]
    Any,
    /// Up to 10 hours.
    Short,
    /// 11 to 40 hours.
    Medium,
    /// More than 40 hours.
    Long,
}

impl DurationBucket {
    pub fn range(self) -> Option<Range> {
        match self {
            DurationBucket::Any => None,
            DurationBucket::Short => Some(Range::at_most(10)),
            DurationBucket::Medium => Some(Range::between(11, 40)),
            DurationBucket::Long => Some(Range::at_least(41)),
        }
    }
}

// ============================================================================
// Filter panel
// ============================================================================

/// State of the catalog filter panel.
///
/// Empty lists and the `"all"` category mean "no constraint". The panel
/// deserializes from the camelCase JSON the page keeps in its URL state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogFilters {
    pub search: String,
    pub category: String,
    pub difficulties: Vec<String>,
    pub topics: Vec<String>,
    pub duration: DurationBucket,
    pub max_price: Option<f64>,
    pub free_only: bool,
    pub new_only: bool,
    pub sort: CourseSort,
    pub page: usize,
    pub page_size: Option<usize>,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            difficulties: Vec::new(),
            topics: Vec::new(),
            duration: DurationBucket::Any,
            max_price: None,
            free_only: false,
            new_only: false,
            sort: CourseSort::Popularity,
            page: 0,
            page_size: None,
        }
    }
}

impl CatalogFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulties.push(difficulty.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    pub fn duration(mut self, bucket: DurationBucket) -> Self {
        self.duration = bucket;
        self
    }

    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn free_only(mut self) -> Self {
        self.free_only = true;
        self
    }

    pub fn new_only(mut self) -> Self {
        self.new_only = true;
        self
    }

    pub fn sort(mut self, sort: CourseSort) -> Self {
        self.sort = sort;
        self
    }

    /// Selects a zero-based page of `size` results.
    pub fn page(mut self, page: usize, size: usize) -> Self {
        self.page = page;
        self.page_size = Some(size);
        self
    }

    /// Translates the panel state into a query over [`Course::schema`].
    pub fn to_query(&self) -> Query {
        let mut query = Query::new().all_sentinel(ALL).sort(self.sort.sort());

        if !self.search.trim().is_empty() {
            query = query.search(self.search.as_str());
        }
        if !self.category.is_empty() {
            query = query.filter_eq(Course::CATEGORY, self.category.as_str());
        }
        if !self.difficulties.is_empty() {
            query = query.filter_any(Course::DIFFICULTY, self.difficulties.iter().map(String::as_str));
        }
        if !self.topics.is_empty() {
            query = query.filter_any(Course::TOPICS, self.topics.iter().map(String::as_str));
        }
        if let Some(range) = self.duration.range() {
            query = query.filter_range(Course::DURATION, range);
        }
        if self.free_only {
            query = query.filter_range(Course::PRICE, Range::at_most(0));
        } else if let Some(max) = self.max_price {
            query = query.filter_range(Course::PRICE, Range::at_most(max));
        }
        if self.new_only {
            query = query.filter_eq(Course::IS_NEW, true);
        }
        if let Some(size) = self.page_size {
            query = query.offset(self.page.saturating_mul(size)).limit(size);
        }
        query
    }
}
