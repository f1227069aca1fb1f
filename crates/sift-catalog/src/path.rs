//! Learning paths: curated sequences of courses.

use serde::{Deserialize, Serialize};
use sift::{FieldSpec, Number, Record, Schema, Value};

use crate::course::Course;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    /// Course ids in the order they should be taken.
    pub course_ids: Vec<String>,
    pub estimated_hours: u32,
    pub enrolled_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl LearningPath {
    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const DESCRIPTION: &'static str = "description";
    pub const DIFFICULTY: &'static str = "difficulty";
    pub const COURSES: &'static str = "courseIds";
    pub const HOURS: &'static str = "estimatedHours";
    pub const ENROLLED: &'static str = "enrolledCount";
    pub const TOPICS: &'static str = "topics";

    pub fn schema() -> sift::Result<Schema> {
        Schema::builder()
            .field(FieldSpec::text(Self::ID).key())
            .field(FieldSpec::text(Self::TITLE).searchable())
            .field(FieldSpec::text(Self::DESCRIPTION).searchable())
            .field(FieldSpec::enumeration(Self::DIFFICULTY))
            .field(FieldSpec::tags(Self::COURSES))
            .field(FieldSpec::number(Self::HOURS))
            .field(FieldSpec::number(Self::ENROLLED))
            .field(FieldSpec::tags(Self::TOPICS).searchable())
            .build()
    }

    /// Resolves this path's courses against a course collection, in path
    /// order. Ids with no matching course are skipped.
    pub fn resolve<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        self.course_ids
            .iter()
            .filter_map(|id| courses.iter().find(|course| &course.id == id))
            .collect()
    }
}

impl Record for LearningPath {
    fn field(&self, name: &str) -> Value<'_> {
        match name {
            Self::ID => Value::Text(&self.id),
            Self::TITLE => Value::Text(&self.title),
            Self::DESCRIPTION => Value::Text(&self.description),
            Self::DIFFICULTY => Value::Text(&self.difficulty),
            Self::COURSES => Value::Tags(&self.course_ids),
            Self::HOURS => Value::Number(Number::from(self.estimated_hours)),
            Self::ENROLLED => Value::Number(Number::from(self.enrolled_count)),
            Self::TOPICS => Value::Tags(&self.topics),
            _ => Value::None,
        }
    }
}
