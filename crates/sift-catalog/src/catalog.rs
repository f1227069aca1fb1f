//! The catalog facade: every collection with its schema, queried by page.

use std::collections::BTreeSet;

use sift::{Query, QueryEngine, ResultSet, Schema};
use tracing::debug;

use crate::course::{CatalogFilters, Course, CourseSort};
use crate::data;
use crate::error::Result;
use crate::forum::{ForumFilters, ForumThread};
use crate::path::LearningPath;

/// The platform's record collections, each paired with its schema.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    threads: Vec<ForumThread>,
    paths: Vec<LearningPath>,
    course_schema: Schema,
    thread_schema: Schema,
    path_schema: Schema,
}

impl Catalog {
    /// Builds a catalog over the bundled mock data.
    pub fn load() -> Result<Self> {
        Self::new(data::courses()?, data::threads()?, data::paths()?)
    }

    /// Builds a catalog from JSON arrays of courses, threads and paths.
    pub fn from_json(courses: &str, threads: &str, paths: &str) -> Result<Self> {
        Self::new(
            data::parse("courses", courses)?,
            data::parse("threads", threads)?,
            data::parse("learning paths", paths)?,
        )
    }

    pub fn new(
        courses: Vec<Course>,
        threads: Vec<ForumThread>,
        paths: Vec<LearningPath>,
    ) -> Result<Self> {
        Ok(Self {
            courses,
            threads,
            paths,
            course_schema: Course::schema()?,
            thread_schema: ForumThread::schema()?,
            path_schema: LearningPath::schema()?,
        })
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn threads(&self) -> &[ForumThread] {
        &self.threads
    }

    pub fn paths(&self) -> &[LearningPath] {
        &self.paths
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Runs the catalog page's filter panel.
    pub fn search_courses(&self, filters: &CatalogFilters) -> Result<ResultSet<'_, Course>> {
        debug!(sort = %filters.sort, "searching courses");
        self.query_courses(&filters.to_query())
    }

    /// Runs the forum sidebar.
    pub fn search_threads(&self, filters: &ForumFilters) -> Result<ResultSet<'_, ForumThread>> {
        debug!(sort = %filters.sort, "searching threads");
        self.query_threads(&filters.to_query())
    }

    pub fn query_courses(&self, query: &Query) -> Result<ResultSet<'_, Course>> {
        Ok(QueryEngine::new(&self.course_schema).evaluate(&self.courses, query)?)
    }

    pub fn query_threads(&self, query: &Query) -> Result<ResultSet<'_, ForumThread>> {
        Ok(QueryEngine::new(&self.thread_schema).evaluate(&self.threads, query)?)
    }

    pub fn query_paths(&self, query: &Query) -> Result<ResultSet<'_, LearningPath>> {
        Ok(QueryEngine::new(&self.path_schema).evaluate(&self.paths, query)?)
    }

    /// Top-rated courses sharing a topic with `interests`.
    ///
    /// With no interests this is simply the top-rated courses.
    pub fn recommended<S: AsRef<str>>(
        &self,
        interests: &[S],
        limit: usize,
    ) -> Result<ResultSet<'_, Course>> {
        let mut query = Query::new().sort(CourseSort::Rating.sort()).limit(limit);
        if !interests.is_empty() {
            query = query.filter_any(Course::TOPICS, interests.iter().map(AsRef::as_ref));
        }
        self.query_courses(&query)
    }

    /// Learning paths that include the given course, most enrolled first.
    pub fn paths_with_course(&self, course_id: &str) -> Result<ResultSet<'_, LearningPath>> {
        let query = Query::new()
            .filter_any(LearningPath::COURSES, [course_id])
            .sort_desc(LearningPath::ENROLLED);
        self.query_paths(&query)
    }

    // ========================================================================
    // Filter panel options
    // ========================================================================

    /// Distinct course categories, sorted, for the category dropdown.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.courses.iter().map(|c| c.category.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct course topics, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .courses
            .iter()
            .flat_map(|c| c.topics.iter().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }

    /// Distinct forum tags, sorted.
    pub fn thread_tags(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .threads
            .iter()
            .flat_map(|t| t.tags.iter().map(String::as_str))
            .collect();
        set.into_iter().collect()
    }
}
