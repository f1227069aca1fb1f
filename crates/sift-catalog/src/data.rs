//! Bundled mock data.
//!
//! The JSON files under `data/` are compiled into the crate, so loading never
//! touches the filesystem.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::course::Course;
use crate::error::{CatalogError, Result};
use crate::forum::ForumThread;
use crate::path::LearningPath;

const COURSES_JSON: &str = include_str!("../data/courses.json");
const THREADS_JSON: &str = include_str!("../data/threads.json");
const PATHS_JSON: &str = include_str!("../data/paths.json");

pub fn courses() -> Result<Vec<Course>> {
    parse("courses", COURSES_JSON)
}

pub fn threads() -> Result<Vec<ForumThread>> {
    parse("threads", THREADS_JSON)
}

pub fn paths() -> Result<Vec<LearningPath>> {
    parse("learning paths", PATHS_JSON)
}

/// Parses a JSON array of records, tagging failures with the collection name.
pub(crate) fn parse<T: DeserializeOwned>(collection: &'static str, source: &str) -> Result<Vec<T>> {
    let records: Vec<T> = serde_json::from_str(source)
        .map_err(|source| CatalogError::Data { collection, source })?;
    debug!(collection, count = records.len(), "records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bundled_data_parses() {
        assert_eq!(courses().unwrap().len(), 8);
        assert_eq!(threads().unwrap().len(), 6);
        assert_eq!(paths().unwrap().len(), 4);
    }

    #[test]
    fn ids_are_unique() {
        let courses = courses().unwrap();
        let ids: HashSet<_> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), courses.len());
    }

    #[test]
    fn every_path_course_exists() {
        let courses = courses().unwrap();
        for path in paths().unwrap() {
            assert_eq!(path.resolve(&courses).len(), path.course_ids.len(), "{}", path.id);
        }
    }

    #[test]
    fn malformed_data_names_collection() {
        let err = parse::<Course>("courses", "[{\"id\": 1}]").unwrap_err();
        assert!(matches!(err, CatalogError::Data { collection: "courses", .. }));
        assert!(err.to_string().starts_with("failed to load courses"));
    }
}
