//! E-learning catalog views built on [`sift`].
//!
//! Typed records for the platform's collections (courses, forum threads and
//! learning paths), their schemas, the sort presets the pages offer, and the
//! filter panels that turn UI state into a [`sift::Query`].
//!
//! ```rust
//! use sift_catalog::{Catalog, CatalogFilters, CourseSort, DurationBucket};
//!
//! let catalog = Catalog::load()?;
//! let filters = CatalogFilters::new()
//!     .category("web")
//!     .duration(DurationBucket::Short)
//!     .sort(CourseSort::Alphabetical);
//!
//! let results = catalog.search_courses(&filters)?;
//! let titles: Vec<_> = results.iter().map(|c| c.title.as_str()).collect();
//! assert_eq!(titles, ["Modern CSS Layouts", "Web Accessibility Essentials"]);
//! # Ok::<(), sift_catalog::CatalogError>(())
//! ```
//!
//! The category value [`ALL`] means "any category" in every filter panel.

mod catalog;
pub mod course;
pub mod data;
mod error;
pub mod forum;
pub mod path;

/// Filter value that disables an equality filter.
pub const ALL: &str = "all";

pub use catalog::Catalog;
pub use course::{CatalogFilters, Course, CourseSort, DurationBucket};
pub use error::{CatalogError, Result};
pub use forum::{ForumFilters, ForumThread, ThreadSort};
pub use path::LearningPath;
