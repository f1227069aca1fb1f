//! Property tests for the catalog filter panel.

use proptest::prelude::*;
use sift_catalog::{Catalog, CatalogFilters, CourseSort, DurationBucket};

fn sort_strategy() -> impl Strategy<Value = CourseSort> {
    prop::sample::select(CourseSort::ALL.to_vec())
}

fn bucket_strategy() -> impl Strategy<Value = DurationBucket> {
    prop_oneof![
        Just(DurationBucket::Any),
        Just(DurationBucket::Short),
        Just(DurationBucket::Medium),
        Just(DurationBucket::Long),
    ]
}

fn filters_strategy() -> impl Strategy<Value = CatalogFilters> {
    (
        sort_strategy(),
        bucket_strategy(),
        prop::option::of(0.0f64..100.0),
        any::<bool>(),
        prop::sample::select(vec!["all", "web", "security", "programming", "data-science"]),
    )
        .prop_map(|(sort, bucket, max_price, free_only, category)| {
            let mut filters = CatalogFilters::new()
                .sort(sort)
                .duration(bucket)
                .category(category);
            filters.max_price = max_price;
            filters.free_only = free_only;
            filters
        })
}

proptest! {
    #[test]
    fn pages_concatenate_to_full_result(filters in filters_strategy(), size in 1usize..5) {
        let catalog = Catalog::load().unwrap();
        let full: Vec<_> = catalog
            .search_courses(&filters)
            .unwrap()
            .iter()
            .map(|c| c.id.clone())
            .collect();

        let mut paged = Vec::new();
        for page in 0..=(full.len() / size) {
            let results = catalog
                .search_courses(&filters.clone().page(page, size))
                .unwrap();
            prop_assert_eq!(results.total(), full.len());
            paged.extend(results.iter().map(|c| c.id.clone()));
        }
        prop_assert_eq!(paged, full);
    }

    #[test]
    fn results_respect_panel(filters in filters_strategy()) {
        let catalog = Catalog::load().unwrap();
        let results = catalog.search_courses(&filters).unwrap();

        for course in results.iter() {
            if filters.category != "all" {
                prop_assert_eq!(&course.category, &filters.category);
            }
            if filters.free_only {
                prop_assert!(course.is_free());
            } else if let Some(max) = filters.max_price {
                prop_assert!(course.price <= max);
            }
            if let Some(range) = filters.duration.range() {
                let value = sift::Value::Number(course.duration_hours.into());
                prop_assert!(range.contains(&value));
            }
        }
    }

    #[test]
    fn narrowing_never_grows(filters in filters_strategy()) {
        let catalog = Catalog::load().unwrap();
        let base = catalog.search_courses(&filters).unwrap().len();
        let narrowed = catalog
            .search_courses(&filters.clone().difficulty("Beginner"))
            .unwrap()
            .len();
        prop_assert!(narrowed <= base);
    }
}
