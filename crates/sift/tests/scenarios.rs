//! End-to-end query scenarios over a small course catalog.

use sift::{
    evaluate, Dir, Document, FieldSpec, Query, QueryEngine, Range, Schema, SiftError, Sort,
    SortKey, Timestamp,
};

fn course_schema() -> Schema {
    Schema::builder()
        .field(FieldSpec::text("id").key())
        .field(FieldSpec::text("title").searchable())
        .field(FieldSpec::text("description").searchable())
        .field(FieldSpec::enumeration("category"))
        .field(FieldSpec::enumeration("difficulty"))
        .field(FieldSpec::number("duration"))
        .field(FieldSpec::number("enrolledCount"))
        .field(FieldSpec::number("rating"))
        .field(FieldSpec::tags("topics").searchable())
        .field(FieldSpec::boolean("isNew"))
        .field(FieldSpec::date("published"))
        .build()
        .unwrap()
}

fn course(
    id: &str,
    title: &str,
    description: &str,
    difficulty: &str,
    duration: i64,
    enrolled: i64,
) -> Document {
    Document::new()
        .with("id", id)
        .with("title", title)
        .with("description", description)
        .with("category", "programming")
        .with("difficulty", difficulty)
        .with("duration", duration)
        .with("enrolledCount", enrolled)
        .with("rating", 4.5)
        .with("topics", Vec::<String>::new())
        .with("isNew", false)
}

fn three_courses() -> Vec<Document> {
    vec![
        course("c1", "Intro to Python", "First steps", "Beginner", 8, 15420),
        course(
            "c2",
            "JavaScript Security",
            "Auditing npm and python libraries",
            "Intermediate",
            35,
            8930,
        ),
        course("c3", "Systems in Rust", "Ownership in depth", "Advanced", 84, 18500),
    ]
}

fn ids(results: &sift::ResultSet<'_, Document>) -> Vec<String> {
    results
        .iter()
        .filter_map(|doc| doc.get("id"))
        .map(|value| match value {
            sift::FieldValue::Text(id) => id.clone(),
            other => format!("{other:?}"),
        })
        .collect()
}

// ============================================================================
// Literal scenarios
// ============================================================================

#[test]
fn difficulty_any_of_keeps_input_order() {
    let courses = three_courses();
    let query = Query::new().filter_any("difficulty", ["Beginner", "Advanced"]);

    let results = evaluate(&courses, &query, &course_schema()).unwrap();
    assert_eq!(ids(&results), vec!["c1", "c3"]);
}

#[test]
fn duration_range_selects_middle() {
    let courses = three_courses();
    let query = Query::new().filter_range("duration", Range::between(15, 50));

    let results = evaluate(&courses, &query, &course_schema()).unwrap();
    assert_eq!(ids(&results), vec!["c2"]);
}

#[test]
fn search_matches_description_substring() {
    let courses = three_courses();
    let query = Query::new().search("python");

    let results = evaluate(&courses, &query, &course_schema()).unwrap();
    // c1 by title, c2 by description
    assert_eq!(ids(&results), vec!["c1", "c2"]);
}

#[test]
fn sort_enrolled_descending() {
    let courses = three_courses();
    let query = Query::new().sort_desc("enrolledCount");

    let results = evaluate(&courses, &query, &course_schema()).unwrap();
    assert_eq!(ids(&results), vec!["c3", "c1", "c2"]);
}

#[test]
fn unknown_filter_field_is_invalid_query() {
    let courses = three_courses();
    let query = Query::new().filter_eq("foo", "bar");

    let err = evaluate(&courses, &query, &course_schema()).unwrap_err();
    assert!(matches!(err, SiftError::InvalidQuery { field, .. } if field == "foo"));
}

// ============================================================================
// Semantics
// ============================================================================

#[test]
fn range_boundaries_inclusive() {
    let schema = course_schema();
    let courses: Vec<Document> = [4.99, 5.0, 10.0, 15.0, 15.01]
        .iter()
        .enumerate()
        .map(|(i, duration)| {
            Document::new()
                .with("id", format!("d{i}"))
                .with("duration", *duration)
        })
        .collect();

    let query = Query::new().filter_range("duration", Range::between(5, 15));
    let results = evaluate(&courses, &query, &schema).unwrap();
    assert_eq!(ids(&results), vec!["d1", "d2", "d3"]);
}

#[test]
fn search_trims_and_folds_case() {
    let courses = three_courses();
    let results = evaluate(&courses, &Query::new().search("  RUST "), &course_schema()).unwrap();
    assert_eq!(ids(&results), vec!["c3"]);
}

#[test]
fn blank_search_is_pass_through() {
    let courses = three_courses();
    let results = evaluate(&courses, &Query::new().search("   "), &course_schema()).unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn search_matches_tags() {
    let schema = course_schema();
    let courses = vec![
        Document::new()
            .with("id", "t1")
            .with("title", "Course A")
            .with("topics", vec!["Cryptography", "web"]),
        Document::new()
            .with("id", "t2")
            .with("title", "Course B")
            .with("topics", vec!["design"]),
    ];

    let results = evaluate(&courses, &Query::new().search("crypto"), &schema).unwrap();
    assert_eq!(ids(&results), vec!["t1"]);
}

#[test]
fn non_searchable_fields_are_ignored_by_search() {
    let courses = three_courses();
    // "Beginner" lives only in the difficulty field, which is not searchable
    let results = evaluate(&courses, &Query::new().search("beginner"), &course_schema()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn all_sentinel_disables_equality() {
    let courses = three_courses();
    let schema = course_schema();
    let query = Query::new()
        .all_sentinel("all")
        .filter_eq("difficulty", "all")
        .filter_range("duration", Range::at_least(10));

    let results = evaluate(&courses, &query, &schema).unwrap();
    assert_eq!(ids(&results), vec!["c2", "c3"]);

    // without the sentinel, "all" is just a value nothing has
    let literal = Query::new().filter_eq("difficulty", "all");
    assert!(evaluate(&courses, &literal, &schema).unwrap().is_empty());
}

#[test]
fn sentinel_filter_still_validated() {
    let courses = three_courses();
    let query = Query::new().all_sentinel("all").filter_eq("nope", "all");

    let err = evaluate(&courses, &query, &course_schema()).unwrap_err();
    assert!(matches!(err, SiftError::InvalidQuery { .. }));
}

#[test]
fn range_on_text_is_type_mismatch() {
    let courses = three_courses();
    let query = Query::new().filter_range("title", Range::at_least(1));

    let err = evaluate(&courses, &query, &course_schema()).unwrap_err();
    assert!(matches!(err, SiftError::TypeMismatch { kind: "range filter", .. }));
}

#[test]
fn multi_value_on_number_is_type_mismatch() {
    let courses = three_courses();
    let query = Query::new().filter_any("duration", [8, 35]);

    let err = evaluate(&courses, &query, &course_schema()).unwrap_err();
    assert!(matches!(
        err,
        SiftError::TypeMismatch { kind: "multi-value filter", .. }
    ));
}

#[test]
fn secondary_key_breaks_ties() {
    let schema = course_schema();
    let courses = vec![
        course("a", "Zeta", "", "Beginner", 10, 100),
        course("b", "Alpha", "", "Beginner", 10, 200),
        course("c", "Mid", "", "Beginner", 20, 50),
    ];

    let query = Query::new().sort(Sort::asc("duration").then(SortKey::desc("enrolledCount")));
    let results = evaluate(&courses, &query, &schema).unwrap();
    assert_eq!(ids(&results), vec!["b", "a", "c"]);

    let by_title = Query::new()
        .sort_asc("duration")
        .then_by("title", Dir::Asc);
    let results = evaluate(&courses, &by_title, &schema).unwrap();
    assert_eq!(ids(&results), vec!["b", "a", "c"]);
}

#[test]
fn full_ties_fall_back_to_key() {
    let schema = course_schema();
    let courses = vec![
        course("m", "Same", "", "Beginner", 10, 100),
        course("b", "Same", "", "Beginner", 10, 100),
        course("x", "Same", "", "Beginner", 10, 100),
    ];

    let query = Query::new().sort_desc("enrolledCount");
    let results = evaluate(&courses, &query, &schema).unwrap();
    assert_eq!(ids(&results), vec!["b", "m", "x"]);
}

#[test]
fn missing_sort_values_go_last() {
    let schema = course_schema();
    let courses = vec![
        Document::new().with("id", "none"),
        Document::new().with("id", "low").with("rating", 3.9),
        Document::new().with("id", "high").with("rating", 4.8),
    ];

    let desc = evaluate(&courses, &Query::new().sort_desc("rating"), &schema).unwrap();
    assert_eq!(ids(&desc), vec!["high", "low", "none"]);
    let asc = evaluate(&courses, &Query::new().sort_asc("rating"), &schema).unwrap();
    assert_eq!(ids(&asc), vec!["low", "high", "none"]);
}

#[test]
fn newest_sorts_by_date() {
    let schema = course_schema();
    let courses = vec![
        Document::new().with("id", "old").with("published", 1_600_000_000_000i64),
        Document::new().with("id", "new").with("published", 1_700_000_000_000i64),
    ];

    let results = evaluate(&courses, &Query::new().sort_desc("published"), &schema).unwrap();
    assert_eq!(ids(&results), vec!["new", "old"]);

    let since = Query::new().filter_range(
        "published",
        Range::at_least(Timestamp::from_secs(1_650_000_000)),
    );
    let results = evaluate(&courses, &since, &schema).unwrap();
    assert_eq!(ids(&results), vec!["new"]);
}

#[test]
fn pattern_filter_on_title() {
    let courses = three_courses();
    let query = Query::new().filter_matches("title", r"^(Intro|Systems)").unwrap();

    let results = evaluate(&courses, &query, &course_schema()).unwrap();
    assert_eq!(ids(&results), vec!["c1", "c3"]);
}

#[test]
fn json_query_end_to_end() {
    let courses = three_courses();
    let query = Query::from_json_str(
        r#"{
            "filters": {
                "difficulty": ["Beginner", "Intermediate"],
                "duration": {"max": 40}
            },
            "sort": {"field": "enrolledCount", "dir": "ascending"}
        }"#,
    )
    .unwrap();

    let engine_schema = course_schema();
    let engine = QueryEngine::new(&engine_schema);
    let results = engine.evaluate(&courses, &query).unwrap();
    assert_eq!(ids(&results), vec!["c2", "c1"]);
}

#[test]
fn validate_without_records() {
    let schema = course_schema();
    let engine = QueryEngine::new(&schema);

    assert!(engine.validate(&Query::new().sort_desc("rating")).is_ok());
    assert!(matches!(
        engine.validate(&Query::new().sort_desc("topics")),
        Err(SiftError::TypeMismatch { .. })
    ));
}
