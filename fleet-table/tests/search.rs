use chrono::{TimeZone, Utc};
use fleet_table::search::{filter_rows, matches};
use fleet_table::{Record, Value};

fn ranger() -> Record {
    Record::new(7).set("name", "Ford Ranger").set("status", "good")
}

#[test]
fn test_case_insensitive_substring() {
    assert!(matches(&ranger(), "RANG"));
    assert!(matches(&ranger(), "good"));
    assert!(!matches(&ranger(), "hilux"));
}

#[test]
fn test_empty_query_matches_every_row() {
    assert!(matches(&ranger(), ""));
    assert!(matches(&Record::new(1), ""));
}

#[test]
fn test_numbers_and_bools_are_stringified() {
    let row = Record::new("v1").set("mileage", 84_000i64).set("active", true);
    assert!(matches(&row, "840"));
    assert!(matches(&row, "TRUE"));
}

#[test]
fn test_dates_match_default_form_only() {
    let when = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let row = Record::new("r1").set("starts_at", when);
    assert!(matches(&row, "2024-05-01t08"));
    assert!(!matches(&row, "May 1"));
}

#[test]
fn test_null_values_never_match_non_empty_query() {
    let row = Record::new("n1").set("notes", Value::Null);
    assert!(!matches(&row, "null"));
    assert!(matches(&row, "n1"));
}

#[test]
fn test_nested_values_are_searchable() {
    let json = serde_json::json!({
        "id": 3,
        "driver": { "name": "Alice", "licence": "B" },
        "tags": ["4x4", "diesel"],
    });
    let row = Record::from_json(json, 0);
    assert!(matches(&row, "alice"));
    assert!(matches(&row, "diesel"));
}

#[test]
fn test_filter_rows_keeps_original_order() {
    let rows = vec![
        Record::new(1).set("name", "Ford Ranger"),
        Record::new(2).set("name", "Toyota Hilux"),
        Record::new(3).set("name", "Ford Transit"),
    ];
    assert_eq!(filter_rows(&rows, "ford"), vec![0, 2]);
    assert_eq!(filter_rows(&rows, ""), vec![0, 1, 2]);
}
