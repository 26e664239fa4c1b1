//! Free-text search over row values.

use crate::row::TableRow;

/// Returns `true` if any field value of `row` contains `query`,
/// case-insensitively.
///
/// Values are compared through their default string form
/// ([`Value`](crate::Value)'s `Display`). A date field therefore matches
/// `2024-05-01T08:30:00Z`, not a friendlier formatted date. `Null` values
/// render as the empty string and only match the empty query.
///
/// An empty query matches every row.
///
/// # Example
///
/// ```
/// use fleet_table::{search, Record};
///
/// let row = Record::new(7).set("name", "Ford Ranger").set("status", "good");
/// assert!(search::matches(&row, "RANG"));
/// assert!(!search::matches(&row, "hilux"));
/// ```
pub fn matches<R: TableRow>(row: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    row.values()
        .iter()
        .filter(|value| !value.is_null())
        .any(|value| value.to_string().to_lowercase().contains(&needle))
}

/// Indices of the rows matching `query`, in their original order.
pub fn filter_rows<R: TableRow>(rows: &[R], query: &str) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches(*row, query))
        .map(|(index, _)| index)
        .collect()
}
