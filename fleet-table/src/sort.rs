//! Click-to-sort state and stable row ordering.

use crate::row::TableRow;
use crate::value::Value;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Header indicator for this direction.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Which column the table is sorted by, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<(String, SortDirection)>,
}

impl SortState {
    /// Unsorted: rows keep their original order.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: Some((column.into(), SortDirection::Ascending)),
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: Some((column.into(), SortDirection::Descending)),
        }
    }

    /// Advance the tri-state toggle for `column`.
    ///
    /// The same column goes unsorted -> ascending -> descending -> unsorted.
    /// A different column starts at ascending.
    pub fn cycle(&mut self, column: &str) {
        self.column = match self.column.take() {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((current, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column.to_string(), SortDirection::Ascending)),
        };
    }

    /// The sorted column and its direction.
    pub fn column(&self) -> Option<(&str, SortDirection)> {
        self.column.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    /// Direction applied to `column`, if it is the sorted one.
    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        match &self.column {
            Some((c, d)) if c == column => Some(*d),
            _ => None,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.column.is_some()
    }
}

/// Reorder `indices` (positions into `rows`) according to `sort`.
///
/// The sort is stable: rows with equal values keep their relative order in
/// both directions.
pub fn sort_indices<R: TableRow>(rows: &[R], indices: &mut Vec<usize>, sort: &SortState) {
    let Some((column, direction)) = sort.column() else {
        return;
    };

    let mut keyed: Vec<(usize, Value)> = indices
        .iter()
        .map(|&i| (i, rows[i].field(column).unwrap_or(Value::Null)))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    *indices = keyed.into_iter().map(|(i, _)| i).collect();
}
