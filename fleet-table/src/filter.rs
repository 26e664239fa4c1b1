//! Column filters applied on top of search.

use std::cmp::Ordering;

use crate::row::TableRow;
use crate::value::Value;

/// A filter condition on row fields.
///
/// Filters can be combined using logical operators (`And`, `Or`).
/// Missing fields are treated as [`Value::Null`].
///
/// # Example
///
/// ```
/// use fleet_table::{Filter, Record};
///
/// let filter = Filter::eq("status", "good")
///     .and_also(Filter::contains("name", "ford"));
///
/// let row = Record::new(1).set("name", "Ford Ranger").set("status", "good");
/// assert!(filter.evaluate(&row));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Equality: `field == value`
    Eq(String, Value),
    /// Not equal: `field != value`
    Ne(String, Value),
    /// Case-insensitive substring of the field's string form.
    Contains(String, String),
    /// Case-insensitive prefix of the field's string form.
    StartsWith(String, String),
    /// Field is missing, null or renders as an empty string.
    IsEmpty(String),
    /// Negation of `IsEmpty`.
    IsNotEmpty(String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates a starts-with filter.
    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::StartsWith(field.into(), value.into())
    }

    /// Creates an is-empty filter.
    pub fn is_empty(field: impl Into<String>) -> Self {
        Filter::IsEmpty(field.into())
    }

    /// Creates an is-not-empty filter.
    pub fn is_not_empty(field: impl Into<String>) -> Self {
        Filter::IsNotEmpty(field.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Evaluates the filter against a row.
    pub fn evaluate<R: TableRow>(&self, row: &R) -> bool {
        match self {
            Filter::Eq(field, value) => field_value(row, field).compare(value) == Ordering::Equal,
            Filter::Ne(field, value) => field_value(row, field).compare(value) != Ordering::Equal,
            Filter::Contains(field, needle) => field_text(row, field).contains(&needle.to_lowercase()),
            Filter::StartsWith(field, prefix) => {
                field_text(row, field).starts_with(&prefix.to_lowercase())
            }
            Filter::IsEmpty(field) => field_text(row, field).is_empty(),
            Filter::IsNotEmpty(field) => !field_text(row, field).is_empty(),
            Filter::And(filters) => filters.iter().all(|f| f.evaluate(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.evaluate(row)),
        }
    }
}

fn field_value<R: TableRow>(row: &R, field: &str) -> Value {
    row.field(field).unwrap_or(Value::Null)
}

fn field_text<R: TableRow>(row: &R, field: &str) -> String {
    field_value(row, field).to_string().to_lowercase()
}

/// The active filters of a table. A row passes when every filter passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter (builder style).
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Removes the filter at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Filter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns `true` if the row passes every filter. An empty set passes
    /// every row.
    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        self.filters.iter().all(|f| f.evaluate(row))
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
