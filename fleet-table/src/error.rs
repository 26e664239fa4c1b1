//! Error types

use thiserror::Error;

/// Errors returned by [`TableViewer`](crate::TableViewer) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("search is disabled for this table")]
    SearchDisabled,
    #[error("filtering is disabled for this table")]
    FilteringDisabled,
    #[error("column `{0}` is not sortable")]
    NotSortable(String),
}

/// Error returned by a column render function.
///
/// A failing cell is shown as an error placeholder; the rest of the list
/// still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("`{field}` has unexpected {found} value")]
    UnexpectedValue { field: String, found: &'static str },
    #[error("`{0}` is missing")]
    Missing(String),
    #[error("{0}")]
    Message(String),
}

impl CellError {
    /// Creates a free-form cell error.
    pub fn message(message: impl Into<String>) -> Self {
        CellError::Message(message.into())
    }
}
