//! Render model produced by [`TableViewer::view`](crate::TableViewer::view).
//!
//! The model is plain data: front ends draw it however they like. The
//! [`text`](crate::text) module turns it into fixed-width lines.

use crate::column::{Cell, ColumnWidth};
use crate::paginate::PaginationSummary;
use crate::sort::SortDirection;

/// Column projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every column in the table, actions in a trailing slot.
    #[default]
    Wide,
    /// Primary columns only; secondary columns and actions behind a per-row
    /// expand toggle.
    Compact,
}

impl Layout {
    /// Compact below `breakpoint` columns of width, wide otherwise.
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            Layout::Compact
        } else {
            Layout::Wide
        }
    }
}

/// A row-scoped control supplied by the caller, such as view or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    /// Identifier the caller matches on when the action is triggered.
    pub id: String,
    pub label: String,
}

impl RowAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    /// Set when the table is sorted by this column.
    pub sort: Option<SortDirection>,
    pub width: ColumnWidth,
}

/// A secondary column shown under an expanded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryField {
    pub label: String,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow<K> {
    pub key: K,
    /// Cells in header order.
    pub cells: Vec<Cell>,
    /// Secondary fields, only filled for expanded rows in the compact layout.
    pub secondary: Vec<SecondaryField>,
    /// Whether the row has anything to reveal in the compact layout.
    pub expandable: bool,
    pub expanded: bool,
    /// Action cluster. Always present in the wide layout, only for expanded
    /// rows in the compact layout.
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Everything needed to draw one frame of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel<K> {
    pub layout: Layout,
    /// Present when the table is searchable.
    pub search: Option<SearchBox>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow<K>>,
    pub summary: PaginationSummary,
    /// Present only when there is more than one page.
    pub pagination: Option<PaginationControls>,
    /// Number of active column filters.
    pub active_filters: usize,
}

impl<K> ViewModel<K> {
    /// Keys of the rows on the current page, top to bottom.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|row| &row.key)
    }
}
