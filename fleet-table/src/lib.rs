//! Searchable, sortable, paginated table views over in-memory rows.
//!
//! [`TableViewer`] owns the interactive state (search term, filters, sort,
//! page, expanded rows) and projects caller-supplied rows through
//! search -> filters -> sort -> pagination into a [`ViewModel`]. It does no
//! I/O and never mutates rows; callers own the data and feed replacements in
//! with [`TableViewer::set_rows`].

pub mod column;
pub mod error;
pub mod expand;
pub mod filter;
pub mod paginate;
pub mod row;
pub mod search;
pub mod sort;
pub mod text;
pub mod value;
pub mod view;
pub mod viewer;

pub use column::{Cell, Column, ColumnWidth, DEFAULT_PRIMARY_COUNT, partition};
pub use error::{CellError, ViewerError};
pub use expand::ExpandedRows;
pub use filter::{Filter, FilterSet};
pub use paginate::{Page, PageSize, PaginationSummary, clamp_page, paginate, total_pages};
pub use row::{Record, RecordId, TableRow};
pub use sort::{SortDirection, SortState};
pub use text::{TextOptions, render_lines};
pub use value::Value;
pub use view::{
    HeaderCell, Layout, PaginationControls, RenderedRow, RowAction, SearchBox, SecondaryField,
    ViewModel,
};
pub use viewer::{TableViewer, ViewerOptions};
