//! Column descriptors and cell rendering.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::warn;

use crate::error::CellError;
use crate::row::TableRow;
use crate::value::Value;

/// Number of columns that stay visible in the compact layout.
pub const DEFAULT_PRIMARY_COUNT: usize = 4;

/// How wide a column is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Fixed width in characters.
    Fixed(u16),
    /// Flexible width with weight.
    Flex(u16),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex(1)
    }
}

/// Render function turning a field value into cell text.
pub type RenderFn<R> = Arc<dyn Fn(Option<&Value>, &R) -> Result<String, CellError> + Send + Sync>;

/// Content of one rendered cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// The render function failed; holds the failure message.
    Error(String),
}

impl Cell {
    /// Returns the text shown for this cell.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Error(message) => format!("⚠ {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Cell::Error(_))
    }
}

/// A table column definition.
///
/// The order of columns matters twice: it is the left-to-right order of the
/// table, and the first [`DEFAULT_PRIMARY_COUNT`] columns are the ones kept
/// visible in the compact layout.
pub struct Column<R> {
    /// Field name looked up on each row.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Whether clicking the header cycles the sort order.
    pub sortable: bool,
    /// Drawn width.
    pub width: ColumnWidth,
    render: Option<RenderFn<R>>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            width: self.width,
            render: self.render.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl<R: TableRow> Column<R> {
    /// Create a new column with the given field key and header label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            width: ColumnWidth::default(),
            render: None,
        }
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set a fixed width for this column.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set a flex width for this column.
    pub fn flex(mut self, weight: u16) -> Self {
        self.width = ColumnWidth::Flex(weight);
        self
    }

    /// Set a custom render function for this column.
    ///
    /// Report bad input by returning an error. A panic is caught and shown as
    /// an error cell too, but only after the process panic hook has run, and
    /// hosts that install one (for example to restore a raw-mode terminal)
    /// see every such panic.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<&Value>, &R) -> Result<String, CellError> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Render this column's cell for a row.
    ///
    /// A render function that returns an error or panics yields
    /// [`Cell::Error`] instead of taking the whole list down.
    pub fn render_cell(&self, row: &R) -> Cell {
        let value = row.field(&self.key);

        let Some(render) = &self.render else {
            return Cell::Text(value.map(|v| v.to_string()).unwrap_or_default());
        };

        match panic::catch_unwind(AssertUnwindSafe(|| render(value.as_ref(), row))) {
            Ok(Ok(text)) => Cell::Text(text),
            Ok(Err(e)) => {
                warn!("Column `{}` failed to render row {}: {}", self.key, row.key(), e);
                Cell::Error(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Column `{}` panicked on row {}: {}", self.key, row.key(), message);
                Cell::Error(format!("render panicked: {}", message))
            }
        }
    }
}

/// Split columns by position into the always-visible primary group and the
/// collapsible secondary group.
pub fn partition<R>(columns: &[Column<R>], primary_count: usize) -> (&[Column<R>], &[Column<R>]) {
    columns.split_at(primary_count.min(columns.len()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
