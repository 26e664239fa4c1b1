//! The tabular list viewer: search, filters, sort, pagination and
//! responsive column projection over caller-supplied rows.

use std::fmt;

use log::{debug, trace};

use crate::column::{Column, DEFAULT_PRIMARY_COUNT, partition};
use crate::error::ViewerError;
use crate::expand::ExpandedRows;
use crate::filter::FilterSet;
use crate::paginate::{Page, PageSize, clamp_page, paginate, total_pages};
use crate::row::TableRow;
use crate::search;
use crate::sort::{SortState, sort_indices};
use crate::view::{
    HeaderCell, Layout, PaginationControls, RenderedRow, RowAction, SearchBox, SecondaryField,
    ViewModel,
};

/// Callback fired when a row is activated.
pub type RowClickFn<R> = Box<dyn FnMut(&R) + Send>;

/// Callback producing the action cluster for a row.
pub type ActionsFn<R> = Box<dyn Fn(&R) -> Vec<RowAction> + Send>;

/// Static configuration of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Show the search box and accept search terms.
    pub searchable: bool,
    /// Accept column filters.
    pub filterable: bool,
    pub page_size: PageSize,
    /// How many leading columns stay visible in the compact layout.
    pub primary_count: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            searchable: true,
            filterable: false,
            page_size: PageSize::DEFAULT,
            primary_count: DEFAULT_PRIMARY_COUNT,
        }
    }
}

/// State and orchestration for one table instance.
///
/// The viewer never mutates rows. Replacing the dataset with
/// [`set_rows`](Self::set_rows) keeps the search term, filters, sort and
/// expanded rows. The stored page is only reset by search, filter, sort and
/// page size changes; a dataset that shrinks below the stored page is handled
/// by clamping at [`view`](Self::view) time without writing the clamp back.
///
/// # Example
///
/// ```
/// use fleet_table::{Column, Layout, Record, TableViewer};
///
/// let rows: Vec<Record> = (1..=25)
///     .map(|i| Record::new(i).set("name", format!("Truck {}", i)))
///     .collect();
/// let columns = vec![Column::new("id", "ID"), Column::new("name", "Name").sortable()];
///
/// let mut viewer = TableViewer::new(rows, columns);
/// viewer.last_page();
///
/// let view = viewer.view(Layout::Wide);
/// assert_eq!(view.rows.len(), 5);
/// assert_eq!(view.summary.to_string(), "Showing 21–25 of 25 results");
/// ```
pub struct TableViewer<R: TableRow> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    options: ViewerOptions,
    search_term: String,
    current_page: usize,
    expanded: ExpandedRows<R::Key>,
    filters: FilterSet,
    sort: SortState,
    on_row_click: Option<RowClickFn<R>>,
    actions: Option<ActionsFn<R>>,
}

impl<R: TableRow> fmt::Debug for TableViewer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableViewer")
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("search_term", &self.search_term)
            .field("current_page", &self.current_page)
            .field("expanded", &self.expanded.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .finish()
    }
}

impl<R: TableRow> TableViewer<R> {
    /// Create a viewer with default options.
    pub fn new(rows: Vec<R>, columns: Vec<Column<R>>) -> Self {
        Self {
            rows,
            columns,
            options: ViewerOptions::default(),
            search_term: String::new(),
            current_page: 1,
            expanded: ExpandedRows::new(),
            filters: FilterSet::new(),
            sort: SortState::none(),
            on_row_click: None,
            actions: None,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ViewerOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the row activation callback.
    pub fn on_row_click(mut self, callback: impl FnMut(&R) + Send + 'static) -> Self {
        self.on_row_click = Some(Box::new(callback));
        self
    }

    /// Set the per-row action cluster renderer.
    pub fn with_actions(mut self, actions: impl Fn(&R) -> Vec<RowAction> + Send + 'static) -> Self {
        self.actions = Some(Box::new(actions));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The stored page. May exceed the page count; see [`page`](Self::page).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Look up a row by key.
    pub fn row(&self, key: &R::Key) -> Option<&R> {
        self.rows.iter().find(|row| &row.key() == key)
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the dataset.
    ///
    /// Search term, filters, sort, expanded rows and the stored page are kept.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        debug!("Table rows replaced: {} -> {}", self.rows.len(), rows.len());
        self.rows = rows;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Set the search term and go back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) -> Result<(), ViewerError> {
        if !self.options.searchable {
            return Err(ViewerError::SearchDisabled);
        }
        self.search_term = term.into();
        self.current_page = 1;
        debug!("Table search set to {:?}", self.search_term);
        Ok(())
    }

    /// Append a character to the search term.
    pub fn push_search_char(&mut self, c: char) -> Result<(), ViewerError> {
        let mut term = self.search_term.clone();
        term.push(c);
        self.set_search(term)
    }

    /// Remove the last character of the search term.
    pub fn pop_search_char(&mut self) -> Result<(), ViewerError> {
        let mut term = self.search_term.clone();
        term.pop();
        self.set_search(term)
    }

    pub fn clear_search(&mut self) -> Result<(), ViewerError> {
        self.set_search(String::new())
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Replace the active column filters and go back to page 1.
    pub fn set_filters(&mut self, filters: FilterSet) -> Result<(), ViewerError> {
        if !self.options.filterable {
            return Err(ViewerError::FilteringDisabled);
        }
        debug!("Table filters set: {} active", filters.len());
        self.filters = filters;
        self.current_page = 1;
        Ok(())
    }

    pub fn clear_filters(&mut self) -> Result<(), ViewerError> {
        self.set_filters(FilterSet::new())
    }

    // =========================================================================
    // Sort
    // =========================================================================

    /// Cycle the sort order of a sortable column and go back to page 1.
    pub fn toggle_sort(&mut self, column_key: &str) -> Result<(), ViewerError> {
        let sortable = self
            .columns
            .iter()
            .any(|column| column.key == column_key && column.sortable);
        if !sortable {
            return Err(ViewerError::NotSortable(column_key.to_string()));
        }
        self.sort.cycle(column_key);
        self.current_page = 1;
        debug!("Table sort is now {:?}", self.sort.column());
        Ok(())
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Change the page size and go back to page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), ViewerError> {
        self.options.page_size = PageSize::new(size)?;
        self.current_page = 1;
        Ok(())
    }

    /// The page that would be shown right now (clamped).
    pub fn page(&self) -> Page {
        paginate(
            self.visible_indices().len(),
            self.options.page_size,
            self.current_page,
        )
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.visible_indices().len(), self.options.page_size)
    }

    /// Go to the next page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let page = self.page();
        if !page.has_next() {
            return false;
        }
        self.current_page = page.number + 1;
        trace!("Table page -> {}", self.current_page);
        true
    }

    /// Go to the previous page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        let page = self.page();
        if !page.has_prev() {
            return false;
        }
        self.current_page = page.number - 1;
        trace!("Table page -> {}", self.current_page);
        true
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        let total = self.total_pages();
        self.go_to_page(total)
    }

    /// Go to a page, clamped into range. Returns `true` if the shown page
    /// changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let total = self.total_pages();
        let before = clamp_page(self.current_page, total);
        self.current_page = clamp_page(page, total);
        before != self.current_page
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Flip a row's expanded state. Returns the new state.
    pub fn toggle_expanded(&mut self, key: &R::Key) -> bool {
        let expanded = self.expanded.toggle(key);
        trace!("Row {} expanded: {}", key, expanded);
        expanded
    }

    pub fn is_expanded(&self, key: &R::Key) -> bool {
        self.expanded.is_expanded(key)
    }

    /// Fire the row activation callback. Returns `false` if the row is not in
    /// the dataset.
    pub fn activate(&mut self, key: &R::Key) -> bool {
        let Some(row) = self.rows.iter().find(|row| &row.key() == key) else {
            return false;
        };
        debug!("Row {} activated", key);
        if let Some(callback) = self.on_row_click.as_mut() {
            callback(row);
        }
        true
    }

    /// Actions for a row, empty when no action renderer is set.
    pub fn actions_for(&self, key: &R::Key) -> Vec<RowAction> {
        match (&self.actions, self.row(key)) {
            (Some(actions), Some(row)) => actions(row),
            _ => Vec::new(),
        }
    }

    /// Positions in [`rows`](Self::rows) that pass search and filters, in
    /// sorted order.
    pub fn visible_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| search::matches(*row, &self.search_term))
            .filter(|(_, row)| !self.options.filterable || self.filters.matches(*row))
            .map(|(index, _)| index)
            .collect();
        sort_indices(&self.rows, &mut indices, &self.sort);
        indices
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Project the current state into a render model.
    pub fn view(&self, layout: Layout) -> ViewModel<R::Key> {
        let indices = self.visible_indices();
        let page = paginate(indices.len(), self.options.page_size, self.current_page);

        let (shown, hidden) = match layout {
            Layout::Wide => (self.columns.as_slice(), &self.columns[..0]),
            Layout::Compact => partition(&self.columns, self.options.primary_count),
        };

        let headers = shown
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                sortable: column.sortable,
                sort: self.sort.direction_for(&column.key),
                width: column.width,
            })
            .collect();

        let expandable = layout == Layout::Compact && (!hidden.is_empty() || self.actions.is_some());

        let rows = indices[page.range()]
            .iter()
            .map(|&index| {
                let row = &self.rows[index];
                let key = row.key();
                let expanded = expandable && self.expanded.is_expanded(&key);
                let reveal = layout == Layout::Wide || expanded;

                let secondary = if expanded {
                    hidden
                        .iter()
                        .map(|column| SecondaryField {
                            label: column.label.clone(),
                            cell: column.render_cell(row),
                        })
                        .collect()
                } else {
                    Vec::new()
                };

                let actions = match &self.actions {
                    Some(actions) if reveal => actions(row),
                    _ => Vec::new(),
                };

                RenderedRow {
                    cells: shown.iter().map(|column| column.render_cell(row)).collect(),
                    secondary,
                    expandable,
                    expanded,
                    actions,
                    key,
                }
            })
            .collect();

        let pagination = (page.total_pages > 1).then(|| PaginationControls {
            page: page.number,
            total_pages: page.total_pages,
            prev_enabled: page.has_prev(),
            next_enabled: page.has_next(),
        });

        ViewModel {
            layout,
            search: self.options.searchable.then(|| SearchBox {
                term: self.search_term.clone(),
            }),
            headers,
            rows,
            summary: page.summary(),
            pagination,
            active_filters: if self.options.filterable {
                self.filters.len()
            } else {
                0
            },
        }
    }
}
