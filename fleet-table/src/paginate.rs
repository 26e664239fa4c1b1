//! Page arithmetic over a filtered row count.

use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::ViewerError;

/// Rows per page. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(NonZeroUsize::new(10).unwrap());

    /// Validates a page size.
    pub fn new(size: usize) -> Result<Self, ViewerError> {
        NonZeroUsize::new(size)
            .map(PageSize)
            .ok_or(ViewerError::InvalidPageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of pages for `len` rows. An empty set still has one page.
pub fn total_pages(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The page shown for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Effective page, 1-based, already clamped.
    pub number: usize,
    pub total_pages: usize,
    /// Slice bounds into the filtered rows.
    pub start: usize,
    pub end: usize,
    /// Number of filtered rows.
    pub total_rows: usize,
}

impl Page {
    /// Slice range into the filtered rows.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn summary(&self) -> PaginationSummary {
        PaginationSummary {
            first: if self.total_rows == 0 { 0 } else { self.start + 1 },
            last: self.end,
            total: self.total_rows,
        }
    }
}

/// Compute the page to show.
///
/// `current_page` may be out of range (for example after a search shrank the
/// result set); the returned page is clamped, the caller's stored value is
/// left alone.
pub fn paginate(len: usize, page_size: PageSize, current_page: usize) -> Page {
    let total_pages = total_pages(len, page_size);
    let number = clamp_page(current_page, total_pages);
    let start = ((number - 1) * page_size.get()).min(len);
    let end = (number * page_size.get()).min(len);

    Page {
        number,
        total_pages,
        start,
        end,
        total_rows: len,
    }
}

/// "Showing X–Y of Z results".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for PaginationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "Showing 0 of 0 results")
        } else {
            write!(f, "Showing {}–{} of {} results", self.first, self.last, self.total)
        }
    }
}
