//! Resolution of page requests into concrete offset/limit windows.

use serde::Serialize;
use thiserror::Error;

use crate::PageRequest;

/// Errors raised when constructing a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Splits `total_items` into pages of `per_page` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: u64,
    per_page: u64,
}

impl Paginator {
    /// Build a paginator for a known item total.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub const fn new(total_items: u64, per_page: u64) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            total_items,
            per_page,
        })
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of pages; an empty collection still has one empty page.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.per_page)
        }
    }

    /// Resolve a request into a window, clamping to the last page.
    #[must_use]
    pub fn window(&self, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages();
        let number = request.number().clamp(1, num_pages);
        let offset = (number - 1).saturating_mul(self.per_page);
        let remaining = self.total_items.saturating_sub(offset);
        PageWindow {
            number,
            num_pages,
            offset,
            limit: remaining.min(self.per_page),
        }
    }
}

/// The resolved slice of a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    number: u64,
    num_pages: u64,
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// Current 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total page count.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// The previous page number, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        if self.has_previous() {
            Some(self.number - 1)
        } else {
            None
        }
    }

    /// The next page number, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.has_next() {
            Some(self.number + 1)
        } else {
            None
        }
    }
}
