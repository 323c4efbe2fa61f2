//! A page of items together with its pagination window.

use serde::Serialize;

use crate::PageWindow;

/// Items loaded for a single [`PageWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    window: PageWindow,
    total_items: u64,
}

impl<T> Page<T> {
    /// Pair loaded items with the window they were loaded for.
    #[must_use]
    pub const fn new(items: Vec<T>, window: PageWindow, total_items: u64) -> Self {
        Self {
            items,
            window,
            total_items,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The window describing this page.
    #[must_use]
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Convert every item while keeping the window.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
            total_items: self.total_items,
        }
    }
}
