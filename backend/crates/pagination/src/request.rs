//! Parsing of the requested page number.

use serde::{Deserialize, Serialize};

/// A requested 1-based page number.
///
/// The value is only a request: [`crate::Paginator::window`] clamps it
/// to the pages that actually exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest(u64);

impl PageRequest {
    /// Request the first page.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Request a specific page; `0` is treated as the first page.
    #[must_use]
    pub const fn new(number: u64) -> Self {
        if number == 0 { Self(1) } else { Self(number) }
    }

    /// Parse the raw `page` query value.
    ///
    /// Missing, blank, non-numeric, zero and negative values all select
    /// the first page.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// assert_eq!(PageRequest::from_query(None).number(), 1);
    /// assert_eq!(PageRequest::from_query(Some("abc")).number(), 1);
    /// assert_eq!(PageRequest::from_query(Some(" 4 ")).number(), 4);
    /// ```
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .map_or_else(Self::first, Self::new)
    }

    /// The requested page number (always at least 1).
    #[must_use]
    pub const fn number(self) -> u64 {
        self.0
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}
