//! Key type for cached page fragments.
use thiserror::Error;

/// Identifies one cached rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCacheKey(String);

impl PageCacheKey {
    /// Validate and wrap a raw key.
    pub fn new(value: impl Into<String>) -> Result<Self, PageCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(PageCacheKeyValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(PageCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for the global feed rendered for `query` (the raw query string).
    ///
    /// Distinct query strings cache independently, so `?page=2` and
    /// `?page=3` never share an entry.
    pub fn global_feed(query: &str) -> Self {
        let cleaned: String = query.chars().filter(|c| !c.is_whitespace()).collect();
        Self(format!("index:{cleaned}"))
    }

    /// Borrow the key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PageCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned when constructing [`PageCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageCacheKeyValidationError {
    /// Key is blank.
    #[error("page cache key must not be empty")]
    Empty,
    /// Key contains whitespace.
    #[error("page cache key must not contain whitespace")]
    ContainsWhitespace,
}
