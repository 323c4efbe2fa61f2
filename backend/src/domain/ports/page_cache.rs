//! Port for caching rendered page fragments.
use async_trait::async_trait;

use super::{PageCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by page cache adapters.
    pub enum PageCacheError {
        /// Cache backend is unavailable.
        Backend { message: String } => "page cache backend failure: {message}",
    }
}

/// Time-bounded store of rendered HTML.
///
/// Writes elsewhere in the application never invalidate entries; they age
/// out after the adapter's TTL or are dropped by [`PageCache::clear`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Fetch a live entry.
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError>;

    /// Store `body` under `key`, restarting its lifetime.
    async fn put(&self, key: &PageCacheKey, body: String) -> Result<(), PageCacheError>;

    /// Drop a single entry.
    async fn invalidate(&self, key: &PageCacheKey) -> Result<(), PageCacheError>;

    /// Drop every entry.
    async fn clear(&self) -> Result<(), PageCacheError>;
}
