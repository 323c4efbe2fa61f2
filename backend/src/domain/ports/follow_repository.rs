//! Port for the follow graph.
use async_trait::async_trait;

use crate::domain::Follow;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
}

/// Result of inserting a follow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowInsert {
    Created,
    AlreadyExists,
}

/// Directed edge set keyed by `(user, author)`.
///
/// Adapters must enforce uniqueness of the pair themselves; a concurrent
/// duplicate insert reports [`FollowInsert::AlreadyExists`] rather than
/// creating a second edge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Whether the edge exists.
    async fn exists(&self, edge: Follow) -> Result<bool, FollowRepositoryError>;

    /// Insert the edge if absent.
    async fn insert(&self, edge: Follow) -> Result<FollowInsert, FollowRepositoryError>;

    /// Remove the edge, reporting whether it existed.
    async fn delete(&self, edge: Follow) -> Result<bool, FollowRepositoryError>;
}
