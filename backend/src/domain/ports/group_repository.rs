//! Port for reading groups.
use async_trait::async_trait;

use crate::domain::{Group, GroupId, GroupSlug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "group repository query failed: {message}",
    }
}

/// Groups are managed outside the application; this port is read-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Fetch a group by slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError>;

    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    /// All groups ordered by title, for the post form selector.
    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError>;
}
