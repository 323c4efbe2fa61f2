//! Port for post persistence and feed queries.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{GroupId, ImagePath, Post, PostId, PostText, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The post to update does not exist.
        NotFound { post_id: i64 } => "post not found: {post_id}",
    }
}

/// Selects which posts a feed contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts filed under a group.
    Group(GroupId),
    /// Posts written by an author.
    Author(UserId),
    /// Posts by authors the given user follows.
    FollowedBy(UserId),
}

/// Post to be created by [`PostRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: UserId,
    pub text: PostText,
    pub group: Option<GroupId>,
    pub image: Option<ImagePath>,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields of a post. Authorship and creation time never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub text: PostText,
    pub group: Option<GroupId>,
    pub image: Option<ImagePath>,
}

/// Post storage.
///
/// Listings are ordered newest first: `created_at` descending, then id
/// descending so posts sharing a timestamp keep insertion order reversed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post, returning it with its assigned id.
    async fn insert(&self, post: NewPost) -> Result<Post, PostRepositoryError>;

    /// Replace the mutable fields of a post.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, PostRepositoryError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Count the posts matching `filter`.
    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError>;

    /// Load up to `limit` posts matching `filter`, skipping `offset`.
    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError>;
}
