//! Port for comment persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentText, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The commented post does not exist.
        PostNotFound { post_id: i64 } => "post not found: {post_id}",
    }
}

/// Comment to be created by [`CommentRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author: UserId,
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment, returning it with its assigned id.
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;
}
