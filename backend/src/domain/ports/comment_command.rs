//! Driving port for commenting on posts.

use async_trait::async_trait;

use crate::domain::{Comment, Error, PostId, UserId};

/// Result of submitting the comment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCommentOutcome {
    Added(Comment),
    /// The text was rejected; `reason` is user-facing.
    Rejected { reason: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Attach a comment by `author` to `post_id`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the post does not exist.
    async fn add_comment(
        &self,
        author: UserId,
        post_id: PostId,
        text: String,
    ) -> Result<AddCommentOutcome, Error>;
}
