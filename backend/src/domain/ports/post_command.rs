//! Driving port for writing and editing posts.

use async_trait::async_trait;

use crate::domain::{Error, InvalidPostDraft, Post, PostDraft, PostFormState, PostId, UserId};

/// Result of submitting the new-post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePostOutcome {
    /// The post was stored.
    Created(Post),
    /// Nothing was stored; the form should be shown again.
    Rejected(InvalidPostDraft),
}

/// Result of opening the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAccess {
    /// The requester wrote the post and may edit it.
    Allowed { post: Post, form: PostFormState },
    /// Someone else wrote the post.
    NotAuthor(PostId),
}

/// Result of submitting the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPostOutcome {
    /// The post was changed.
    Updated(Post),
    /// The post is unchanged; the form should be shown again.
    Rejected { post: Post, invalid: InvalidPostDraft },
    /// Someone else wrote the post; it is unchanged.
    NotAuthor(PostId),
}

/// Authoring use-cases.
///
/// Unknown post ids fail with [`crate::domain::ErrorCode::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Validate and store a new post written by `author`.
    async fn create_post(&self, author: UserId, draft: PostDraft)
    -> Result<CreatePostOutcome, Error>;

    /// Check that `requester` may edit `post_id` and prefill the form.
    async fn edit_form(&self, requester: UserId, post_id: PostId) -> Result<EditAccess, Error>;

    /// Validate and apply an edit.
    async fn edit_post(
        &self,
        requester: UserId,
        post_id: PostId,
        draft: PostDraft,
    ) -> Result<EditPostOutcome, Error>;
}
