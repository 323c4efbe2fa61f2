//! Authoring rules: creating and editing posts, commenting.
//!
//! Only a post's author may edit it. Uploaded images are written to the
//! image store only once the rest of the submission is known to be valid,
//! so a rejected form never leaves an orphaned file behind.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AddCommentOutcome, CommentCommand, CreatePostOutcome, EditAccess, EditPostOutcome,
    ImageStore, NewComment, NewPost, PostChanges, PostCommand, StoragePorts,
};
use crate::domain::storage_errors::{
    map_comment_error, map_group_error, map_image_error, map_post_error,
};
use crate::domain::{
    CommentText, Error, ImagePath, InvalidPostDraft, Post, PostDraft, PostFormErrors,
    PostFormState, PostId, UserId, ValidPostDraft, ValidatedImage,
};

const UNKNOWN_GROUP: &str = "select a valid group";

/// Service implementing [`PostCommand`] and [`CommentCommand`].
#[derive(Clone)]
pub struct AuthoringService {
    storage: StoragePorts,
    images: Arc<dyn ImageStore>,
    clock: Arc<dyn Clock>,
}

impl AuthoringService {
    /// Create an authoring service.
    pub fn new(storage: StoragePorts, images: Arc<dyn ImageStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            images,
            clock,
        }
    }

    async fn load_post(&self, post_id: PostId) -> Result<Post, Error> {
        self.storage
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))
    }

    /// Field validation followed by the storage lookup of the chosen group.
    async fn resolve_draft(
        &self,
        draft: PostDraft,
    ) -> Result<Result<ValidPostDraft, InvalidPostDraft>, Error> {
        let valid = match draft.validate() {
            Ok(valid) => valid,
            Err(invalid) => return Ok(Err(invalid)),
        };
        if let Some(group_id) = valid.group {
            let found = self
                .storage
                .groups
                .find_by_id(group_id)
                .await
                .map_err(map_group_error)?;
            if found.is_none() {
                return Ok(Err(InvalidPostDraft {
                    form: valid.form,
                    errors: PostFormErrors {
                        group: Some(UNKNOWN_GROUP.to_owned()),
                        ..PostFormErrors::default()
                    },
                }));
            }
        }
        Ok(Ok(valid))
    }

    async fn store_image(&self, image: Option<ValidatedImage>) -> Result<Option<ImagePath>, Error> {
        match image {
            Some(image) => self
                .images
                .save(image)
                .await
                .map(Some)
                .map_err(map_image_error),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostCommand for AuthoringService {
    async fn create_post(
        &self,
        author: UserId,
        draft: PostDraft,
    ) -> Result<CreatePostOutcome, Error> {
        let valid = match self.resolve_draft(draft).await? {
            Ok(valid) => valid,
            Err(invalid) => return Ok(CreatePostOutcome::Rejected(invalid)),
        };
        let image = self.store_image(valid.image).await?;
        let post = self
            .storage
            .posts
            .insert(NewPost {
                author,
                text: valid.text,
                group: valid.group,
                image,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post.id, author = %author, "post created");
        Ok(CreatePostOutcome::Created(post))
    }

    async fn edit_form(&self, requester: UserId, post_id: PostId) -> Result<EditAccess, Error> {
        let post = self.load_post(post_id).await?;
        if post.author.id != requester {
            return Ok(EditAccess::NotAuthor(post_id));
        }
        Ok(EditAccess::Allowed {
            form: PostFormState::from_post(&post),
            post,
        })
    }

    async fn edit_post(
        &self,
        requester: UserId,
        post_id: PostId,
        draft: PostDraft,
    ) -> Result<EditPostOutcome, Error> {
        let post = self.load_post(post_id).await?;
        if post.author.id != requester {
            info!(post_id = %post_id, requester = %requester, "edit refused for non-author");
            return Ok(EditPostOutcome::NotAuthor(post_id));
        }
        let valid = match self.resolve_draft(draft).await? {
            Ok(valid) => valid,
            Err(invalid) => return Ok(EditPostOutcome::Rejected { post, invalid }),
        };
        let clear_image = valid.clear_image;
        let image = match self.store_image(valid.image).await? {
            Some(path) => Some(path),
            None if clear_image => None,
            None => post.image,
        };
        let updated = self
            .storage
            .posts
            .update(
                post_id,
                PostChanges {
                    text: valid.text,
                    group: valid.group,
                    image,
                },
            )
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post_id, "post edited");
        Ok(EditPostOutcome::Updated(updated))
    }
}

#[async_trait]
impl CommentCommand for AuthoringService {
    async fn add_comment(
        &self,
        author: UserId,
        post_id: PostId,
        text: String,
    ) -> Result<AddCommentOutcome, Error> {
        self.load_post(post_id).await?;
        let text = match CommentText::new(text) {
            Ok(text) => text,
            Err(err) => {
                info!(post_id = %post_id, author = %author, reason = %err, "comment rejected");
                return Ok(AddCommentOutcome::Rejected {
                    reason: err.to_string(),
                });
            }
        };
        let comment = self
            .storage
            .comments
            .insert(NewComment {
                post_id,
                author,
                text,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_comment_error)?;
        info!(post_id = %post_id, comment_id = %comment.id, "comment added");
        Ok(AddCommentOutcome::Added(comment))
    }
}

#[cfg(test)]
#[path = "authoring_service_tests.rs"]
mod tests;
