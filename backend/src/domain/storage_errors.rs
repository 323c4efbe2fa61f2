//! Translation of storage port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; everything else is an
//! internal error. Messages are logged here at debug level and redacted by
//! the HTTP layer before they reach a response.

use tracing::debug;

use super::Error;
use super::ports::{
    CommentRepositoryError, FollowRepositoryError, GroupRepositoryError, ImageStoreError,
    PasswordHashError, PostRepositoryError, UserRepositoryError,
};

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    debug!(%error, "user repository failure");
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::UsernameTaken { username } => {
            Error::conflict(format!("username already taken: {username}"))
        }
    }
}

pub(crate) fn map_group_error(error: GroupRepositoryError) -> Error {
    debug!(%error, "group repository failure");
    match error {
        GroupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("group repository unavailable: {message}"))
        }
        GroupRepositoryError::Query { message } => {
            Error::internal(format!("group repository error: {message}"))
        }
    }
}

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    debug!(%error, "post repository failure");
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostRepositoryError::NotFound { post_id } => {
            Error::not_found(format!("post {post_id} not found"))
        }
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    debug!(%error, "comment repository failure");
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::PostNotFound { post_id } => {
            Error::not_found(format!("post {post_id} not found"))
        }
    }
}

pub(crate) fn map_follow_error(error: FollowRepositoryError) -> Error {
    debug!(%error, "follow repository failure");
    match error {
        FollowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("follow repository unavailable: {message}"))
        }
        FollowRepositoryError::Query { message } => {
            Error::internal(format!("follow repository error: {message}"))
        }
    }
}

pub(crate) fn map_image_error(error: ImageStoreError) -> Error {
    debug!(%error, "image store failure");
    match error {
        ImageStoreError::Io { message } => Error::internal(format!("image store error: {message}")),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    debug!(%error, "password hasher failure");
    Error::internal(error.to_string())
}
