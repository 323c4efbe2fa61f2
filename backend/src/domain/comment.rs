//! Comments left on posts.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{AuthorRef, PostId};

/// Validation errors for comment values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment text must not be empty")]
    EmptyText,
}

/// Storage identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(i64);

impl CommentId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comment body text; never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    pub fn new(value: impl Into<String>) -> Result<Self, CommentValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: AuthorRef,
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}
