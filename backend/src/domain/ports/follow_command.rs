//! Driving port for following and unfollowing authors.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Username};

/// What [`FollowCommand::follow`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge was stored.
    Followed,
    /// The edge already existed.
    AlreadyFollowing,
    /// The user tried to follow themselves; nothing was stored.
    SelfFollow,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow `author`. Repeating the call is harmless.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the author is unknown.
    async fn follow(&self, user: UserId, author: &Username) -> Result<FollowOutcome, Error>;

    /// Stop following `author`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the author is unknown or
    /// the edge does not exist.
    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), Error>;
}
