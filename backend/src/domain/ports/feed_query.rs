//! Driving port for the read side: feeds and post detail.
//!
//! Every feed is computed from storage on each call; caching of the global
//! feed happens in the inbound adapter through [`super::PageCache`].

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Comment, Error, Group, GroupSlug, Post, PostId, User, UserId, Username};

/// Posts filed under one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<Post>,
}

/// An author's posts plus the viewer's relationship to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFeed {
    pub author: User,
    pub posts_count: u64,
    /// Whether the viewer follows the author. Always `false` for anonymous
    /// viewers and for authors viewing their own profile.
    pub following: bool,
    pub page: Page<Post>,
}

/// A single post with its discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    /// Total posts written by the post's author.
    pub author_posts_count: u64,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Every post, newest first.
    async fn global_feed(&self, page: PageRequest) -> Result<Page<Post>, Error>;

    /// Posts in the group identified by `slug`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the slug is unknown.
    async fn group_feed(&self, slug: &GroupSlug, page: PageRequest) -> Result<GroupFeed, Error>;

    /// Posts by `username`, with follow status for `viewer`.
    async fn profile_feed(
        &self,
        username: &Username,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<ProfileFeed, Error>;

    /// Posts by every author `viewer` follows.
    async fn following_feed(&self, viewer: UserId, page: PageRequest)
    -> Result<Page<Post>, Error>;

    /// One post with comments.
    async fn post_detail(&self, post_id: PostId) -> Result<PostDetail, Error>;

    /// Groups available for selection on the post form.
    async fn groups(&self) -> Result<Vec<Group>, Error>;
}
