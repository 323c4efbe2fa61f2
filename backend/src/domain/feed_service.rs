//! Feed assembly: the read side of the blog.
//!
//! Every feed counts matching posts first, resolves the requested page
//! against that total (out-of-range pages clamp to the last page) and then
//! loads just that window. Nothing here is cached.

use async_trait::async_trait;
use pagination::{Page, PageRequest, Paginator};

use crate::domain::ports::{
    FeedQuery, GroupFeed, PostDetail, PostFilter, ProfileFeed, StoragePorts,
};
use crate::domain::storage_errors::{
    map_comment_error, map_follow_error, map_group_error, map_post_error, map_user_error,
};
use crate::domain::{
    Error, FEED_PAGE_SIZE, Follow, Group, GroupSlug, Post, PostId, UserId, Username,
};

/// Feed service implementing [`FeedQuery`].
#[derive(Clone)]
pub struct FeedService {
    storage: StoragePorts,
}

impl FeedService {
    /// Create a feed service over the given storage adapters.
    pub fn new(storage: StoragePorts) -> Self {
        Self { storage }
    }

    async fn load_page(&self, filter: PostFilter, request: PageRequest) -> Result<Page<Post>, Error> {
        let total = self
            .storage
            .posts
            .count(filter)
            .await
            .map_err(map_post_error)?;
        let paginator = Paginator::new(total, FEED_PAGE_SIZE)
            .map_err(|err| Error::internal(format!("invalid feed page size: {err}")))?;
        let window = paginator.window(request);
        let items = if window.limit() == 0 {
            Vec::new()
        } else {
            self.storage
                .posts
                .list(filter, window.offset(), window.limit())
                .await
                .map_err(map_post_error)?
        };
        Ok(Page::new(items, window, total))
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn global_feed(&self, page: PageRequest) -> Result<Page<Post>, Error> {
        self.load_page(PostFilter::All, page).await
    }

    async fn group_feed(&self, slug: &GroupSlug, page: PageRequest) -> Result<GroupFeed, Error> {
        let group = self
            .storage
            .groups
            .find_by_slug(slug)
            .await
            .map_err(map_group_error)?
            .ok_or_else(|| Error::not_found(format!("group {slug} not found")))?;
        let page = self.load_page(PostFilter::Group(group.id()), page).await?;
        Ok(GroupFeed { group, page })
    }

    async fn profile_feed(
        &self,
        username: &Username,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<ProfileFeed, Error> {
        let author = self
            .storage
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))?;

        let following = match viewer.and_then(|viewer| Follow::new(viewer, author.id())) {
            Some(edge) => self
                .storage
                .follows
                .exists(edge)
                .await
                .map_err(map_follow_error)?,
            None => false,
        };

        let page = self.load_page(PostFilter::Author(author.id()), page).await?;
        Ok(ProfileFeed {
            posts_count: page.total_items(),
            author,
            following,
            page,
        })
    }

    async fn following_feed(
        &self,
        viewer: UserId,
        page: PageRequest,
    ) -> Result<Page<Post>, Error> {
        self.load_page(PostFilter::FollowedBy(viewer), page).await
    }

    async fn post_detail(&self, post_id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .storage
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))?;
        let author_posts_count = self
            .storage
            .posts
            .count(PostFilter::Author(post.author.id))
            .await
            .map_err(map_post_error)?;
        let comments = self
            .storage
            .comments
            .list_for_post(post_id)
            .await
            .map_err(map_comment_error)?;
        Ok(PostDetail {
            post,
            author_posts_count,
            comments,
        })
    }

    async fn groups(&self) -> Result<Vec<Group>, Error> {
        self.storage.groups.list().await.map_err(map_group_error)
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;
