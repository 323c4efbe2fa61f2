//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised against mocks or the in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CommentCommand, FeedQuery, FollowCommand, PageCache, PostCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feeds: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub comments: Arc<dyn CommentCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub accounts: Arc<dyn AccountService>,
    pub page_cache: Arc<dyn PageCache>,
}
