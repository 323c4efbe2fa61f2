//! Bundle of the storage ports the services depend on.

use std::sync::Arc;

use super::{CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository};

/// Storage adapters shared by every domain service.
#[derive(Clone)]
pub struct StoragePorts {
    /// Account storage.
    pub users: Arc<dyn UserRepository>,
    /// Read-only group catalogue.
    pub groups: Arc<dyn GroupRepository>,
    /// Post storage and feed queries.
    pub posts: Arc<dyn PostRepository>,
    /// Comment storage.
    pub comments: Arc<dyn CommentRepository>,
    /// Follow graph.
    pub follows: Arc<dyn FollowRepository>,
}

impl StoragePorts {
    /// Build a strongly-typed storage bundle.
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        follows: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
            comments,
            follows,
        }
    }
}
