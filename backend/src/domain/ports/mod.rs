//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod cache_key;
mod comment_command;
mod comment_repository;
mod feed_query;
mod follow_command;
mod follow_repository;
mod group_repository;
mod image_store;
mod page_cache;
mod password_hasher;
mod post_command;
mod post_repository;
mod storage_ports;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountService;
pub use account_command::{AccountService, SignupOutcome};
pub use cache_key::{PageCacheKey, PageCacheKeyValidationError};
#[cfg(test)]
pub use comment_command::MockCommentCommand;
pub use comment_command::{AddCommentOutcome, CommentCommand};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError, NewComment};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedQuery, GroupFeed, PostDetail, ProfileFeed};
#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::{FollowCommand, FollowOutcome};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowInsert, FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{PageCache, PageCacheError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{CreatePostOutcome, EditAccess, EditPostOutcome, PostCommand};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{NewPost, PostChanges, PostFilter, PostRepository, PostRepositoryError};
pub use storage_ports::StoragePorts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
