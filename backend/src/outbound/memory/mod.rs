//! In-memory storage adapter.
//!
//! A single [`InMemoryStore`] implements every storage port over one
//! mutex-guarded state, so a request sees a consistent snapshot and each
//! mutation is atomic. It backs development runs without a database and the
//! HTTP integration tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowInsert, FollowRepository,
    FollowRepositoryError, GroupRepository, GroupRepositoryError, NewAccount, NewComment, NewPost,
    PostChanges, PostFilter, PostRepository, PostRepositoryError, StoragePorts,
    StoredCredentials, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Comment, CommentId, CommentText, Follow, Group, GroupId, GroupSlug, GroupValidationError,
    ImagePath, Post, PostId, PostText, User, UserId, Username,
};

struct AccountRow {
    user: User,
    password_hash: String,
}

struct PostRow {
    id: PostId,
    author: UserId,
    text: PostText,
    group: Option<GroupId>,
    image: Option<ImagePath>,
    created_at: DateTime<Utc>,
}

struct CommentRow {
    id: CommentId,
    post_id: PostId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    accounts: Vec<AccountRow>,
    groups: Vec<Group>,
    posts: Vec<PostRow>,
    comments: Vec<CommentRow>,
    follows: HashSet<Follow>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl State {
    fn user(&self, id: UserId) -> Option<&User> {
        self.accounts
            .iter()
            .map(|row| &row.user)
            .find(|user| user.id() == id)
    }

    fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    fn matches(&self, row: &PostRow, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => row.group == Some(group),
            PostFilter::Author(author) => row.author == author,
            PostFilter::FollowedBy(viewer) => self
                .follows
                .iter()
                .any(|edge| edge.user() == viewer && edge.author() == row.author),
        }
    }

    fn hydrate_post(&self, row: &PostRow) -> Result<Post, PostRepositoryError> {
        let author = self
            .user(row.author)
            .ok_or_else(|| PostRepositoryError::query(format!("post {} has no author", row.id)))?;
        let group = match row.group {
            Some(id) => Some(
                self.group(id)
                    .ok_or_else(|| {
                        PostRepositoryError::query(format!("post {} has a dangling group", row.id))
                    })?
                    .to_ref(),
            ),
            None => None,
        };
        Ok(Post {
            id: row.id,
            text: row.text.clone(),
            created_at: row.created_at,
            author: author.as_author(),
            group,
            image: row.image.clone(),
        })
    }

    fn hydrate_comment(&self, row: &CommentRow) -> Result<Comment, CommentRepositoryError> {
        let author = self.user(row.author).ok_or_else(|| {
            CommentRepositoryError::query(format!("comment {} has no author", row.id))
        })?;
        Ok(Comment {
            id: row.id,
            post_id: row.post_id,
            author: author.as_author(),
            text: row.text.clone(),
            created_at: row.created_at,
        })
    }
}

/// Storage adapter keeping every entity in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a group. Groups are curated by operators, so no port creates them.
    ///
    /// # Errors
    /// Returns the validation error when the title is blank or too long.
    pub fn add_group(
        &self,
        title: &str,
        slug: GroupSlug,
        description: &str,
    ) -> Result<Group, GroupValidationError> {
        let mut state = self.lock();
        state.next_group_id += 1;
        let group = Group::new(GroupId::new(state.next_group_id), title, slug, description)?;
        state.groups.push(group.clone());
        Ok(group)
    }
}

/// Expose one store through every storage port.
pub fn memory_storage(store: Arc<InMemoryStore>) -> StoragePorts {
    StoragePorts::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    )
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, account: NewAccount) -> Result<User, UserRepositoryError> {
        let mut state = self.lock();
        let taken = state
            .accounts
            .iter()
            .any(|row| row.user.username() == account.user.username());
        if taken {
            return Err(UserRepositoryError::username_taken(
                account.user.username().as_str(),
            ));
        }
        state.accounts.push(AccountRow {
            user: account.user.clone(),
            password_hash: account.password_hash,
        });
        Ok(account.user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock();
        Ok(state.user(*id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .find(|row| row.user.username() == username)
            .map(|row| row.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock();
        Ok(state
            .accounts
            .iter()
            .find(|row| row.user.username() == username)
            .map(|row| StoredCredentials {
                user: row.user.clone(),
                password_hash: row.password_hash.clone(),
            }))
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.lock();
        Ok(state.groups.iter().find(|group| group.slug() == slug).cloned())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.lock();
        Ok(state.group(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let state = self.lock();
        let mut groups = state.groups.clone();
        groups.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: NewPost) -> Result<Post, PostRepositoryError> {
        let mut state = self.lock();
        state.next_post_id += 1;
        let row = PostRow {
            id: PostId::new(state.next_post_id),
            author: post.author,
            text: post.text,
            group: post.group,
            image: post.image,
            created_at: post.created_at,
        };
        let hydrated = state.hydrate_post(&row)?;
        state.posts.push(row);
        Ok(hydrated)
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, PostRepositoryError> {
        let mut state = self.lock();
        let row = state
            .posts
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| PostRepositoryError::not_found(id.get()))?;
        row.text = changes.text;
        row.group = changes.group;
        row.image = changes.image;
        let state = &*state;
        state
            .posts
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| PostRepositoryError::not_found(id.get()))
            .and_then(|row| state.hydrate_post(row))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.lock();
        state
            .posts
            .iter()
            .find(|row| row.id == id)
            .map(|row| state.hydrate_post(row))
            .transpose()
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError> {
        let state = self.lock();
        let count = state.posts.iter().filter(|row| state.matches(row, filter)).count();
        u64::try_from(count).map_err(|err| PostRepositoryError::query(err.to_string()))
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<&PostRow> = state
            .posts
            .iter()
            .filter(|row| state.matches(row, filter))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        rows.into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| state.hydrate_post(row))
            .collect()
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|row| row.id == comment.post_id) {
            return Err(CommentRepositoryError::post_not_found(comment.post_id.get()));
        }
        state.next_comment_id += 1;
        let row = CommentRow {
            id: CommentId::new(state.next_comment_id),
            post_id: comment.post_id,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at,
        };
        let hydrated = state.hydrate_comment(&row)?;
        state.comments.push(row);
        Ok(hydrated)
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<&CommentRow> = state
            .comments
            .iter()
            .filter(|row| row.post_id == post_id)
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        rows.into_iter()
            .map(|row| state.hydrate_comment(row))
            .collect()
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn exists(&self, edge: Follow) -> Result<bool, FollowRepositoryError> {
        let state = self.lock();
        Ok(state.follows.contains(&edge))
    }

    async fn insert(&self, edge: Follow) -> Result<FollowInsert, FollowRepositoryError> {
        let mut state = self.lock();
        if state.follows.insert(edge) {
            Ok(FollowInsert::Created)
        } else {
            Ok(FollowInsert::AlreadyExists)
        }
    }

    async fn delete(&self, edge: Follow) -> Result<bool, FollowRepositoryError> {
        let mut state = self.lock();
        Ok(state.follows.remove(&edge))
    }
}
