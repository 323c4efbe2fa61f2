//! PostgreSQL-backed [`PostRepository`].
//!
//! Feed pages are read in three queries: the filtered window of post rows,
//! then the authors and groups those rows reference.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{NewPost, PostChanges, PostFilter, PostRepository, PostRepositoryError};
use crate::domain::{AuthorRef, GroupRef, Post, PostId};

use super::diesel_helpers::{DbFailure, classify, count_to_u64, to_sql_i64};
use super::models::{AuthorRow, GroupRow, NewPostRow, PostChangesRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    PostRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PostRepositoryError {
    match classify(error, operation) {
        DbFailure::Connection(message) => PostRepositoryError::connection(message),
        DbFailure::Query(message) => PostRepositoryError::query(message),
        DbFailure::ForeignKeyViolation(constraint) => PostRepositoryError::query(format!(
            "post references a missing row ({})",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DbFailure::UniqueViolation(_) => PostRepositoryError::query("unique constraint violated"),
    }
}

/// Posts matching `filter`; follow edges are read at query time.
fn filtered(filter: PostFilter) -> posts::BoxedQuery<'static, Pg> {
    let query = posts::table.into_boxed();
    match filter {
        PostFilter::All => query,
        PostFilter::Group(group) => query.filter(posts::group_id.eq(group.get())),
        PostFilter::Author(author) => query.filter(posts::author_id.eq(*author.as_uuid())),
        PostFilter::FollowedBy(viewer) => query.filter(
            posts::author_id.eq_any(
                follows::table
                    .filter(follows::user_id.eq(*viewer.as_uuid()))
                    .select(follows::author_id),
            ),
        ),
    }
}

/// Attach authors and groups to `rows`, preserving their order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostRow>,
) -> Result<Vec<Post>, PostRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let author_ids: Vec<Uuid> = rows.iter().map(|row| row.author_id).collect();
    let group_ids: Vec<i64> = rows.iter().filter_map(|row| row.group_id).collect();

    let authors: HashMap<Uuid, AuthorRef> = users::table
        .filter(users::id.eq_any(author_ids))
        .select(AuthorRow::as_select())
        .load::<AuthorRow>(conn)
        .await
        .map_err(|err| map_diesel_error(err, "load post authors"))?
        .into_iter()
        .map(|row| row.into_author().map(|author| (*author.id.as_uuid(), author)))
        .collect::<Result<_, _>>()
        .map_err(PostRepositoryError::query)?;

    let group_refs: HashMap<i64, GroupRef> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        groups::table
            .filter(groups::id.eq_any(group_ids))
            .select(GroupRow::as_select())
            .load::<GroupRow>(conn)
            .await
            .map_err(|err| map_diesel_error(err, "load post groups"))?
            .iter()
            .map(|row| row.to_ref().map(|group| (row.id, group)))
            .collect::<Result<_, _>>()
            .map_err(PostRepositoryError::query)?
    };

    rows.into_iter()
        .map(|row| {
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| PostRepositoryError::query("post author is missing"))?;
            let group = row.group_id.and_then(|id| group_refs.get(&id).cloned());
            row.into_post(author, group)
                .map_err(PostRepositoryError::query)
        })
        .collect()
}

async fn hydrate_one(
    conn: &mut AsyncPgConnection,
    row: PostRow,
) -> Result<Post, PostRepositoryError> {
    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| PostRepositoryError::query("post vanished while loading"))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            text: post.text.as_str(),
            created_at: post.created_at,
            author_id: *post.author.as_uuid(),
            group_id: post.group.map(|group| group.get()),
            image: post.image.as_ref().map(|image| image.as_str()),
        };
        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert post"))?;
        hydrate_one(&mut conn, stored).await
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = PostChangesRow {
            text: changes.text.as_str(),
            group_id: changes.group.map(|group| group.get()),
            image: changes.image.as_ref().map(|image| image.as_str()),
        };
        let stored: Option<PostRow> = diesel::update(posts::table.find(id.get()))
            .set(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update post"))?;
        match stored {
            Some(stored) => hydrate_one(&mut conn, stored).await,
            None => Err(PostRepositoryError::not_found(id.get())),
        }
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<PostRow> = posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find post"))?;
        match stored {
            Some(stored) => hydrate_one(&mut conn, stored).await.map(Some),
            None => Ok(None),
        }
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count posts"))?;
        Ok(count_to_u64(total))
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = filtered(filter)
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(to_sql_i64(offset))
            .limit(to_sql_i64(limit))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list posts"))?;
        hydrate(&mut conn, rows).await
    }
}
