//! PostgreSQL-backed [`CommentRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CommentRepository, CommentRepositoryError, NewComment};
use crate::domain::{AuthorRef, Comment, PostId};

use super::diesel_helpers::{DbFailure, classify};
use super::models::{AuthorRow, CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    CommentRepositoryError::connection(error.into_message())
}

/// A foreign-key failure on insert means the post disappeared.
fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
    post_id: PostId,
) -> CommentRepositoryError {
    match classify(error, operation) {
        DbFailure::Connection(message) => CommentRepositoryError::connection(message),
        DbFailure::ForeignKeyViolation(constraint)
            if constraint
                .as_deref()
                .is_none_or(|name| name.contains("post_id")) =>
        {
            CommentRepositoryError::post_not_found(post_id.get())
        }
        DbFailure::ForeignKeyViolation(_) => {
            CommentRepositoryError::query("comment references a missing author")
        }
        DbFailure::UniqueViolation(_) => CommentRepositoryError::query("unique constraint violated"),
        DbFailure::Query(message) => CommentRepositoryError::query(message),
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            post_id: comment.post_id.get(),
            author_id: *comment.author.as_uuid(),
            text: comment.text.as_str(),
            created_at: comment.created_at,
        };
        let stored: CommentRow = diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert comment", comment.post_id))?;
        let author: AuthorRow = users::table
            .find(stored.author_id)
            .select(AuthorRow::as_select())
            .first(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "load comment author", comment.post_id))?;
        let author = author.into_author().map_err(CommentRepositoryError::query)?;
        stored
            .into_comment(author)
            .map_err(CommentRepositoryError::query)
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, AuthorRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list comments", post_id))?;

        let mut authors: HashMap<Uuid, AuthorRef> = HashMap::new();
        rows.into_iter()
            .map(|(comment, author_row)| {
                let author = match authors.get(&author_row.id) {
                    Some(author) => author.clone(),
                    None => {
                        let author = author_row.into_author()?;
                        authors.insert(*author.id.as_uuid(), author.clone());
                        author
                    }
                };
                comment.into_comment(author)
            })
            .collect::<Result<_, String>>()
            .map_err(CommentRepositoryError::query)
    }
}
