//! PostgreSQL-backed [`FollowRepository`].
//!
//! Uniqueness of `(user_id, author_id)` lives in the database; inserts use
//! `ON CONFLICT DO NOTHING` so concurrent follows collapse into one edge.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Follow;
use crate::domain::ports::{FollowInsert, FollowRepository, FollowRepositoryError};

use super::diesel_helpers::{DbFailure, classify};
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    FollowRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> FollowRepositoryError {
    match classify(error, operation) {
        DbFailure::Connection(message) => FollowRepositoryError::connection(message),
        DbFailure::Query(message) => FollowRepositoryError::query(message),
        DbFailure::UniqueViolation(_) | DbFailure::ForeignKeyViolation(_) => {
            FollowRepositoryError::query("follow edge violates a constraint")
        }
    }
}

fn insert_outcome(affected: usize) -> FollowInsert {
    if affected == 0 {
        FollowInsert::AlreadyExists
    } else {
        FollowInsert::Created
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn exists(&self, edge: Follow) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::user_id.eq(*edge.user().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "check follow"))
    }

    async fn insert(&self, edge: Follow) -> Result<FollowInsert, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFollowRow {
            user_id: *edge.user().as_uuid(),
            author_id: *edge.author().as_uuid(),
        };
        diesel::insert_into(follows::table)
            .values(&row)
            .on_conflict((follows::user_id, follows::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(insert_outcome)
            .map_err(|err| map_diesel_error(err, "insert follow"))
    }

    async fn delete(&self, edge: Follow) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            follows::table
                .filter(follows::user_id.eq(*edge.user().as_uuid()))
                .filter(follows::author_id.eq(*edge.author().as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|affected| affected > 0)
        .map_err(|err| map_diesel_error(err, "delete follow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, FollowInsert::AlreadyExists)]
    #[case(1, FollowInsert::Created)]
    fn affected_rows_decide_the_outcome(#[case] affected: usize, #[case] expected: FollowInsert) {
        assert_eq!(insert_outcome(affected), expected);
    }
}
