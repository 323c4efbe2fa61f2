//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{User, UserId, Username};

use super::diesel_helpers::{DbFailure, classify};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_row(&self, lookup: Lookup<'_>) -> Result<Option<AccountRow>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = users::table.select(AccountRow::as_select()).into_boxed();
        let query = match lookup {
            Lookup::Id(id) => query.filter(users::id.eq(id)),
            Lookup::Username(username) => query.filter(users::username.eq(username.to_owned())),
        };
        query
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find user"))
    }
}

enum Lookup<'a> {
    Id(uuid::Uuid),
    Username(&'a str),
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> UserRepositoryError {
    match classify(error, operation) {
        DbFailure::Connection(message) => UserRepositoryError::connection(message),
        DbFailure::UniqueViolation(_) => UserRepositoryError::query("unique constraint violated"),
        DbFailure::ForeignKeyViolation(_) => UserRepositoryError::query("foreign key violation"),
        DbFailure::Query(message) => UserRepositoryError::query(message),
    }
}

fn row_to_credentials(row: AccountRow) -> Result<StoredCredentials, UserRepositoryError> {
    let (user, password_hash) = row.into_user().map_err(UserRepositoryError::query)?;
    Ok(StoredCredentials {
        user,
        password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: NewAccount) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = account.user;
        let row = NewAccountRow {
            id: *user.id().as_uuid(),
            username: user.username().as_str(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            password_hash: &account.password_hash,
            created_at: account.created_at,
        };
        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await;
        match inserted {
            Ok(_) => Ok(user),
            Err(error) => match classify(error, "create user") {
                DbFailure::UniqueViolation(_) => Err(UserRepositoryError::username_taken(
                    user.username().to_string(),
                )),
                DbFailure::Connection(message) => Err(UserRepositoryError::connection(message)),
                DbFailure::ForeignKeyViolation(_) | DbFailure::Query(_) => {
                    Err(UserRepositoryError::query("failed to create user"))
                }
            },
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let row = self.find_row(Lookup::Id(*id.as_uuid())).await?;
        row.map(|row| row_to_credentials(row).map(|found| found.user))
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .find_credentials(username)
            .await?
            .map(|found| found.user))
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let row = self
            .find_row(Lookup::Username(username.as_str()))
            .await?;
        row.map(row_to_credentials).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(error, UserRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn invalid_stored_usernames_are_query_errors() {
        let row = AccountRow {
            id: Uuid::new_v4(),
            username: "no spaces allowed".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "hash".to_owned(),
        };
        assert!(matches!(
            row_to_credentials(row),
            Err(UserRepositoryError::Query { .. })
        ));
    }
}
