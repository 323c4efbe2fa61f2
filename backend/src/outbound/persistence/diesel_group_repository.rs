//! PostgreSQL-backed [`GroupRepository`]. Groups are managed out of band,
//! so the adapter is read-only.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{Group, GroupId, GroupSlug};

use super::diesel_helpers::{DbFailure, classify};
use super::models::GroupRow;
use super::pool::{DbPool, PoolError};
use super::schema::groups;

#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    GroupRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> GroupRepositoryError {
    match classify(error, "read groups") {
        DbFailure::Connection(message) => GroupRepositoryError::connection(message),
        DbFailure::Query(message) => GroupRepositoryError::query(message),
        DbFailure::UniqueViolation(_) | DbFailure::ForeignKeyViolation(_) => {
            GroupRepositoryError::query("constraint violated")
        }
    }
}

pub(super) fn row_to_group(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    row.into_group().map_err(GroupRepositoryError::query)
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GroupRow> = groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_group).transpose()
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<GroupRow> = groups::table
            .find(id.get())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_group).transpose()
    }

    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = groups::table
            .order((groups::title.asc(), groups::id.asc()))
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_group).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rows_with_blank_titles_are_rejected() {
        let row = GroupRow {
            id: 1,
            title: "  ".to_owned(),
            slug: "cats".to_owned(),
            description: String::new(),
        };
        assert!(matches!(
            row_to_group(row),
            Err(GroupRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn valid_rows_convert() {
        let row = GroupRow {
            id: 7,
            title: "Cats".to_owned(),
            slug: "cats".to_owned(),
            description: "All about cats".to_owned(),
        };
        let group = row_to_group(row).expect("valid row");
        assert_eq!(group.id(), GroupId::new(7));
        assert_eq!(group.slug().as_str(), "cats");
    }
}
