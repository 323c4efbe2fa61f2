//! Follow graph use-cases.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{FollowCommand, FollowInsert, FollowOutcome, StoragePorts};
use crate::domain::storage_errors::{map_follow_error, map_user_error};
use crate::domain::{Error, Follow, User, UserId, Username};

/// Service implementing [`FollowCommand`].
#[derive(Clone)]
pub struct FollowService {
    storage: StoragePorts,
}

impl FollowService {
    /// Create a follow service.
    pub fn new(storage: StoragePorts) -> Self {
        Self { storage }
    }

    async fn author(&self, username: &Username) -> Result<User, Error> {
        self.storage
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))
    }
}

#[async_trait]
impl FollowCommand for FollowService {
    async fn follow(&self, user: UserId, author: &Username) -> Result<FollowOutcome, Error> {
        let author = self.author(author).await?;
        let Some(edge) = Follow::new(user, author.id()) else {
            return Ok(FollowOutcome::SelfFollow);
        };
        if self
            .storage
            .follows
            .exists(edge)
            .await
            .map_err(map_follow_error)?
        {
            return Ok(FollowOutcome::AlreadyFollowing);
        }
        // A concurrent request may win between the check and the insert; the
        // adapter's uniqueness constraint reports that as `AlreadyExists`.
        match self
            .storage
            .follows
            .insert(edge)
            .await
            .map_err(map_follow_error)?
        {
            FollowInsert::Created => {
                info!(user = %user, author = %author.username(), "follow created");
                Ok(FollowOutcome::Followed)
            }
            FollowInsert::AlreadyExists => Ok(FollowOutcome::AlreadyFollowing),
        }
    }

    async fn unfollow(&self, user: UserId, author: &Username) -> Result<(), Error> {
        let author = self.author(author).await?;
        let edge = Follow::new(user, author.id())
            .ok_or_else(|| Error::not_found("cannot unfollow yourself"))?;
        let removed = self
            .storage
            .follows
            .delete(edge)
            .await
            .map_err(map_follow_error)?;
        if !removed {
            return Err(Error::not_found(format!(
                "not following {}",
                author.username()
            )));
        }
        info!(user = %user, author = %author.username(), "follow removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::test_fixtures::{StorageMocks, user};
    use rstest::rstest;

    fn with_author(author: &User) -> StorageMocks {
        let mut mocks = StorageMocks::default();
        let found = author.clone();
        mocks
            .users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(found)));
        mocks
    }

    #[tokio::test]
    async fn following_yourself_stores_nothing() {
        let author = user("leo");
        let mut mocks = with_author(&author);
        mocks.follows.expect_exists().never();
        mocks.follows.expect_insert().never();

        let outcome = FollowService::new(mocks.into_ports())
            .follow(author.id(), author.username())
            .await
            .expect("outcome");

        assert_eq!(outcome, FollowOutcome::SelfFollow);
    }

    #[rstest]
    #[case::fresh(false, FollowInsert::Created, FollowOutcome::Followed)]
    #[case::lost_race(false, FollowInsert::AlreadyExists, FollowOutcome::AlreadyFollowing)]
    #[tokio::test]
    async fn follow_inserts_missing_edges(
        #[case] exists: bool,
        #[case] insert: FollowInsert,
        #[case] expected: FollowOutcome,
    ) {
        let author = user("leo");
        let mut mocks = with_author(&author);
        mocks.follows.expect_exists().return_once(move |_| Ok(exists));
        mocks
            .follows
            .expect_insert()
            .times(1)
            .return_once(move |_| Ok(insert));

        let outcome = FollowService::new(mocks.into_ports())
            .follow(UserId::random(), author.username())
            .await
            .expect("outcome");

        assert_eq!(outcome, expected);
    }

    #[tokio::test]
    async fn existing_edges_are_not_inserted_again() {
        let author = user("leo");
        let mut mocks = with_author(&author);
        mocks.follows.expect_exists().return_once(|_| Ok(true));
        mocks.follows.expect_insert().never();

        let outcome = FollowService::new(mocks.into_ports())
            .follow(UserId::random(), author.username())
            .await
            .expect("outcome");

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
    }

    #[tokio::test]
    async fn follow_of_unknown_author_is_not_found() {
        let mut mocks = StorageMocks::default();
        mocks.users.expect_find_by_username().return_once(|_| Ok(None));

        let username = Username::new("ghost").expect("username");
        let err = FollowService::new(mocks.into_ports())
            .follow(UserId::random(), &username)
            .await
            .expect_err("missing author");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case::edge_removed(true, true)]
    #[case::no_edge(false, false)]
    #[tokio::test]
    async fn unfollow_requires_an_existing_edge(#[case] removed: bool, #[case] ok: bool) {
        let author = user("leo");
        let mut mocks = with_author(&author);
        mocks
            .follows
            .expect_delete()
            .times(1)
            .return_once(move |_| Ok(removed));

        let result = FollowService::new(mocks.into_ports())
            .unfollow(UserId::random(), author.username())
            .await;

        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::NotFound);
        }
    }

    #[tokio::test]
    async fn unfollowing_yourself_is_not_found() {
        let author = user("leo");
        let mut mocks = with_author(&author);
        mocks.follows.expect_delete().never();

        let err = FollowService::new(mocks.into_ports())
            .unfollow(author.id(), author.username())
            .await
            .expect_err("self unfollow");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
