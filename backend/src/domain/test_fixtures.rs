//! Shared builders for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    MockCommentRepository, MockFollowRepository, MockGroupRepository, MockPostRepository,
    MockUserRepository, StoragePorts,
};
use crate::domain::{
    Group, GroupId, GroupSlug, Post, PostId, PostText, User, UserId, Username,
};

/// Mocks for every storage port; unset expectations fail loudly.
#[derive(Default)]
pub(crate) struct StorageMocks {
    pub users: MockUserRepository,
    pub groups: MockGroupRepository,
    pub posts: MockPostRepository,
    pub comments: MockCommentRepository,
    pub follows: MockFollowRepository,
}

impl StorageMocks {
    pub fn into_ports(self) -> StoragePorts {
        StoragePorts::new(
            Arc::new(self.users),
            Arc::new(self.groups),
            Arc::new(self.posts),
            Arc::new(self.comments),
            Arc::new(self.follows),
        )
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock)
}

pub(crate) fn user(name: &str) -> User {
    User::new(UserId::random(), Username::new(name).expect("valid username"))
}

pub(crate) fn group(id: i64, slug: &str) -> Group {
    Group::new(
        GroupId::new(id),
        format!("Group {slug}"),
        GroupSlug::new(slug).expect("valid slug"),
        String::new(),
    )
    .expect("valid group")
}

pub(crate) fn post(id: i64, author: &User, text: &str) -> Post {
    Post {
        id: PostId::new(id),
        text: PostText::new(text).expect("valid text"),
        created_at: fixture_timestamp(),
        author: author.as_author(),
        group: None,
        image: None,
    }
}
