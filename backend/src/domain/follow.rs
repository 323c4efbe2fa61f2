//! Directed follow edges between users.

use super::UserId;

/// `user` wants `author`'s posts in their personalised feed.
///
/// ## Invariants
/// - `user != author`; [`Follow::new`] refuses self-follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Follow {
    user: UserId,
    author: UserId,
}

impl Follow {
    /// Build an edge, returning `None` for a self-follow.
    pub fn new(user: UserId, author: UserId) -> Option<Self> {
        (user != author).then_some(Self { user, author })
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn author(&self) -> UserId {
        self.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn refuses_self_follow() {
        let id = UserId::random();
        assert!(Follow::new(id, id).is_none());
    }

    #[rstest]
    fn keeps_direction() {
        let user = UserId::random();
        let author = UserId::random();
        let edge = Follow::new(user, author).expect("distinct users");
        assert_eq!(edge.user(), user);
        assert_eq!(edge.author(), author);
    }
}
