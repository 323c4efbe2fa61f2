//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! domain values and report rows that fail domain validation as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AuthorRef, Comment, CommentId, CommentText, Group, GroupId, GroupRef, GroupSlug, ImagePath,
    Post, PostId, PostText, User, UserId, Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Full account row, including the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

impl AccountRow {
    pub fn into_user(self) -> Result<(User, String), String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        let user = User::new(UserId::from_uuid(self.id), username)
            .with_names(self.first_name, self.last_name);
        Ok((user, self.password_hash))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// The slice of a user embedded in posts and comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
}

impl AuthorRow {
    pub fn into_author(self) -> Result<AuthorRef, String> {
        Ok(AuthorRef {
            id: UserId::from_uuid(self.id),
            username: Username::new(self.username).map_err(|err| err.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    pub fn into_group(self) -> Result<Group, String> {
        let slug = GroupSlug::new(self.slug).map_err(|err| err.to_string())?;
        Group::new(GroupId::new(self.id), self.title, slug, self.description)
            .map_err(|err| err.to_string())
    }

    pub fn to_ref(&self) -> Result<GroupRef, String> {
        Ok(GroupRef {
            id: GroupId::new(self.id),
            slug: GroupSlug::new(self.slug.clone()).map_err(|err| err.to_string())?,
            title: self.title.clone(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl PostRow {
    pub fn into_post(self, author: AuthorRef, group: Option<GroupRef>) -> Result<Post, String> {
        Ok(Post {
            id: PostId::new(self.id),
            text: PostText::new(self.text).map_err(|err| err.to_string())?,
            created_at: self.created_at,
            author,
            group,
            image: self
                .image
                .map(ImagePath::new)
                .transpose()
                .map_err(|err| err.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

/// Editable post columns. Clearing the group or image writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PostChangesRow<'a> {
    pub text: &'a str,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    pub fn into_comment(self, author: AuthorRef) -> Result<Comment, String> {
        Ok(Comment {
            id: CommentId::new(self.id),
            post_id: PostId::new(self.post_id),
            author,
            text: CommentText::new(self.text).map_err(|err| err.to_string())?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
