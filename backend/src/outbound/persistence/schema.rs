//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the layout.

diesel::table! {
    /// Registered accounts. `username` is unique.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Communities posts may be filed under. `slug` is unique.
    groups (id) {
        id -> Int8,
        title -> Varchar,
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Posts; `group_id` is cleared when the group is deleted.
    posts (id) {
        id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
        author_id -> Uuid,
        group_id -> Nullable<Int8>,
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments, removed together with their post.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follow edges: `user_id` follows `author_id`, unique per pair.
    follows (id) {
        id -> Int8,
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
