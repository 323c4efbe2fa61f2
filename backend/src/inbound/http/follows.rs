//! Follow and unfollow links on profile pages.

use actix_web::{get, web};

use super::error::HttpResult;
use super::feeds::{parse_username, redirect};
use super::session::CurrentUser;
use super::state::HttpState;

/// Following twice or following yourself lands on the profile unchanged.
#[get("/profile/{username}/follow/")]
pub async fn follow(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    path: web::Path<String>,
) -> HttpResult {
    let author = parse_username(&path)?;
    state.follows.follow(viewer.id, &author).await?;
    Ok(redirect(format!("/profile/{author}/")))
}

/// Unfollowing an author without an edge is a not-found failure.
#[get("/profile/{username}/unfollow/")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    path: web::Path<String>,
) -> HttpResult {
    let author = parse_username(&path)?;
    state.follows.unfollow(viewer.id, &author).await?;
    Ok(redirect(format!("/profile/{author}/")))
}
