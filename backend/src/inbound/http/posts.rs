//! Authoring pages: creating and editing posts, adding comments.

use actix_multipart::Multipart;
use actix_web::{get, post, web};

use crate::domain::ports::{AddCommentOutcome, CreatePostOutcome, EditAccess, EditPostOutcome};
use crate::domain::{Post, PostFormErrors, PostFormState, PostId};

use super::error::HttpResult;
use super::feeds::{parse_post_id, redirect};
use super::forms::{read_post_draft, CommentForm};
use super::session::{CurrentUser, Viewer};
use super::state::HttpState;
use super::views::{html, NavView, PostFormPage};

const CREATE_PATH: &str = "/create/";

fn detail_path(post_id: PostId) -> String {
    format!("/posts/{post_id}/")
}

fn edit_path(post_id: PostId) -> String {
    format!("/posts/{post_id}/edit/")
}

fn profile_path(viewer: &Viewer) -> String {
    format!("/profile/{}/", viewer.username)
}

/// `edit` is the post being edited; `None` renders the create form.
async fn form_page(
    state: &HttpState,
    viewer: &Viewer,
    edit: Option<&Post>,
    form: &PostFormState,
    errors: PostFormErrors,
) -> HttpResult {
    let groups = state.feeds.groups().await?;
    let action = edit.map_or_else(|| CREATE_PATH.to_owned(), |post| edit_path(post.id));
    html(&PostFormPage::new(
        NavView::for_viewer(Some(viewer)),
        action,
        edit.is_some(),
        edit.and_then(|post| post.image.as_ref()),
        form,
        &groups,
        errors,
    ))
}

#[get("/create/")]
pub async fn create_form(state: web::Data<HttpState>, CurrentUser(viewer): CurrentUser) -> HttpResult {
    form_page(
        &state,
        &viewer,
        None,
        &PostFormState::default(),
        PostFormErrors::default(),
    )
    .await
}

#[post("/create/")]
pub async fn create_submit(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    payload: Multipart,
) -> HttpResult {
    let draft = read_post_draft(payload).await?;
    match state.posts.create_post(viewer.id, draft).await? {
        CreatePostOutcome::Created(_) => Ok(redirect(profile_path(&viewer))),
        CreatePostOutcome::Rejected(invalid) => {
            form_page(&state, &viewer, None, &invalid.form, invalid.errors).await
        }
    }
}

#[get("/posts/{post_id}/edit/")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    path: web::Path<String>,
) -> HttpResult {
    let post_id = parse_post_id(&path)?;
    match state.posts.edit_form(viewer.id, post_id).await? {
        EditAccess::Allowed { post, form } => {
            form_page(&state, &viewer, Some(&post), &form, PostFormErrors::default()).await
        }
        EditAccess::NotAuthor(post_id) => Ok(redirect(detail_path(post_id))),
    }
}

#[post("/posts/{post_id}/edit/")]
pub async fn edit_submit(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    path: web::Path<String>,
    payload: Multipart,
) -> HttpResult {
    let post_id = parse_post_id(&path)?;
    let draft = read_post_draft(payload).await?;
    match state.posts.edit_post(viewer.id, post_id, draft).await? {
        EditPostOutcome::Updated(post) => Ok(redirect(detail_path(post.id))),
        EditPostOutcome::Rejected { post, invalid } => {
            form_page(&state, &viewer, Some(&post), &invalid.form, invalid.errors).await
        }
        EditPostOutcome::NotAuthor(post_id) => Ok(redirect(detail_path(post_id))),
    }
}

/// Always lands back on the detail page; an empty comment adds the
/// `comment_error` flag so the page can explain why nothing appeared.
#[post("/posts/{post_id}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> HttpResult {
    let post_id = parse_post_id(&path)?;
    let CommentForm { text } = form.into_inner();
    match state.comments.add_comment(viewer.id, post_id, text).await? {
        AddCommentOutcome::Added(_) => Ok(redirect(detail_path(post_id))),
        AddCommentOutcome::Rejected { .. } => Ok(redirect(format!(
            "{}?comment_error=empty",
            detail_path(post_id)
        ))),
    }
}
