//! Askama page templates and the view models they render.
//!
//! View models flatten domain values into plain strings so templates stay
//! free of formatting logic.

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use askama::Template;
use pagination::PageWindow;

use crate::domain::{
    Comment, Error, Group, ImagePath, Post, PostFormErrors, PostFormState, SignupErrors,
};

use super::session::Viewer;

/// URL prefix under which the media root is served.
pub const MEDIA_URL: &str = "/media/";

const DATE_FORMAT: &str = "%d %B %Y %H:%M";

/// Render `template` to a string.
pub fn render<T: Template>(template: &T) -> Result<String, Error> {
    template
        .render()
        .map_err(|err| Error::internal(format!("template rendering failed: {err}")))
}

/// Render `template` into a `200 OK` HTML response.
pub fn html<T: Template>(template: &T) -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render(template)?))
}

/// Viewer-specific navigation bar.
#[derive(Debug, Clone, Default)]
pub struct NavView {
    pub username: Option<String>,
}

impl NavView {
    pub fn for_viewer(viewer: Option<&Viewer>) -> Self {
        Self {
            username: viewer.map(|viewer| viewer.username.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupLink {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct PostCard {
    pub id: i64,
    pub text: String,
    pub published: String,
    pub author_username: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.get(),
            text: post.text.as_str().to_owned(),
            published: post.created_at.format(DATE_FORMAT).to_string(),
            author_username: post.author.username.to_string(),
            group: post.group.as_ref().map(|group| GroupLink {
                slug: group.slug.to_string(),
                title: group.title.clone(),
            }),
            image_url: post.image.as_ref().map(media_url),
        }
    }
}

fn media_url(image: &ImagePath) -> String {
    format!("{MEDIA_URL}{image}")
}

pub fn post_cards(posts: &[Post]) -> Vec<PostCard> {
    posts.iter().map(PostCard::from).collect()
}

/// Page links below a feed.
#[derive(Debug, Clone)]
pub struct PaginatorView {
    pub number: u64,
    pub num_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl PaginatorView {
    pub fn show(&self) -> bool {
        self.num_pages > 1
    }
}

impl From<&PageWindow> for PaginatorView {
    fn from(window: &PageWindow) -> Self {
        Self {
            number: window.number(),
            num_pages: window.num_pages(),
            previous: window.previous_page_number(),
            next: window.next_page_number(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author_username: String,
    pub text: String,
    pub published: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            author_username: comment.author.username.to_string(),
            text: comment.text.as_str().to_owned(),
            published: comment.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupOption {
    pub value: String,
    pub title: String,
    pub selected: bool,
}

/// Selector entries for the post form, marking the submitted choice.
pub fn group_options(groups: &[Group], selected: &str) -> Vec<GroupOption> {
    groups
        .iter()
        .map(|group| {
            let value = group.id().to_string();
            GroupOption {
                selected: value == selected,
                value,
                title: group.title().to_owned(),
            }
        })
        .collect()
}

/// The cacheable part of the global feed.
#[derive(Template)]
#[template(path = "includes/feed.html")]
pub struct FeedFragment {
    pub posts: Vec<PostCard>,
    pub paginator: PaginatorView,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub nav: NavView,
    pub feed: String,
}

#[derive(Template)]
#[template(path = "group_list.html")]
pub struct GroupPage {
    pub nav: NavView,
    pub title: String,
    pub description: String,
    pub posts: Vec<PostCard>,
    pub paginator: PaginatorView,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub nav: NavView,
    pub username: String,
    pub full_name: String,
    pub posts_count: u64,
    pub can_follow: bool,
    pub following: bool,
    pub posts: Vec<PostCard>,
    pub paginator: PaginatorView,
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailPage {
    pub nav: NavView,
    pub title: String,
    pub post: PostCard,
    pub author_posts_count: u64,
    pub comments: Vec<CommentView>,
    pub can_edit: bool,
    pub can_comment: bool,
    pub comment_error: Option<String>,
}

#[derive(Template)]
#[template(path = "create_post.html")]
pub struct PostFormPage {
    pub nav: NavView,
    pub action: String,
    pub is_edit: bool,
    /// URL of the image an edited post already carries.
    pub current_image: Option<String>,
    pub text: String,
    pub groups: Vec<GroupOption>,
    pub errors: PostFormErrors,
}

impl PostFormPage {
    /// `current_image` is the image an edited post already carries.
    pub fn new(
        nav: NavView,
        action: String,
        is_edit: bool,
        current_image: Option<&ImagePath>,
        form: &PostFormState,
        groups: &[Group],
        errors: PostFormErrors,
    ) -> Self {
        Self {
            nav,
            action,
            is_edit,
            current_image: current_image.map(media_url),
            text: form.text.clone(),
            groups: group_options(groups, &form.group),
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "follow.html")]
pub struct FollowPage {
    pub nav: NavView,
    pub posts: Vec<PostCard>,
    pub paginator: PaginatorView,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub nav: NavView,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub errors: SignupErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub nav: NavView,
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundPage {
    pub nav: NavView,
    pub path: String,
}

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorPage {
    pub nav: NavView,
    pub status: u16,
    pub message: String,
    pub trace_id: Option<String>,
}
