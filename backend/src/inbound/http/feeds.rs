//! Read-only pages: the feeds and the post detail view.

use actix_web::{get, web, HttpRequest, HttpResponse};
use pagination::PageRequest;
use tracing::warn;

use crate::domain::ports::PageCacheKey;
use crate::domain::{Error, GroupSlug, PostId, Username};

use super::error::HttpResult;
use super::forms::{DetailQuery, PageQuery};
use super::session::{CurrentUser, SessionContext};
use super::state::HttpState;
use super::views::{
    html, post_cards, render, CommentView, FeedFragment, FollowPage, GroupPage, IndexPage,
    NavView, PaginatorView, PostCard, PostDetailPage, ProfilePage,
};

/// Shown on the detail page after an empty comment was dropped.
pub const EMPTY_COMMENT_MESSAGE: &str = "Comment text must not be empty.";

fn page_request(query: &PageQuery) -> PageRequest {
    PageRequest::from_query(query.page.as_deref())
}

pub(super) fn parse_username(raw: &str) -> Result<Username, Error> {
    Username::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

pub(super) fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::parse(raw).map_err(|_| Error::not_found(format!("post {raw} not found")))
}

/// Render the global feed fragment, or reuse a cached one for this query.
///
/// Cache failures degrade to a fresh render.
async fn global_feed_fragment(
    state: &HttpState,
    raw_query: &str,
    request: PageRequest,
) -> Result<String, Error> {
    let key = PageCacheKey::global_feed(raw_query);
    match state.page_cache.get(&key).await {
        Ok(Some(cached)) => return Ok(cached),
        Ok(None) => {}
        Err(error) => warn!(%error, key = %key, "page cache read failed"),
    }
    let page = state.feeds.global_feed(request).await?;
    let fragment = render(&FeedFragment {
        posts: post_cards(page.items()),
        paginator: PaginatorView::from(page.window()),
    })?;
    if let Err(error) = state.page_cache.put(&key, fragment.clone()).await {
        warn!(%error, key = %key, "page cache write failed");
    }
    Ok(fragment)
}

#[get("/")]
pub async fn index(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: PageQuery,
) -> HttpResult {
    let viewer = session.viewer()?;
    let feed = global_feed_fragment(&state, req.query_string(), page_request(&query)).await?;
    html(&IndexPage {
        nav: NavView::for_viewer(viewer.as_ref()),
        feed,
    })
}

#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: PageQuery,
) -> HttpResult {
    let viewer = session.viewer()?;
    let raw = path.into_inner();
    let slug =
        GroupSlug::new(raw.as_str()).map_err(|_| Error::not_found(format!("group {raw} not found")))?;
    let feed = state.feeds.group_feed(&slug, page_request(&query)).await?;
    html(&GroupPage {
        nav: NavView::for_viewer(viewer.as_ref()),
        title: feed.group.title().to_owned(),
        description: feed.group.description().to_owned(),
        posts: post_cards(feed.page.items()),
        paginator: PaginatorView::from(feed.page.window()),
    })
}

#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: PageQuery,
) -> HttpResult {
    let viewer = session.viewer()?;
    let username = parse_username(&path)?;
    let feed = state
        .feeds
        .profile_feed(
            &username,
            viewer.as_ref().map(|viewer| viewer.id),
            page_request(&query),
        )
        .await?;
    let can_follow = viewer
        .as_ref()
        .is_some_and(|viewer| viewer.id != feed.author.id());
    html(&ProfilePage {
        nav: NavView::for_viewer(viewer.as_ref()),
        username: feed.author.username().to_string(),
        full_name: feed.author.full_name(),
        posts_count: feed.posts_count,
        can_follow,
        following: feed.following,
        posts: post_cards(feed.page.items()),
        paginator: PaginatorView::from(feed.page.window()),
    })
}

#[get("/posts/{post_id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: DetailQuery,
) -> HttpResult {
    let viewer = session.viewer()?;
    let post_id = parse_post_id(&path)?;
    let detail = state.feeds.post_detail(post_id).await?;
    let can_edit = viewer
        .as_ref()
        .is_some_and(|viewer| viewer.id == detail.post.author.id);
    html(&PostDetailPage {
        nav: NavView::for_viewer(viewer.as_ref()),
        title: detail.post.title(),
        post: PostCard::from(&detail.post),
        author_posts_count: detail.author_posts_count,
        comments: detail.comments.iter().map(CommentView::from).collect(),
        can_edit,
        can_comment: viewer.is_some(),
        comment_error: query
            .comment_error
            .as_ref()
            .map(|_| EMPTY_COMMENT_MESSAGE.to_owned()),
    })
}

#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    CurrentUser(viewer): CurrentUser,
    query: PageQuery,
) -> HttpResult {
    let page = state
        .feeds
        .following_feed(viewer.id, page_request(&query))
        .await?;
    html(&FollowPage {
        nav: NavView::for_viewer(Some(&viewer)),
        posts: post_cards(page.items()),
        paginator: PaginatorView::from(page.window()),
    })
}

/// `302 Found` to `location`.
pub(super) fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, location.as_ref()))
        .finish()
}
