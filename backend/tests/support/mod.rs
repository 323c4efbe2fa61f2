//! Shared harness for the HTTP integration tests.
//!
//! Each test builds the full page app over the in-memory store, a media
//! root in a temporary directory and a clock the test can move forward.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;
use yatube::domain::{Group, GroupSlug};
use yatube::inbound::http::{self, AdminToken, error};
use yatube::outbound::media::MediaImageStore;
use yatube::outbound::memory::{InMemoryStore, memory_storage};

#[path = "../../src/server/config.rs"]
mod server_config;
pub use server_config::ServerConfig;

#[path = "../../src/server/state_builders.rs"]
mod state_builders;

pub const PASSWORD: &str = "correct-horse";
pub const ADMIN_TOKEN: &str = "test-admin-token";
const BOUNDARY: &str = "yatube-integration-boundary";

/// Clock that only moves when told to.
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid start time");
        Self(Mutex::new(start))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().expect("clock lock");
        *now += chrono::TimeDelta::from_std(by).expect("representable step");
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// One isolated instance of the site.
pub struct TestSite {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<TestClock>,
    pub media: TempDir,
    config: ServerConfig,
}

impl TestSite {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(TestClock::new());
        let media = tempfile::tempdir().expect("media dir");
        let images = MediaImageStore::open(media.path()).expect("media store");
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            ([127, 0, 0, 1], 0).into(),
            memory_storage(store.clone()),
            Arc::new(images),
        )
        .with_clock(clock.clone())
        .with_cache_ttl(Duration::from_secs(20));
        Self {
            store,
            clock,
            media,
            config,
        }
    }

    /// Mount the cache-clear endpoint.
    pub fn with_admin(mut self) -> Self {
        self.config = self
            .config
            .with_admin_token(Some(AdminToken::new(ADMIN_TOKEN)));
        self
    }

    pub fn add_group(&self, title: &str, slug: &str) -> Group {
        self.store
            .add_group(title, GroupSlug::new(slug).expect("slug"), "")
            .expect("group")
    }

    /// Build the app the way the server does, with a test session key.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let state = state_builders::build_http_state(&self.config);
        let admin = self.config.admin_token.clone();
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(state)
            .wrap(session)
            .wrap(yatube::Trace)
            .configure(move |cfg| http::configure(cfg, admin))
            .default_service(web::to(error::not_found))
    }
}

/// Initialised app service, as returned by `actix_web::test::init_service`.
pub trait TestApp:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestApp for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

pub async fn body_text(response: ServiceResponse) -> String {
    let bytes = actix_test::read_body(response).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location(response: &ServiceResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned()
}

/// Number of post cards on a rendered page.
pub fn post_count(body: &str) -> usize {
    body.matches("<article class=\"post\">").count()
}

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register `username` and return the logged-in session cookie.
pub async fn sign_up(app: &impl TestApp, username: &str) -> Cookie<'static> {
    let request = TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("first_name", "Test"),
            ("last_name", username),
            ("username", username),
            ("password", PASSWORD),
            ("password_confirmation", PASSWORD),
        ])
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND, "sign-up of {username}");
    session_cookie(&response)
}

pub async fn get(app: &impl TestApp, uri: &str, cookie: Option<&Cookie<'static>>) -> ServiceResponse {
    let mut request = TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    actix_test::call_service(app, request.to_request()).await
}

/// `GET` a page expecting `200 OK` and return its body.
pub async fn page(app: &impl TestApp, uri: &str, cookie: Option<&Cookie<'static>>) -> String {
    let response = get(app, uri, cookie).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_text(response).await
}

/// A file part of the post form.
pub struct ImagePart<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
}

/// Encode the post form as `multipart/form-data`.
pub fn post_form(text: &str, group: &str, image: Option<ImagePart<'_>>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in [("text", text), ("group", group)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                image.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(image.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A text-only post form with the "clear image" box ticked.
pub fn clearing_post_form(text: &str) -> (String, Vec<u8>) {
    let (content_type, mut body) = post_form(text, "", None);
    let closing = format!("--{BOUNDARY}--\r\n");
    body.truncate(body.len() - closing.len());
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"clear_image\"\r\n\r\non\r\n{closing}"
        )
        .as_bytes(),
    );
    (content_type, body)
}

/// Submit the post form to `uri` as the session owner.
pub async fn submit_post(
    app: &impl TestApp,
    uri: &str,
    cookie: &Cookie<'static>,
    form: (String, Vec<u8>),
) -> ServiceResponse {
    let (content_type, body) = form;
    let request = TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    actix_test::call_service(app, request).await
}

/// Publish a text-only post and assert the redirect to the author's profile.
pub async fn publish(app: &impl TestApp, cookie: &Cookie<'static>, text: &str, group: &str) {
    let response = submit_post(app, "/create/", cookie, post_form(text, group, None)).await;
    assert_eq!(response.status(), StatusCode::FOUND, "publishing {text:?}");
}

/// Latest post id visible on the given feed page.
pub fn first_post_id(body: &str) -> i64 {
    let start = body.find("href=\"/posts/").expect("post link") + "href=\"/posts/".len();
    body[start..]
        .split('/')
        .next()
        .and_then(|id| id.parse().ok())
        .expect("numeric post id")
}
