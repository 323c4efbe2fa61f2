//! Session helpers keeping handlers free of cookie details.
//!
//! The session stores the signed-in user's id and username. Handlers that
//! need a signed-in user take a [`CurrentUser`] argument; anonymous requests
//! are redirected to the login page with a `next` parameter.

use std::fmt;

use actix_session::{Session, SessionExt};
use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{dev::Payload, FromRequest, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::domain::{Error, User, UserId, Username};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";

/// Path of the login form.
pub const LOGIN_PATH: &str = "/auth/login/";

/// The signed-in user as remembered by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub username: Username,
}

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user` and rotate the session id.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id().to_string())
            .and_then(|()| self.0.insert(USERNAME_KEY, user.username().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in user, if the cookie carries a valid one.
    ///
    /// Tampered or partial sessions read as anonymous.
    pub fn viewer(&self) -> Result<Option<Viewer>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_username)) = (read(USER_ID_KEY)?, read(USERNAME_KEY)?) else {
            return Ok(None);
        };
        match (UserId::new(raw_id), Username::new(raw_username)) {
            (Ok(id), Ok(username)) => Ok(Some(Viewer { id, username })),
            _ => {
                warn!("invalid user in session cookie");
                Ok(None)
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Rejection for anonymous access to a login-only route.
#[derive(Debug)]
pub struct LoginRequired {
    next: String,
}

impl LoginRequired {
    pub fn for_request(req: &HttpRequest) -> Self {
        let next = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        Self { next }
    }

    /// `/auth/login/?next=<encoded path>`.
    pub fn location(&self) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(self.next.as_bytes()).collect();
        format!("{LOGIN_PATH}?next={encoded}")
    }
}

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "login required for {}", self.next)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((LOCATION, self.location()))
            .finish()
    }
}

/// Extractor for routes that require a signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Viewer);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = SessionContext::new(req.get_session());
        let outcome = match session.viewer() {
            Ok(Some(viewer)) => Ok(Self(viewer)),
            Ok(None) => Err(LoginRequired::for_request(req).into()),
            Err(error) => Err(error.into()),
        };
        ready(outcome)
    }
}

/// Accept a post-login redirect target only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|target| {
        target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
    })
}
