//! Helpers shared by the handler unit tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;

/// Name of the cookie carrying the signed-in viewer.
pub const SESSION_COOKIE: &str = "session";

/// Cookie sessions with a throwaway key, sent over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(false)
        .build()
}

/// The session cookie a response set, ready to replay on the next request.
///
/// # Panics
/// When the response did not touch the session.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie set")
        .into_owned()
}
