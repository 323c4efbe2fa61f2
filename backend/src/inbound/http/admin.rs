//! Operator endpoint for dropping the rendered-page cache.
//!
//! Registered only when an admin token is configured.

use actix_web::{post, web, HttpRequest, HttpResponse};
use subtle::ConstantTimeEq;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::Error;

use super::error::HttpResult;
use super::state::HttpState;

/// Header carrying the operator token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Shared secret expected in [`ADMIN_TOKEN_HEADER`].
#[derive(Clone)]
pub struct AdminToken(Zeroizing<String>);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Length leaks, contents do not.
    fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

#[post("/admin/cache/clear")]
pub async fn clear_cache(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: web::Data<AdminToken>,
) -> HttpResult {
    let presented = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !token.matches(presented) {
        return Err(Error::forbidden("invalid admin token"));
    }
    state
        .page_cache
        .clear()
        .await
        .map_err(|error| Error::service_unavailable(error.to_string()))?;
    info!("page cache cleared");
    Ok(HttpResponse::NoContent().finish())
}
