//! HTML rendering of domain errors.
//!
//! Not-found failures render the dedicated 404 page; everything else renders
//! the generic error page with the request's trace id. Internal messages are
//! logged and replaced before they reach the browser.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

use super::views::{render, NavView, NotFoundPage, ServerErrorPage};

/// Result alias for HTTP handlers.
pub type HttpResult<T = HttpResponse> = Result<T, Error>;

const REDACTED: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn page_body(error: &Error, status: StatusCode) -> String {
    let rendered = match error.code() {
        ErrorCode::NotFound => render(&NotFoundPage {
            nav: NavView::default(),
            path: String::new(),
        }),
        code => render(&ServerErrorPage {
            nav: NavView::default(),
            status: status.as_u16(),
            message: if matches!(code, ErrorCode::InternalError) {
                REDACTED.to_owned()
            } else {
                error.message().to_owned()
            },
            trace_id: error.trace_id().map(str::to_owned),
        }),
    };
    // A broken template must not hide the original failure.
    rendered.unwrap_or_else(|_| status.canonical_reason().unwrap_or(REDACTED).to_owned())
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder
            .content_type(ContentType::html())
            .body(page_body(self, status))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED)
    }
}

/// Fallback service for unknown routes.
pub async fn not_found(req: HttpRequest) -> HttpResult {
    let body = render(&NotFoundPage {
        nav: NavView::default(),
        path: req.path().to_owned(),
    })?;
    Ok(HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(body))
}
