//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed entities of the blogging platform,
//! the ports through which adapters reach storage, and the services that
//! implement the use-cases. Nothing in this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Entities: [`User`], [`Group`], [`Post`], [`Comment`], [`Follow`].
//! - Form inputs: [`PostDraft`], [`SignupForm`], [`LoginCredentials`].
//! - [`Error`] and [`ErrorCode`], the transport-agnostic failure type.
//! - [`ports`]: driven and driving port traits.
//! - Services: [`FeedService`], [`AuthoringService`], [`FollowService`],
//!   [`AccountServiceImpl`].

mod account_service;
mod auth;
mod authoring_service;
mod comment;
mod error;
mod feed_service;
mod follow;
mod follow_service;
mod group;
mod image;
pub mod ports;
mod post;
mod storage_errors;
#[cfg(test)]
mod test_fixtures;
mod trace_id;
mod user;

pub use self::account_service::AccountServiceImpl;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, PERSON_NAME_MAX, SignupErrors,
    SignupForm, ValidSignup,
};
pub use self::authoring_service::AuthoringService;
pub use self::comment::{Comment, CommentId, CommentText, CommentValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feed_service::FeedService;
pub use self::follow::Follow;
pub use self::follow_service::FollowService;
pub use self::group::{
    GROUP_SLUG_MAX, GROUP_TITLE_MAX, Group, GroupId, GroupRef, GroupSlug, GroupValidationError,
};
pub use self::image::{
    IMAGE_EXTENSIONS, IMAGE_MAX_BYTES, ImagePath, ImageValidationError, UploadedImage,
    ValidatedImage,
};
pub use self::post::{
    IMAGE_CLEAR_CONFLICT, InvalidPostDraft, POST_TITLE_CHARS, Post, PostDraft, PostFormErrors,
    PostFormState, PostId, PostText, PostValidationError, ValidPostDraft,
};
pub use self::trace_id::TraceId;
pub use self::user::{AuthorRef, USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Number of posts shown on every feed page.
pub const FEED_PAGE_SIZE: u64 = 10;

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use yatube::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
