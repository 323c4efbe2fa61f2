//! HTTP inbound adapter serving the server-rendered pages.
//!
//! Handlers parse requests, call the driving ports held in
//! [`state::HttpState`] and render askama templates from [`views`].

pub mod accounts;
pub mod admin;
pub mod error;
pub mod feeds;
pub mod follows;
pub mod forms;
pub mod posts;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::web;

pub use admin::AdminToken;
pub use error::HttpResult;

/// Register every page route.
///
/// The cache-clear endpoint is only mounted when `admin` carries a token.
/// Callers wrap the routes with session middleware and install
/// [`error::not_found`] as the default service.
pub fn configure(cfg: &mut web::ServiceConfig, admin: Option<AdminToken>) {
    cfg.service(feeds::index)
        .service(feeds::group_posts)
        .service(feeds::follow_index)
        .service(feeds::profile)
        .service(follows::follow)
        .service(follows::unfollow)
        .service(posts::create_form)
        .service(posts::create_submit)
        .service(feeds::post_detail)
        .service(posts::edit_form)
        .service(posts::edit_submit)
        .service(posts::add_comment)
        .service(accounts::signup_form)
        .service(accounts::signup_submit)
        .service(accounts::login_form)
        .service(accounts::login_submit)
        .service(accounts::logout);
    if let Some(token) = admin {
        cfg.app_data(web::Data::new(token))
            .service(admin::clear_cache);
    }
}
