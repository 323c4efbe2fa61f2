//! Builders wiring domain services onto the configured adapters.

use std::sync::Arc;

use actix_web::web;

use yatube::domain::{AccountServiceImpl, AuthoringService, FeedService, FollowService};
use yatube::inbound::http::state::HttpState;
use yatube::outbound::cache::InMemoryPageCache;
use yatube::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the handler state from the storage, image and cache adapters in
/// `config`. One authoring service serves both post and comment commands.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let storage = config.storage.clone();
    let authoring = Arc::new(AuthoringService::new(
        storage.clone(),
        config.images.clone(),
        config.clock.clone(),
    ));
    let accounts = AccountServiceImpl::new(
        storage.users.clone(),
        Arc::new(Argon2PasswordHasher),
        config.clock.clone(),
    );
    let page_cache = InMemoryPageCache::new(config.clock.clone(), config.cache_ttl);

    web::Data::new(HttpState {
        feeds: Arc::new(FeedService::new(storage.clone())),
        posts: authoring.clone(),
        comments: authoring,
        follows: Arc::new(FollowService::new(storage)),
        accounts: Arc::new(accounts),
        page_cache: Arc::new(page_cache),
    })
}
