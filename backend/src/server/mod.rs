//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use yatube::Trace;
use yatube::inbound::http::state::HttpState;
use yatube::inbound::http::{self, AdminToken, error};

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    admin_token: Option<AdminToken>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
        admin_token,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .configure(|cfg| http::configure(cfg, admin_token))
        .default_service(web::to(error::not_found))
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        admin_token,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;
    let deps = AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
        admin_token,
    };

    #[cfg(feature = "metrics")]
    if let Some(prometheus) = prometheus {
        return Ok(
            HttpServer::new(move || build_app(deps.clone()).wrap(prometheus.clone()))
                .bind(bind_addr)?
                .run(),
        );
    }

    Ok(HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, Utc};
    use mockable::Clock;
    use rstest::rstest;
    use yatube::outbound::media::MediaImageStore;
    use yatube::outbound::memory::{InMemoryStore, memory_storage};

    struct FixedClock;

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<chrono::Local> {
            self.utc().with_timezone(&chrono::Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[rstest]
    fn builder_methods_override_defaults() {
        let media = tempfile::tempdir().expect("media dir");
        let images = MediaImageStore::open(media.path()).expect("media store");
        let bind_addr = SocketAddr::from(([127, 0, 0, 1], 0));

        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            bind_addr,
            memory_storage(Arc::new(InMemoryStore::new())),
            Arc::new(images),
        )
        .with_clock(Arc::new(FixedClock))
        .with_cache_ttl(Duration::from_secs(3))
        .with_admin_token(Some(AdminToken::new("tok")));

        assert_eq!(config.bind_addr(), bind_addr);
        assert_eq!(config.cache_ttl, Duration::from_secs(3));
        assert_eq!(config.clock.utc(), DateTime::<Utc>::UNIX_EPOCH);
        assert!(config.admin_token.is_some());
    }
}
