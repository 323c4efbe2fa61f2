//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::{Clock, DefaultClock};
use yatube::domain::ports::{ImageStore, StoragePorts};
use yatube::inbound::http::AdminToken;
use yatube::outbound::cache::DEFAULT_PAGE_TTL;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: StoragePorts,
    pub(crate) images: Arc<dyn ImageStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) cache_ttl: Duration,
    pub(crate) admin_token: Option<AdminToken>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration around the chosen adapters.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        storage: StoragePorts,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage,
            images,
            clock: Arc::new(DefaultClock),
            cache_ttl: DEFAULT_PAGE_TTL,
            admin_token: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Replace the wall clock used for timestamps and cache expiry.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Integration tests inject a controllable clock")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Mount the cache-clear endpoint guarded by `token`.
    #[must_use]
    pub fn with_admin_token(mut self, token: Option<AdminToken>) -> Self {
        self.admin_token = token;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
