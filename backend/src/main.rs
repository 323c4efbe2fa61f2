//! Backend entry-point: loads settings, picks adapters and serves the site.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use yatube::domain::ports::StoragePorts;
use yatube::inbound::http::AdminToken;
use yatube::inbound::http::session_config::{BuildMode, session_settings_from_env};
use yatube::outbound::media::MediaImageStore;
use yatube::outbound::memory::{InMemoryStore, memory_storage};
use yatube::outbound::persistence::{DbPool, PoolConfig, diesel_storage, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))?;

    let storage = build_storage(&settings).await?;
    let images = MediaImageStore::open(&settings.media_root())?;
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
        storage,
        Arc::new(images),
    )
    .with_cache_ttl(settings.cache_ttl())
    .with_admin_token(settings.admin_token().map(AdminToken::new));

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    info!(addr = %settings.bind_addr(), "starting yatube");
    create_server(config)?.await
}

/// Diesel repositories when a database is configured, otherwise a fresh
/// in-memory store.
async fn build_storage(settings: &AppSettings) -> std::io::Result<StoragePorts> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("no database configured; data will not survive a restart");
        return Ok(memory_storage(Arc::new(InMemoryStore::new())));
    };
    run_pending_migrations(url)
        .await
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(|e| std::io::Error::other(e.into_message()))?;
    Ok(diesel_storage(pool))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("yatube")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
