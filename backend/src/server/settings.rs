//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
    8080,
);
const DEFAULT_MEDIA_ROOT: &str = "media";

/// Runtime configuration, read from `YATUBE_*` variables, CLI flags or a
/// config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YATUBE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Without one, data lives in memory.
    pub database_url: Option<String>,
    /// Directory receiving uploaded images.
    pub media_root: Option<PathBuf>,
    /// Lifetime of the cached global feed, in seconds.
    #[ortho_config(default = 20)]
    pub cache_ttl_secs: u64,
    /// Token accepted by the cache-clear endpoint.
    pub admin_token: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// A blank token counts as unset.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
