use std::io;

use mediadesk_config::ServerConfig;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=warn,sqlx=warn";

/// Install the global subscriber. Runs before configuration is loaded so the
/// loader's own events are kept; a second call is a no-op.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Bind the configured host and port. Hostnames are resolved and IPv6
/// literals (with or without brackets) are accepted.
pub async fn bind_listener(server: &ServerConfig) -> io::Result<TcpListener> {
    let host = server
        .host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(&server.host);
    TcpListener::bind((host, server.port)).await
}
