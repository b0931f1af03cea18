//! Development server for the static site and its translation bundles

use crate::config::Config;
use log::{error, info};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};

pub mod models;
pub mod routes;

/// Binds the HTTP server to the configured address and serves until
/// Ctrl-C is received
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let router = routes::router(&config.site_root, &config.i18n.bundle_dir);

    let listener = match TcpListener::bind(addr).await {
        Ok(value) => value,
        Err(err) => {
            error!("Failed to bind HTTP server on {}: {:?}", addr, err);
            return Err(err.into());
        }
    };

    info!("Serving {} on http://{}", config.site_root.display(), addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            _ = signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
