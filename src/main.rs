use log::{error, info};
use site_i18n::{
    VERSION,
    config::load_config,
    http,
    services::i18n::{BundleCache, audit::preload_and_audit, fs_loader},
    utils,
};
use std::{process::exit, sync::Arc};

#[tokio::main]
async fn main() {
    // Environment variables from a .env file are optional
    _ = dotenvy::dotenv();

    let config = load_config().unwrap_or_default();

    utils::logging::setup(config.logging);

    info!("Starting site-i18n v{VERSION}");

    // Surface broken or incomplete bundles before serving them
    let loader = fs_loader(&config.i18n, Arc::new(BundleCache::default()));
    let report = preload_and_audit(&loader, config.i18n.fallback_language).await;
    if report.is_some_and(|report| report.is_complete()) {
        info!("All bundles cover the fallback bundle");
    }

    if let Err(err) = http::start_server(&config).await {
        error!("Error while running server: {:?}", err);
        exit(1);
    }
}
