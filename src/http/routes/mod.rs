use axum::{Extension, Router, routing::get};
use std::{path::Path, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};

mod bundles;

pub use bundles::BundleDirectory;

/// Creates the router serving bundles from `bundle_dir` and every
/// other path from the static `site_root`
pub fn router(site_root: &Path, bundle_dir: &Path) -> Router {
    let bundles = Arc::new(BundleDirectory::new(bundle_dir));

    Router::new()
        .route("/i18n/{file}", get(bundles::get_bundle))
        .fallback_service(ServeDir::new(site_root))
        .layer(Extension(bundles))
        .layer(TraceLayer::new_for_http())
}
