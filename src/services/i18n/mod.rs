//! # Translations
//!
//! Loads per-language translation bundles, resolves binding key paths
//! against them with a fallback language and applies the results to a
//! page, keeping the active language in sync with the URL, the persisted
//! preference and the language selector controls.

use crate::config::I18nConfig;
use std::sync::Arc;

pub mod audit;
pub mod cache;
pub mod loader;
pub mod location;
pub mod page;
pub mod preferences;
pub mod selection;
#[cfg(test)]
mod testing;
pub mod translator;

pub use cache::BundleCache;
pub use loader::{BundleLoader, BundleSource, FsBundleSource, HttpBundleSource, LoadError};
pub use translator::{PassOutcome, PassState, ResolutionMiss, Translator};

/// Creates a loader reading bundles from the configured bundle directory
pub fn fs_loader(config: &I18nConfig, cache: Arc<BundleCache>) -> BundleLoader {
    let source = Arc::new(FsBundleSource::new(&config.bundle_dir));
    BundleLoader::new(source, cache, config.load_timeout)
}
