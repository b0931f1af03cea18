//! Fetching and parsing of translation bundles
//!
//! Bundles live at a location derived from the language code
//! (`<base>/<code>.json`), either on disk or behind an HTTP server.

use super::cache::BundleCache;
use crate::definitions::{
    bundle::{ParseError, TranslationTree},
    language::Language,
};
use futures::future::BoxFuture;
use log::debug;
use reqwest::{StatusCode, Url};
use std::{path::PathBuf, sync::Arc, time::Duration};
use thiserror::Error;

/// Source that serialized bundle documents are retrieved from
pub trait BundleSource: Send + Sync {
    /// Fetches the serialized bundle document for `language`
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<String, FetchError>>;
}

/// Errors that can occur while fetching a bundle document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Server responded with a non success status
    #[error("Unexpected response status: {0}")]
    Status(StatusCode),
}

/// Reason a bundle failed to load
#[derive(Debug, Error)]
pub enum LoadErrorCause {
    #[error("Failed to fetch bundle: {0}")]
    Fetch(#[from] FetchError),
    #[error("Malformed bundle: {0}")]
    Parse(#[from] ParseError),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure loading the bundle for a specific language
#[derive(Debug, Error)]
#[error("Failed to load {language} bundle: {cause}")]
pub struct LoadError {
    pub language: Language,
    pub cause: LoadErrorCause,
}

/// Loads bundles from a directory on disk
pub struct FsBundleSource {
    dir: PathBuf,
}

impl FsBundleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the bundle document for `language`
    pub fn bundle_path(&self, language: Language) -> PathBuf {
        self.dir.join(format!("{}.json", language.code()))
    }
}

impl BundleSource for FsBundleSource {
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<String, FetchError>> {
        let path = self.bundle_path(language);
        Box::pin(async move { Ok(tokio::fs::read_to_string(path).await?) })
    }
}

/// Loads bundles from an HTTP server
pub struct HttpBundleSource {
    client: reqwest::Client,
    /// Base URL the `<code>.json` documents are relative to
    base: Url,
}

impl HttpBundleSource {
    /// Creates a new HTTP source, [None] if the `base` URL
    /// cannot have path segments
    pub fn new(client: reqwest::Client, base: Url) -> Option<Self> {
        if base.cannot_be_a_base() {
            return None;
        }
        Some(Self { client, base })
    }

    /// URL of the bundle document for `language`
    pub fn bundle_url(&self, language: Language) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("{}.json", language.code()));
        }
        url
    }
}

impl BundleSource for HttpBundleSource {
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<String, FetchError>> {
        let url = self.bundle_url(language);
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }
            Ok(response.text().await?)
        })
    }
}

/// Fetches, parses and caches bundles.
///
/// The loader always fetches, checking the cache before loading is
/// the responsibility of the caller. A failed load never touches the
/// cache and never substitutes another language.
pub struct BundleLoader {
    source: Arc<dyn BundleSource>,
    cache: Arc<BundleCache>,
    /// Maximum time a single fetch may take
    timeout: Duration,
}

impl BundleLoader {
    pub fn new(source: Arc<dyn BundleSource>, cache: Arc<BundleCache>, timeout: Duration) -> Self {
        Self {
            source,
            cache,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<BundleCache> {
        &self.cache
    }

    /// Loads the bundle for `language` storing it in the cache on success
    pub async fn load(&self, language: Language) -> Result<Arc<TranslationTree>, LoadError> {
        let tree = self
            .fetch_and_parse(language)
            .await
            .map_err(|cause| LoadError { language, cause })?;

        let tree = Arc::new(tree);
        self.cache.insert(language, tree.clone());

        debug!("Loaded {} translation bundle", language);
        Ok(tree)
    }

    async fn fetch_and_parse(&self, language: Language) -> Result<TranslationTree, LoadErrorCause> {
        let document = tokio::time::timeout(self.timeout, self.source.fetch(language))
            .await
            .map_err(|_| LoadErrorCause::Timeout(self.timeout))??;

        let tree = TranslationTree::parse(&document)?;
        Ok(tree)
    }
}
