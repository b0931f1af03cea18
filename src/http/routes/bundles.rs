use crate::{
    definitions::{
        bundle::{ParseError, TranslationTree},
        language::Language,
    },
    http::models::{DynHttpError, HttpError},
    services::i18n::FsBundleSource,
};
use axum::{
    Extension,
    extract::Path,
    response::{IntoResponse, Response},
};
use hyper::{StatusCode, header::CONTENT_TYPE};
use log::warn;
use std::{io::ErrorKind, path::PathBuf, sync::Arc};
use thiserror::Error;

/// Directory the served bundles are read from
pub struct BundleDirectory {
    source: FsBundleSource,
}

impl BundleDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: FsBundleSource::new(dir),
        }
    }
}

/// Errors that can occur while serving a bundle
#[derive(Debug, Error)]
pub enum BundleError {
    /// File name does not name a supported language bundle
    #[error("Unknown language bundle")]
    UnknownLanguage,
    /// Supported language without a bundle on disk
    #[error("Bundle not found")]
    Missing,
    #[error("Failed to read bundle")]
    Read(#[source] std::io::Error),
    /// Bundle on disk is malformed and would fail to load
    #[error("Malformed bundle")]
    Malformed(#[source] ParseError),
}

impl HttpError for BundleError {
    fn log(&self) {
        match self {
            BundleError::UnknownLanguage | BundleError::Missing => {}
            BundleError::Read(err) => warn!("{self}: {err}"),
            BundleError::Malformed(err) => warn!("{self}: {err}"),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BundleError::UnknownLanguage | BundleError::Missing => StatusCode::NOT_FOUND,
            BundleError::Read(_) | BundleError::Malformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Parses the requested file name, only the exact `<code>.json` form of a
/// supported language is accepted
fn bundle_language(file: &str) -> Option<Language> {
    let code = file.strip_suffix(".json")?;
    let language = Language::parse_code(code)?;
    (language.code() == code).then_some(language)
}

/// GET /i18n/{code}.json
pub async fn get_bundle(
    Path(file): Path<String>,
    Extension(bundles): Extension<Arc<BundleDirectory>>,
) -> Result<Response, DynHttpError> {
    let language = bundle_language(&file).ok_or(BundleError::UnknownLanguage)?;

    let path = bundles.source.bundle_path(language);
    let document = match tokio::fs::read_to_string(&path).await {
        Ok(value) => value,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(BundleError::Missing.into()),
        Err(err) => return Err(BundleError::Read(err).into()),
    };

    // Malformed bundles are refused so clients take their load failure path
    TranslationTree::parse(&document).map_err(BundleError::Malformed)?;

    Ok(([(CONTENT_TYPE, "application/json")], document).into_response())
}
