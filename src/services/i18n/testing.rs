//! In-memory fakes shared by the translation tests

use super::loader::{BundleSource, FetchError};
use crate::definitions::language::Language;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

/// Bundle source serving documents from memory, records every fetch
#[derive(Default)]
pub struct MapBundleSource {
    documents: HashMap<Language, String>,
    delays: HashMap<Language, Duration>,
    hanging: HashSet<Language>,
    fetches: Mutex<Vec<Language>>,
}

impl MapBundleSource {
    pub fn with(mut self, language: Language, document: &str) -> Self {
        self.documents.insert(language, document.to_string());
        self
    }

    /// Delays every fetch of `language` by `delay`
    pub fn delayed(mut self, language: Language, delay: Duration) -> Self {
        self.delays.insert(language, delay);
        self
    }

    /// Fetches of `language` never complete
    pub fn hanging(mut self, language: Language) -> Self {
        self.hanging.insert(language);
        self
    }

    pub fn fetch_count(&self, language: Language) -> usize {
        self.fetches
            .lock()
            .iter()
            .filter(|value| **value == language)
            .count()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().len()
    }
}

impl BundleSource for MapBundleSource {
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<String, FetchError>> {
        self.fetches.lock().push(language);

        Box::pin(async move {
            if self.hanging.contains(&language) {
                futures::future::pending::<()>().await;
            }

            if let Some(delay) = self.delays.get(&language) {
                tokio::time::sleep(*delay).await;
            }

            self.documents
                .get(&language)
                .cloned()
                .ok_or(FetchError::Status(StatusCode::NOT_FOUND))
        })
    }
}
