//! Process wide store of parsed translation bundles

use crate::definitions::{bundle::TranslationTree, language::Language};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// Append only cache of loaded bundles keyed by language.
///
/// Entries are never evicted, the number of entries is bounded by the
/// supported language set. Overwriting an existing entry with a freshly
/// loaded copy of the same bundle is harmless.
#[derive(Default)]
pub struct BundleCache {
    /// Bundles are immutable once loaded so readers share them through [Arc]
    bundles: RwLock<HashMap<Language, Arc<TranslationTree>>>,
}

impl BundleCache {
    pub fn get(&self, language: Language) -> Option<Arc<TranslationTree>> {
        self.bundles.read().get(&language).cloned()
    }

    pub fn contains(&self, language: Language) -> bool {
        self.bundles.read().contains_key(&language)
    }

    pub fn insert(&self, language: Language, bundle: Arc<TranslationTree>) {
        self.bundles.write().insert(language, bundle);
    }

    /// Obtains the total count of cached bundles
    pub fn len(&self) -> usize {
        self.bundles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.read().is_empty()
    }

    /// Languages that currently have a cached bundle, sorted
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.bundles.read().keys().copied().collect();
        languages.sort();
        languages
    }
}
