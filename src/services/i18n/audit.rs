//! Coverage audit comparing bundles against the fallback bundle

use super::loader::BundleLoader;
use crate::definitions::{bundle::TranslationTree, key_path::KeyPath, language::Language};
use futures::future::join_all;
use log::{error, info, warn};
use std::collections::BTreeMap;

/// Keys present in the fallback bundle but missing from each language
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Total number of leaf keys in the fallback bundle
    pub total_keys: usize,
    /// Sorted missing key paths per language
    pub missing: BTreeMap<Language, Vec<String>>,
}

impl CoverageReport {
    /// Whether every audited bundle covers every fallback key
    pub fn is_complete(&self) -> bool {
        self.missing.values().all(Vec::is_empty)
    }

    /// Percentage of fallback keys translated by `language`
    pub fn coverage(&self, language: Language) -> Option<f32> {
        let missing = self.missing.get(&language)?;
        if self.total_keys == 0 {
            return Some(100.0);
        }
        let present = self.total_keys.saturating_sub(missing.len());
        Some(present as f32 / self.total_keys as f32 * 100.0)
    }
}

/// Audits `bundles` against the `fallback` bundle, a key counts as
/// present when it resolves to a leaf in the audited bundle
pub fn audit<'a, I>(fallback: &TranslationTree, bundles: I) -> CoverageReport
where
    I: IntoIterator<Item = (Language, &'a TranslationTree)>,
{
    let mut keys = fallback.leaf_paths();
    keys.sort();

    let missing = bundles
        .into_iter()
        .map(|(language, bundle)| {
            let missing: Vec<String> = keys
                .iter()
                .filter(|key| bundle.resolve(&KeyPath::from(key.as_str())).is_none())
                .cloned()
                .collect();
            (language, missing)
        })
        .collect();

    CoverageReport {
        total_keys: keys.len(),
        missing,
    }
}

/// Loads every supported bundle into the loader cache and audits them
/// against the `fallback` bundle. Load failures are logged and skipped,
/// [None] when the fallback bundle itself cannot be loaded
pub async fn preload_and_audit(
    loader: &BundleLoader,
    fallback: Language,
) -> Option<CoverageReport> {
    let results = join_all(Language::all().map(|language| loader.load(language))).await;

    let mut loaded = 0;
    for result in results {
        match result {
            Ok(_) => loaded += 1,
            Err(err) => error!("{err}"),
        }
    }

    let cache = loader.cache();
    let Some(fallback_bundle) = cache.get(fallback) else {
        warn!("Fallback bundle {fallback} unavailable, skipping coverage audit");
        return None;
    };

    let others: Vec<_> = cache
        .languages()
        .into_iter()
        .filter(|language| *language != fallback)
        .filter_map(|language| cache.get(language).map(|bundle| (language, bundle)))
        .collect();

    let report = audit(
        &fallback_bundle,
        others
            .iter()
            .map(|(language, bundle)| (*language, &**bundle)),
    );

    info!(
        "Loaded {} bundle(s), {} key(s) in fallback {}",
        loaded,
        report.total_keys,
        fallback
    );

    for (language, missing) in &report.missing {
        if missing.is_empty() {
            continue;
        }
        warn!(
            "{} is missing {} key(s): {}",
            language,
            missing.len(),
            missing.join(", ")
        );
    }

    Some(report)
}
