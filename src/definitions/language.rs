//! # Languages
//!
//! The closed set of languages the site ships translation bundles for.
//! Any code outside of this set is normalized to a configured default
//! at the boundary, nothing past the boundary deals with raw codes.

use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Supported language
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    SerializeDisplay,
    DeserializeFromStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    /// English
    En,
    /// German
    De,
    /// Spanish
    Es,
}

impl Language {
    /// Short code used for bundle file names, the URL query
    /// and the persisted preference
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    /// Iterator over every supported language
    pub fn all() -> impl Iterator<Item = Language> {
        Self::iter()
    }

    /// Parses a language code, empty and unsupported codes
    /// are [None]
    pub fn parse_code(raw: &str) -> Option<Language> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        raw.parse().ok()
    }
}

/// Primary subtag of a locale tag, `de` for both `de-AT` and `de_DE.UTF-8`
pub fn primary_subtag(tag: &str) -> &str {
    tag.trim()
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or_default()
}
