//! Selection of the language a page starts in

use crate::definitions::language::{Language, primary_subtag};
use log::debug;
use strum::Display;

/// Candidate language codes gathered from each surface at start-up
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageRequest<'a> {
    /// Value of the language query parameter
    pub url: Option<&'a str>,
    /// Language stored in the preference store
    pub persisted: Option<&'a str>,
    /// Locale reported by the client, e.g. `de-AT`
    pub client_locale: Option<&'a str>,
}

/// Surface the selected language came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SelectionSource {
    Url,
    Preference,
    Locale,
    Default,
}

/// Result of selecting the start-up language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub language: Language,
    pub source: SelectionSource,
    /// The chosen code was unsupported and replaced with the default
    pub normalized: bool,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Picks the start-up language. The first non-empty candidate in the
/// order URL, preference, client locale wins and is then validated
/// against the supported set, unsupported codes become `default`
pub fn select_language(request: &LanguageRequest<'_>, default: Language) -> Selection {
    let candidate = non_empty(request.url)
        .map(|code| (code, SelectionSource::Url))
        .or_else(|| non_empty(request.persisted).map(|code| (code, SelectionSource::Preference)))
        .or_else(|| {
            non_empty(request.client_locale.map(primary_subtag))
                .map(|code| (code, SelectionSource::Locale))
        });

    let Some((code, source)) = candidate else {
        return Selection {
            language: default,
            source: SelectionSource::Default,
            normalized: false,
        };
    };

    match Language::parse_code(code) {
        Some(language) => Selection {
            language,
            source,
            normalized: false,
        },
        None => {
            debug!("Unsupported language '{code}' from {source}, using {default}");
            Selection {
                language: default,
                source,
                normalized: true,
            }
        }
    }
}
