//! Translator that owns the active language and applies bundles to a page
//!
//! A translate pass moves through the following phases:
//!
//! ```text
//! Idle -> Loading(lang) -> Applying(lang) -> Idle
//! ```
//!
//! Passes never run their apply phase concurrently. Each pass takes a
//! ticket when it starts, a pass that finishes loading after a newer pass
//! was started is superseded and applies nothing, so the page always ends
//! up in the most recently requested language.

use super::{
    loader::{BundleLoader, LoadError},
    location::{Location, query_value, with_query_value},
    page::Page,
    preferences::PreferenceStore,
    selection::{LanguageRequest, select_language},
};
use crate::{
    config::I18nConfig,
    definitions::{bundle::TranslationTree, key_path::parse_binding, language::Language},
};
use log::{debug, error, info, warn};
use parking_lot::{Mutex, MutexGuard};
use std::{
    fmt::Display,
    sync::{Arc, Weak},
};
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

/// Phase of the pass currently owning the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Loading(Language),
    Applying(Language),
}

/// Outcome of a single translate pass
#[derive(Debug)]
pub enum PassOutcome {
    /// Requested language was already active and cached, nothing was done
    Unchanged,
    /// Bundle was applied to the page
    Applied {
        /// Language now active
        language: Language,
        /// Language originally requested, differs from `language` when
        /// the requested bundle failed to load
        requested: Language,
    },
    /// A newer pass started while this one was loading
    Superseded,
    /// Neither the requested nor the fallback bundle could be loaded,
    /// the page was left untouched
    Failed(LoadError),
}

/// Binding whose key path was missing from the active bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionMiss {
    /// Dotted key path that was missing
    pub key: String,
    /// Language the key was missing from
    pub language: Language,
    /// Fallback language that provided the value instead, [None]
    /// when the binding was left unresolved
    pub resolved_with: Option<Language>,
}

impl Display for ResolutionMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resolved_with {
            Some(fallback) => write!(
                f,
                "Missing translation '{}' for {} (Using {})",
                self.key, self.language, fallback
            ),
            None => write!(
                f,
                "Missing translation '{}' for {} (Unresolved)",
                self.key, self.language
            ),
        }
    }
}

/// State shared by passes, guarded by a single lock so that the
/// supersede check and the apply phase happen atomically
struct PassGuard {
    state: PassState,
    /// Ticket of the most recently started pass
    generation: u64,
    active: Option<Language>,
}

/// Resolves translations and applies them to a page
pub struct Translator<P, L> {
    config: I18nConfig,
    loader: BundleLoader,
    preferences: Arc<dyn PreferenceStore>,
    page: Mutex<P>,
    location: Mutex<L>,
    guard: Mutex<PassGuard>,
    diagnostics: Mutex<Vec<ResolutionMiss>>,
}

impl<P, L> Translator<P, L>
where
    P: Page,
    L: Location,
{
    pub fn new(
        config: I18nConfig,
        loader: BundleLoader,
        preferences: Arc<dyn PreferenceStore>,
        page: P,
        location: L,
    ) -> Self {
        Self {
            config,
            loader,
            preferences,
            page: Mutex::new(page),
            location: Mutex::new(location),
            guard: Mutex::new(PassGuard {
                state: PassState::Idle,
                generation: 0,
                active: None,
            }),
            diagnostics: Default::default(),
        }
    }

    /// Language of the last applied pass, [None] before the first pass
    pub fn active_language(&self) -> Option<Language> {
        self.guard.lock().active
    }

    pub fn fallback_language(&self) -> Language {
        self.config.fallback_language
    }

    pub fn state(&self) -> PassState {
        self.guard.lock().state
    }

    pub fn page(&self) -> MutexGuard<'_, P> {
        self.page.lock()
    }

    pub fn location(&self) -> MutexGuard<'_, L> {
        self.location.lock()
    }

    pub fn loader(&self) -> &BundleLoader {
        &self.loader
    }

    /// Misses recorded by every pass so far
    pub fn diagnostics(&self) -> Vec<ResolutionMiss> {
        self.diagnostics.lock().clone()
    }

    /// Takes the recorded misses, clearing them
    pub fn take_diagnostics(&self) -> Vec<ResolutionMiss> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    /// Selects the start-up language from the URL, the persisted preference
    /// and the client locale then runs the first translate pass
    pub async fn initialize(&self, client_locale: Option<&str>) -> PassOutcome {
        let url = self.location.lock().url();
        let url_code = query_value(&url, &self.config.query_param);
        let persisted = self.preferences.get(&self.config.preference_key);

        let request = LanguageRequest {
            url: url_code.as_deref(),
            persisted: persisted.as_deref(),
            client_locale,
        };
        let selection = select_language(&request, self.config.default_language);

        info!(
            "Starting in {} (Selected from {})",
            selection.language, selection.source
        );

        self.translate_page(selection.language).await
    }

    /// Activates `language` and applies it to the page, loading its bundle
    /// when it is not yet cached. A failed load is redirected once to the
    /// fallback language
    pub async fn translate_page(&self, language: Language) -> PassOutcome {
        let Some(ticket) = self.begin(language) else {
            debug!("{language} is already active, skipping translate pass");
            return PassOutcome::Unchanged;
        };

        let fallback = self.config.fallback_language;
        let mut target = language;

        let bundle = loop {
            if let Some(bundle) = self.loader.cache().get(target) {
                break bundle;
            }

            self.set_state(ticket, PassState::Loading(target));

            match self.loader.load(target).await {
                Ok(bundle) => break bundle,
                Err(err) if target != fallback => {
                    warn!("{err} (Falling back to {fallback})");
                    target = fallback;

                    // Redirected pass for an already active fallback is a no-op
                    if self.is_active_and_cached(ticket, target) {
                        self.finish(ticket);
                        return PassOutcome::Unchanged;
                    }
                }
                Err(err) => {
                    error!("{err}");
                    self.finish(ticket);
                    return PassOutcome::Failed(err);
                }
            }
        };

        // Fallback bundle must be present before applying, the apply phase
        // never suspends
        let fallback_bundle = if target != fallback {
            match self.loader.cache().get(fallback) {
                Some(bundle) => Some(bundle),
                None => {
                    self.set_state(ticket, PassState::Loading(fallback));
                    match self.loader.load(fallback).await {
                        Ok(bundle) => Some(bundle),
                        Err(err) => {
                            warn!("{err} (Missing keys will stay unresolved)");
                            None
                        }
                    }
                }
            }
        } else {
            None
        };

        let guard = &mut *self.guard.lock();
        if guard.generation != ticket {
            debug!("Translate pass for {target} superseded by a newer pass");
            return PassOutcome::Superseded;
        }

        guard.state = PassState::Applying(target);
        guard.active = Some(target);

        self.persist(target);
        self.apply(
            target,
            &bundle,
            fallback_bundle.as_deref().map(|bundle| (fallback, bundle)),
        );
        self.update_location(target);

        guard.state = PassState::Idle;

        PassOutcome::Applied {
            language: target,
            requested: language,
        }
    }

    /// Starts a new pass returning its ticket, [None] when `language` is
    /// already active and cached
    fn begin(&self, language: Language) -> Option<u64> {
        let guard = &mut *self.guard.lock();

        // Any new request supersedes passes still loading
        guard.generation += 1;

        if guard.active == Some(language) && self.loader.cache().contains(language) {
            guard.state = PassState::Idle;
            return None;
        }

        Some(guard.generation)
    }

    fn is_active_and_cached(&self, ticket: u64, language: Language) -> bool {
        let guard = self.guard.lock();
        guard.generation == ticket
            && guard.active == Some(language)
            && self.loader.cache().contains(language)
    }

    fn set_state(&self, ticket: u64, state: PassState) {
        let guard = &mut *self.guard.lock();
        if guard.generation == ticket {
            guard.state = state;
        }
    }

    fn finish(&self, ticket: u64) {
        self.set_state(ticket, PassState::Idle);
    }

    /// Persists the language preference, failures never block translation
    fn persist(&self, language: Language) {
        if let Err(err) = self
            .preferences
            .set(&self.config.preference_key, language.code())
        {
            warn!("Failed to persist language preference: {err}");
        }
    }

    /// Applies `bundle` to every binding on the page and updates the
    /// language selector controls
    fn apply(
        &self,
        language: Language,
        bundle: &TranslationTree,
        fallback: Option<(Language, &TranslationTree)>,
    ) {
        let page = &mut *self.page.lock();
        let bindings = page.scan(&self.config.binding_attribute);

        let mut misses = Vec::new();
        let mut applied = 0;

        for binding in &bindings {
            let (path, target) = parse_binding(&binding.binding);

            let value = match bundle.resolve(&path) {
                Some(value) => value,
                None => {
                    let resolved = fallback.and_then(|(fallback, bundle)| {
                        bundle.resolve(&path).map(|value| (fallback, value))
                    });

                    let miss = ResolutionMiss {
                        key: path.to_string(),
                        language,
                        resolved_with: resolved.map(|(fallback, _)| fallback),
                    };
                    warn!("{miss}");
                    misses.push(miss);

                    match resolved {
                        Some((_, value)) => value,
                        None => continue,
                    }
                }
            };

            let text = value.format();
            match target {
                Some(target) => page.set_attribute(binding.node, target.name(), &text),
                None => page.set_text(binding.node, &text),
            }
            applied += 1;
        }

        for selector in page.selectors(&self.config.selector_attribute) {
            let active = Language::parse_code(&selector.code) == Some(language);
            page.set_active(selector.node, &self.config.active_class, active);
        }

        debug!(
            "Applied {applied} of {} translation(s) for {language}",
            bindings.len()
        );

        if !misses.is_empty() {
            self.diagnostics.lock().extend(misses);
        }
    }

    /// Reflects the active language in the URL without navigating
    fn update_location(&self, language: Language) {
        let location = &mut *self.location.lock();
        let url = location.url();
        if query_value(&url, &self.config.query_param).as_deref() == Some(language.code()) {
            return;
        }
        location.replace(with_query_value(
            &url,
            &self.config.query_param,
            language.code(),
        ));
    }
}

impl<P, L> Translator<P, L>
where
    P: Page + 'static,
    L: Location + 'static,
{
    /// Spawns a task keeping this translator in sync with language
    /// changes made through the same preference store by other contexts.
    ///
    /// The task ends once the translator is dropped and another
    /// notification arrives
    pub fn spawn_preference_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.preferences.subscribe();
        let translator: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(value) => value,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Preference sync skipped {skipped} notification(s)");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let Some(translator) = translator.upgrade() else {
                    break;
                };

                if event.key != translator.config.preference_key {
                    continue;
                }

                let Some(language) = event.new_value.as_deref().and_then(Language::parse_code)
                else {
                    continue;
                };

                // Also drops the echo of this translator's own write
                if translator.active_language() == Some(language) {
                    continue;
                }

                debug!("Language preference changed elsewhere, switching to {language}");
                translator.translate_page(language).await;
            }
        })
    }
}
