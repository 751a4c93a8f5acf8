//! Translations and the catalog that negotiates between them.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::parse_accept_language;

/// The locale reported whenever negotiation falls back to the default.
pub const DEFAULT_LOCALE: &str = "en-us";

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// A set of UI strings for one language, keyed by message id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    strings: BTreeMap<String, String>,
}

impl Translation {
    /// Creates an empty translation.
    pub fn new() -> Self {
        Self {
            strings: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) one string. Builder-style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }

    /// Looks up a string by message id.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if there are no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// LocaleResolution
// ---------------------------------------------------------------------------

/// The outcome of negotiation: always a translation and its locale.
#[derive(Debug, Clone)]
pub struct LocaleResolution {
    /// The translation to render with.
    pub translation: Arc<Translation>,
    /// Canonical locale: the matched identifier, lowercased, or
    /// [`DEFAULT_LOCALE`].
    pub locale: String,
}

// ---------------------------------------------------------------------------
// TranslationCatalog
// ---------------------------------------------------------------------------

/// The known translations plus the fixed default.
///
/// Built once at startup and shared read-only afterwards, so negotiation
/// depends on nothing but the header.
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    known: HashMap<String, Arc<Translation>>,
    default: Arc<Translation>,
}

impl TranslationCatalog {
    /// Creates a catalog with only a default translation.
    ///
    /// The default is not registered under any identifier; register it
    /// explicitly if `en-us` should also be matched by name.
    pub fn new(default: Translation) -> Self {
        Self {
            known: HashMap::new(),
            default: Arc::new(default),
        }
    }

    /// Registers a translation under a locale identifier. Builder-style.
    ///
    /// Identifiers are matched case-insensitively.
    pub fn register(mut self, locale: &str, translation: Translation) -> Self {
        self.known
            .insert(locale.to_ascii_lowercase(), Arc::new(translation));
        self
    }

    /// The catalog the server ships with: English (default, also
    /// registered as `en-us`) and German (`de-de`).
    pub fn builtin() -> Self {
        let english = english();
        Self::new(english.clone())
            .register(DEFAULT_LOCALE, english)
            .register("de-de", german())
    }

    /// Looks up a translation by exact (lowercased) identifier.
    pub fn get(&self, locale: &str) -> Option<Arc<Translation>> {
        self.known.get(&locale.to_ascii_lowercase()).cloned()
    }

    /// The fallback translation.
    pub fn default_translation(&self) -> Arc<Translation> {
        Arc::clone(&self.default)
    }

    /// Picks a translation for an `Accept-Language` header.
    ///
    /// Preferences are tried in order. For each one the full identifier
    /// is tried first (`de-at`), then its base language (`de`), before
    /// moving on to the next preference. The first hit wins.
    ///
    /// A missing, empty, or unparseable header, or one where nothing
    /// matches, yields the default translation with [`DEFAULT_LOCALE`].
    pub fn negotiate(&self, header: Option<&str>) -> LocaleResolution {
        let preferences = match header.map(parse_accept_language) {
            Some(Ok(preferences)) => preferences,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "unparseable Accept-Language, using default locale");
                Vec::new()
            }
            None => Vec::new(),
        };

        for preference in &preferences {
            for candidate in [&preference.tag, &preference.base] {
                if let Some(translation) = self.known.get(candidate.as_str()) {
                    return LocaleResolution {
                        translation: Arc::clone(translation),
                        locale: candidate.clone(),
                    };
                }
            }
        }

        LocaleResolution {
            translation: self.default_translation(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for TranslationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn english() -> Translation {
    Translation::new()
        .with("lobby-title", "Lobby")
        .with("players", "Players")
        .with("waiting-for-players", "Waiting for players...")
        .with("invite-link", "Invite your friends with this link")
        .with("connected", "connected")
        .with("not-connected", "not connected")
}

fn german() -> Translation {
    Translation::new()
        .with("lobby-title", "Lobby")
        .with("players", "Spieler")
        .with("waiting-for-players", "Warte auf Spieler...")
        .with("invite-link", "Lade deine Freunde mit diesem Link ein")
        .with("connected", "verbunden")
        .with("not-connected", "nicht verbunden")
}
