#![forbid(unsafe_code)]

//! Translation lookup for framework-owned messages.
//!
//! The runtime only renders one message on its own: the notice shown in place
//! of a disposed controller. [`Catalog`] ships that message for a few locales
//! and accepts additional bundles at startup.
//!
//! # Lookup order
//!
//! 1. The requested locale and its [`fallback_chain`] (`de-CH` -> `de`).
//! 2. The catalog default locale and its fallback chain.
//! 3. The key itself.

use std::collections::HashMap;
use std::fmt;

use crate::locale::{Locale, fallback_chain, normalize_locale};

/// Catalog key of the "view no longer active" notice.
pub const DISPOSED_MESSAGE_KEY: &str = "controller.disposed";

const BUILTIN: &[(&str, &str)] = &[
    (
        "en",
        "This view is no longer active. Please close it or use the navigation to continue.",
    ),
    (
        "de",
        "Diese Ansicht ist nicht mehr aktiv. Bitte schliessen Sie sie oder navigieren Sie weiter.",
    ),
    (
        "fr",
        "Cette vue n'est plus active. Veuillez la fermer ou utiliser la navigation.",
    ),
    (
        "it",
        "Questa vista non è più attiva. Chiudetela o usate la navigazione.",
    ),
];

/// Errors raised while populating a [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The locale tag was empty after normalization.
    InvalidLocale(String),
    /// A bundle document could not be parsed.
    #[cfg(feature = "catalog-json")]
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::InvalidLocale(raw) => write!(f, "invalid locale tag: {raw:?}"),
            #[cfg(feature = "catalog-json")]
            CatalogError::Parse(msg) => write!(f, "bundle parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Resolves message keys for a locale.
pub trait Translator: Send + Sync {
    /// Locale used when the caller has none.
    fn default_locale(&self) -> Locale;

    /// Look up `key` for exactly this locale chain, without default fallback.
    fn lookup(&self, locale: &str, key: &str) -> Option<String>;

    /// Resolve `key`, falling back to the default locale and finally the key.
    fn translate(&self, locale: Option<&str>, key: &str) -> String {
        let default_locale = self.default_locale();
        locale
            .and_then(|locale| self.lookup(locale, key))
            .or_else(|| self.lookup(&default_locale, key))
            .unwrap_or_else(|| key.to_string())
    }
}

/// In-memory translation bundles keyed by normalized locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_locale: Locale,
    bundles: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// Empty catalog. `default_locale` is normalized, falling back to `"en"`.
    #[must_use]
    pub fn new(default_locale: impl AsRef<str>) -> Self {
        Self {
            default_locale: normalize_locale(default_locale.as_ref())
                .unwrap_or_else(|| crate::locale::DEFAULT_LOCALE.to_string()),
            bundles: HashMap::new(),
        }
    }

    /// Catalog pre-populated with the runtime's own messages.
    #[must_use]
    pub fn with_builtin(default_locale: impl AsRef<str>) -> Self {
        let mut catalog = Self::new(default_locale);
        for (locale, text) in BUILTIN {
            catalog
                .bundles
                .entry((*locale).to_string())
                .or_default()
                .insert(DISPOSED_MESSAGE_KEY.to_string(), (*text).to_string());
        }
        catalog
    }

    /// Add or replace one entry.
    pub fn insert(
        &mut self,
        locale: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let locale =
            normalize_locale(locale).ok_or_else(|| CatalogError::InvalidLocale(locale.into()))?;
        self.bundles
            .entry(locale)
            .or_default()
            .insert(key.into(), text.into());
        Ok(())
    }

    /// Builder form of [`Catalog::insert`].
    pub fn with_entry(
        mut self,
        locale: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        self.insert(locale, key, text)?;
        Ok(self)
    }

    /// Merge a flat JSON object (`{"key": "text"}`) into the bundle for
    /// `locale`. Returns the number of entries loaded.
    #[cfg(feature = "catalog-json")]
    pub fn load_json(&mut self, locale: &str, json: &str) -> Result<usize, CatalogError> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        let count = entries.len();
        for (key, text) in entries {
            self.insert(locale, key, text)?;
        }
        tracing::debug!(locale, count, "translation bundle loaded");
        Ok(count)
    }

    /// Locales with at least one entry.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_builtin(crate::locale::detect_system_locale())
    }
}

impl Translator for Catalog {
    fn default_locale(&self) -> Locale {
        self.default_locale.clone()
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<String> {
        let locale = normalize_locale(locale)?;
        fallback_chain(&locale).iter().find_map(|candidate| {
            self.bundles
                .get(candidate)
                .and_then(|bundle| bundle.get(key))
                .cloned()
        })
    }
}
