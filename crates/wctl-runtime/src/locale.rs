#![forbid(unsafe_code)]

//! Locale detection, normalization and fallback chains.
//!
//! Controllers capture the locale of the first request they see. When a
//! controller is disposed before it ever saw a request, the fallback message
//! is rendered in the system default locale detected here.

use std::env;

pub use wctl_core::Locale;

/// Locale used when nothing else can be determined.
pub const DEFAULT_LOCALE: &str = "en";

/// Detect the system locale from environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Falls back to `"en"` when unknown.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_system_locale_from(lc_all.as_deref(), lang.as_deref())
}

pub(crate) fn detect_system_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    lc_all
        .and_then(normalize_locale)
        .or_else(|| lang.and_then(normalize_locale))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Normalize a raw locale string (`en_US.UTF-8@euro` -> `en-US`).
///
/// Returns `None` for empty input. `C` and `POSIX` map to `"en"`.
#[must_use]
pub fn normalize_locale(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some(DEFAULT_LOCALE.to_string());
    }
    Some(raw.replace('_', "-"))
}

/// Most specific first: `de-CH-1996` -> `["de-CH-1996", "de-CH", "de"]`.
#[must_use]
pub fn fallback_chain(locale: &str) -> Vec<Locale> {
    let mut chain = Vec::new();
    let mut current = locale;
    while !current.is_empty() {
        chain.push(current.to_string());
        match current.rfind('-') {
            Some(idx) => current = &current[..idx],
            None => break,
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Invariants:
    // 1. Normalized locales contain no '_' '.' or '@' suffixes.
    // 2. Fallback chains start with the input and end with the bare language.
    //
    // | Scenario                    | Expected Behavior      |
    // |-----------------------------|------------------------|
    // | Empty / whitespace locale   | None, detection -> "en"|
    // | "C"/"POSIX" locale          | Normalized to "en"     |

    #[test]
    fn detect_system_locale_prefers_lc_all() {
        let locale = detect_system_locale_from(Some("fr_FR.UTF-8"), Some("en_US.UTF-8"));
        assert_eq!(locale, "fr-FR");
    }

    #[test]
    fn detect_system_locale_uses_lang_when_lc_all_missing() {
        let locale = detect_system_locale_from(None, Some("de_CH.UTF-8"));
        assert_eq!(locale, "de-CH");
    }

    #[test]
    fn detect_system_locale_skips_blank_values() {
        let locale = detect_system_locale_from(Some("  "), None);
        assert_eq!(locale, "en");
    }

    #[test]
    fn normalize_handles_c_and_posix() {
        assert_eq!(normalize_locale("C").as_deref(), Some("en"));
        assert_eq!(normalize_locale("POSIX").as_deref(), Some("en"));
    }

    #[test]
    fn normalize_strips_codeset_and_modifier() {
        assert_eq!(normalize_locale("en_US.UTF-8@latin").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale(".UTF-8"), None);
    }

    #[test]
    fn fallback_chain_walks_to_language() {
        assert_eq!(fallback_chain("de-CH-1996"), vec!["de-CH-1996", "de-CH", "de"]);
        assert_eq!(fallback_chain("fr"), vec!["fr"]);
        assert!(fallback_chain("").is_empty());
    }

    proptest! {
        #[test]
        fn normalize_sanitizes_segments(raw in "[A-Za-z0-9_@.\\-]{1,32}") {
            if let Some(locale) = normalize_locale(&raw) {
                prop_assert!(!locale.trim().is_empty());
                prop_assert!(!locale.contains('@'));
                prop_assert!(!locale.contains('.'));
                prop_assert!(!locale.contains('_'));
            }
        }

        #[test]
        fn fallback_chain_is_prefix_ordered(locale in "[a-z]{2}(-[A-Z]{2})?(-[0-9]{4})?") {
            let chain = fallback_chain(&locale);
            prop_assert_eq!(chain.first(), Some(&locale));
            for pair in chain.windows(2) {
                prop_assert!(pair[0].starts_with(&pair[1]));
                prop_assert!(pair[0].len() > pair[1].len());
            }
            prop_assert!(!chain.last().unwrap().contains('-'));
        }
    }
}
