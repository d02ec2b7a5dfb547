#![forbid(unsafe_code)]

//! Runtime configuration for windows and their controllers.
//!
//! Values come from the builder methods or from the environment:
//!
//! | Variable             | Meaning                               | Default          |
//! |----------------------|---------------------------------------|------------------|
//! | `WCTL_LOCALE`        | Default locale for fallback messages  | `LC_ALL`/`LANG`  |
//! | `WCTL_HISTORY_LIMIT` | Browser history entries kept per window | `64`           |
//! | `WCTL_ACTIVITY_LOG`  | Emit `wctl::activity` events (`1`/`0`) | `1`             |

use std::fmt;

use crate::locale::{Locale, detect_system_locale_from, normalize_locale};

const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be interpreted.
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Window-level runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Locale used when a controller never captured one.
    pub default_locale: Locale,
    /// Maximum number of back-navigation entries a window keeps.
    pub history_limit: usize,
    /// Whether controllers emit activity log events.
    pub activity_log: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_locale: crate::locale::detect_system_locale(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            activity_log: true,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with the system locale.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default locale (normalized; invalid tags fall back to `"en"`).
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl AsRef<str>) -> Self {
        self.default_locale = normalize_locale(locale.as_ref())
            .unwrap_or_else(|| crate::locale::DEFAULT_LOCALE.to_string());
        self
    }

    /// Set the history limit. Zero disables back navigation.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Enable or disable activity logging.
    #[must_use]
    pub fn with_activity_log(mut self, enabled: bool) -> Self {
        self.activity_log = enabled;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_locale = match lookup("WCTL_LOCALE") {
            Some(raw) => normalize_locale(&raw).ok_or(ConfigError::InvalidValue {
                key: "WCTL_LOCALE",
                value: raw,
            })?,
            None => {
                let lc_all = lookup("LC_ALL");
                let lang = lookup("LANG");
                detect_system_locale_from(lc_all.as_deref(), lang.as_deref())
            }
        };

        let history_limit = match lookup("WCTL_HISTORY_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "WCTL_HISTORY_LIMIT",
                    value: raw,
                })?,
            None => DEFAULT_HISTORY_LIMIT,
        };

        let activity_log = match lookup("WCTL_ACTIVITY_LOG") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: "WCTL_ACTIVITY_LOG",
                value: raw,
            })?,
            None => true,
        };

        Ok(Self {
            default_locale,
            history_limit,
            activity_log,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}
