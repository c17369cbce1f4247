//! Locale type: the closed set of languages the UI can render in.
//!
//! The supported set is fixed at compile time. Every other part of the crate
//! works with `Locale` values, so an unsupported code can only exist at the
//! boundary (URL segments, query strings, stored values) and is coerced or
//! rejected there.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported UI language.
///
/// `Zh` is the fallback: any missing or invalid locale value coerces to it
/// before reaching the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    Zh,
    En,
    Ja,
    Ko,
}

/// All supported locales, in display order.
pub const SUPPORTED_LOCALES: [Locale; 4] = [Locale::Zh, Locale::En, Locale::Ja, Locale::Ko];

impl Locale {
    /// The locale used when nothing valid is stored or requested.
    pub const fn fallback() -> Locale {
        Locale::Zh
    }

    /// Parse a language code (e.g. a URL segment or stored value).
    ///
    /// # Returns
    /// * `Some(Locale)` for a supported code
    /// * `None` for anything else — the caller coerces or redirects
    pub fn from_code(code: &str) -> Option<Locale> {
        match code {
            "zh" => Some(Locale::Zh),
            "en" => Some(Locale::En),
            "ja" => Some(Locale::Ja),
            "ko" => Some(Locale::Ko),
            _ => None,
        }
    }

    /// Parse a code, coercing unsupported values to the fallback.
    pub fn from_code_or_fallback(code: &str) -> Locale {
        Self::from_code(code).unwrap_or_else(Locale::fallback)
    }

    /// The ISO 639-1 code used in URLs and storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
            Locale::Ja => "ja",
            Locale::Ko => "ko",
        }
    }

    /// The language name in its own script, for a language picker.
    pub const fn native_name(&self) -> &'static str {
        match self {
            Locale::Zh => "中文",
            Locale::En => "English",
            Locale::Ja => "日本語",
            Locale::Ko => "한국어",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> String {
        locale.as_str().to_string()
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::from_code(&value).ok_or_else(|| format!("unsupported locale code: '{value}'"))
    }
}
