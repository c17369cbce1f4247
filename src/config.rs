use crate::i18n::Locale;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Backend API
    pub api_base_url: String,

    // Translation bundles
    pub locales_base_url: String,

    // Client storage
    pub storage_path: String,

    // Locale
    pub default_locale: Locale,

    // HTTP
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Backend API
            api_base_url: std::env::var("API_BASE_URL")
                .context("API_BASE_URL not set")?,

            // Translation bundles default to the API host
            locales_base_url: std::env::var("LOCALES_BASE_URL")
                .or_else(|_| std::env::var("API_BASE_URL"))
                .context("LOCALES_BASE_URL not set")?,

            // Client storage
            storage_path: std::env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "client-settings.json".to_string()),

            // Locale; an unsupported value here is a deployment typo, so it
            // coerces to the built-in fallback rather than failing startup
            default_locale: std::env::var("DEFAULT_LOCALE")
                .ok()
                .and_then(|code| Locale::from_code(&code))
                .unwrap_or_else(Locale::fallback),

            // HTTP
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "API_BASE_URL",
            "LOCALES_BASE_URL",
            "STORAGE_PATH",
            "DEFAULT_LOCALE",
            "REQUEST_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_with_defaults() {
        clear_env();
        std::env::set_var("API_BASE_URL", "http://api.example.com");

        let config = Config::from_env().expect("config");
        assert_eq!(config.api_base_url, "http://api.example.com");
        assert_eq!(config.locales_base_url, "http://api.example.com");
        assert_eq!(config.storage_path, "client-settings.json");
        assert_eq!(config.default_locale, Locale::fallback());
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_base_url() {
        clear_env();
        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("API_BASE_URL", "http://api.example.com");
        std::env::set_var("LOCALES_BASE_URL", "http://cdn.example.com");
        std::env::set_var("DEFAULT_LOCALE", "en");
        std::env::set_var("REQUEST_TIMEOUT_SECS", "30");

        let config = Config::from_env().expect("config");
        assert_eq!(config.locales_base_url, "http://cdn.example.com");
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_unsupported_default_locale_coerces() {
        clear_env();
        std::env::set_var("API_BASE_URL", "http://api.example.com");
        std::env::set_var("DEFAULT_LOCALE", "tlh");

        let config = Config::from_env().expect("config");
        assert_eq!(config.default_locale, Locale::fallback());
    }
}
