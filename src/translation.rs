//! Translation bundle loading and lookup.
//!
//! Bundles live behind HTTP at `{base}/locales/{lng}/translation.json`,
//! one JSON document per locale. The loader caches parsed bundles and is
//! triggered from a locale store listener; routing never waits on it, so a
//! page may briefly render in the previous language while the new bundle
//! loads. A failed fetch degrades to the fallback bundle (or the key
//! itself) and is logged, never surfaced.

use crate::i18n::{Locale, LocaleStore};
use crate::retry::{with_retry_if, RetryConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

type Bundle = HashMap<String, String>;

/// Loads, caches, and serves per-locale translation bundles.
pub struct TranslationLoader {
    http: reqwest::Client,
    base_url: String,
    bundles: Mutex<HashMap<Locale, Bundle>>,
}

impl TranslationLoader {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            bundles: Mutex::new(HashMap::new()),
        }
    }

    fn bundle_url(&self, locale: Locale) -> String {
        format!(
            "{}/locales/{}/translation.json",
            self.base_url.trim_end_matches('/'),
            locale
        )
    }

    /// Fetch and cache the bundle for `locale` unless already cached.
    ///
    /// Failures are logged and leave the cache untouched; lookups then fall
    /// back per [`translate`](Self::translate).
    pub async fn ensure_loaded(&self, locale: Locale) {
        if self.is_loaded(locale) {
            return;
        }

        let url = self.bundle_url(locale);
        let result = with_retry_if(
            &RetryConfig::bundle_fetch(),
            "translation bundle fetch",
            |err: &reqwest::Error| err.is_timeout() || err.is_connect(),
            || async {
                self.http
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<serde_json::Value>()
                    .await
            },
        )
        .await;

        match result {
            Ok(document) => {
                let bundle = flatten(&document);
                debug!("loaded {} translation keys for {locale}", bundle.len());
                self.bundles
                    .lock()
                    .expect("translation cache mutex poisoned")
                    .insert(locale, bundle);
            }
            Err(err) => {
                warn!("failed to load translation bundle for {locale}: {err}");
            }
        }
    }

    /// Whether a bundle for `locale` is in the cache.
    pub fn is_loaded(&self, locale: Locale) -> bool {
        self.bundles
            .lock()
            .expect("translation cache mutex poisoned")
            .contains_key(&locale)
    }

    /// Look up `key` for `locale`.
    ///
    /// Fallback chain: the locale's bundle, then the fallback locale's
    /// bundle, then the key itself.
    pub fn translate(&self, locale: Locale, key: &str) -> String {
        let bundles = self.bundles.lock().expect("translation cache mutex poisoned");
        bundles
            .get(&locale)
            .and_then(|bundle| bundle.get(key))
            .or_else(|| {
                bundles
                    .get(&Locale::fallback())
                    .and_then(|bundle| bundle.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Subscribe `loader` to locale changes, spawning a background load for
/// each newly selected locale. Requires a running tokio runtime.
pub fn reload_on_locale_change(loader: Arc<TranslationLoader>, store: &LocaleStore) {
    store.on_change(move |locale| {
        let loader = Arc::clone(&loader);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    loader.ensure_loaded(locale).await;
                });
            }
            // A locale change from a non-async context keeps working; the
            // bundle just loads on the next explicit ensure_loaded call.
            Err(_) => warn!("no async runtime; deferring bundle load for {locale}"),
        }
    });
}

/// Flatten a nested JSON document into dot-separated string keys, the way
/// i18next-style bundles address nested sections (`"nav.home"`).
fn flatten(document: &serde_json::Value) -> Bundle {
    let mut bundle = Bundle::new();
    flatten_into(&mut bundle, "", document);
    bundle
}

fn flatten_into(bundle: &mut Bundle, prefix: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(bundle, &full_key, child);
            }
        }
        serde_json::Value::String(text) => {
            bundle.insert(prefix.to_string(), text.clone());
        }
        // Non-string leaves (numbers, bools, arrays) are not translations.
        _ => {}
    }
}
