//! Locale store: single source of truth for the active UI language.
//!
//! The store owns the only mutable, durable piece of state in the navigation
//! subsystem. `get` is always answered from memory; `set` validates,
//! persists, and notifies subscribers — in that order, synchronously, so a
//! resolution in progress never observes a half-committed locale change.

use crate::i18n::Locale;
use crate::storage::Storage;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Storage key holding the persisted locale code.
pub const LOCALE_STORAGE_KEY: &str = "locale";

type Listener = Arc<dyn Fn(Locale) + Send + Sync>;

struct Inner {
    current: Locale,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// Process-wide holder of the active locale.
///
/// Constructed once at startup and injected wherever the current locale is
/// needed; tests build an isolated store per case instead of sharing a
/// global.
pub struct LocaleStore {
    inner: Mutex<Inner>,
    storage: Arc<dyn Storage>,
}

/// Handle returned by [`LocaleStore::on_change`]; pass it back to
/// [`LocaleStore::unsubscribe`] to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

impl LocaleStore {
    /// Build a store, restoring the persisted locale if a valid one exists.
    ///
    /// A missing or unsupported stored value silently coerces to the
    /// built-in fallback; the store never starts in an invalid state.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_default(storage, Locale::fallback())
    }

    /// Like [`new`](Self::new), with a configured default locale standing
    /// in for the built-in fallback when nothing valid is stored.
    pub fn with_default(storage: Arc<dyn Storage>, default: Locale) -> Self {
        let current = storage
            .read(LOCALE_STORAGE_KEY)
            .and_then(|code| Locale::from_code(&code))
            .unwrap_or(default);

        Self {
            inner: Mutex::new(Inner {
                current,
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
            storage,
        }
    }

    /// The active locale. Never fails, never blocks on I/O.
    pub fn get(&self) -> Locale {
        self.inner.lock().expect("locale store mutex poisoned").current
    }

    /// Validate `candidate` and, if it names a supported locale that differs
    /// from the current one, commit it.
    ///
    /// Side effects of a committed change: the new code is written to
    /// storage (failures are logged and swallowed — the session continues
    /// in-memory) and listeners run synchronously in registration order.
    /// An unsupported candidate or a no-op set changes nothing and notifies
    /// nobody.
    ///
    /// # Returns
    /// The locale in effect after the call.
    pub fn set(&self, candidate: &str) -> Locale {
        let Some(locale) = Locale::from_code(candidate) else {
            let current = self.get();
            debug!("ignoring unsupported locale candidate '{candidate}', staying on {current}");
            return current;
        };
        self.set_locale(locale)
    }

    /// Like [`set`](Self::set), for callers that already hold a `Locale`.
    pub fn set_locale(&self, locale: Locale) -> Locale {
        // Commit the change and snapshot the listeners under the lock, then
        // run the listeners outside it so they may call back into the store.
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock().expect("locale store mutex poisoned");
            if inner.current == locale {
                return locale;
            }
            inner.current = locale;
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        if let Err(err) = self.storage.write(LOCALE_STORAGE_KEY, locale.as_str()) {
            warn!("failed to persist locale '{locale}': {err}");
        }

        debug!("locale changed to {locale}");
        for listener in listeners {
            listener(locale);
        }
        locale
    }

    /// Register a callback invoked on every committed locale change.
    /// Listeners run in registration order.
    pub fn on_change(&self, listener: impl Fn(Locale) + Send + Sync + 'static) -> Subscription {
        let mut inner = self.inner.lock().expect("locale store mutex poisoned");
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Remove a previously registered listener. Unknown handles are ignored.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut inner = self.inner.lock().expect("locale store mutex poisoned");
        inner.listeners.retain(|(id, _)| *id != subscription.0);
    }
}
