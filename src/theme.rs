//! Visual theme state: a light/dark flag with the same store contract as
//! the locale store — persisted, observable, and impossible to put into an
//! invalid state.

use crate::storage::Storage;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Storage key holding the persisted theme mode.
pub const THEME_STORAGE_KEY: &str = "theme";

/// The two supported visual themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_code(code: &str) -> Option<ThemeMode> {
        match code {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub const fn toggled(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

type Listener = Arc<dyn Fn(ThemeMode) + Send + Sync>;

struct Inner {
    current: ThemeMode,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// Persisted holder of the active theme.
///
/// Initial value resolution, in order: a valid stored value, then the host
/// system's preference hint, then light.
pub struct ThemeStore {
    inner: Mutex<Inner>,
    storage: Arc<dyn Storage>,
}

impl ThemeStore {
    /// Build a store. `system_prefers_dark` is consulted only when no valid
    /// stored value exists, mirroring a `prefers-color-scheme` media query.
    pub fn new(storage: Arc<dyn Storage>, system_prefers_dark: bool) -> Self {
        let current = storage
            .read(THEME_STORAGE_KEY)
            .and_then(|code| ThemeMode::from_code(&code))
            .unwrap_or(if system_prefers_dark {
                ThemeMode::Dark
            } else {
                ThemeMode::Light
            });

        Self {
            inner: Mutex::new(Inner {
                current,
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
            storage,
        }
    }

    pub fn get(&self) -> ThemeMode {
        self.inner.lock().expect("theme store mutex poisoned").current
    }

    /// Commit `mode`, persisting it and notifying listeners in registration
    /// order. A no-op set notifies nobody. Persistence failures are logged
    /// and swallowed.
    pub fn set(&self, mode: ThemeMode) -> ThemeMode {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock().expect("theme store mutex poisoned");
            if inner.current == mode {
                return mode;
            }
            inner.current = mode;
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        if let Err(err) = self.storage.write(THEME_STORAGE_KEY, mode.as_str()) {
            warn!("failed to persist theme '{}': {err}", mode.as_str());
        }

        for listener in listeners {
            listener(mode);
        }
        mode
    }

    /// Flip between light and dark.
    pub fn toggle(&self) -> ThemeMode {
        self.set(self.get().toggled())
    }

    /// Register a callback invoked on every committed theme change.
    pub fn on_change(&self, listener: impl Fn(ThemeMode) + Send + Sync + 'static) -> u64 {
        let mut inner = self.inner.lock().expect("theme store mutex poisoned");
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock().expect("theme store mutex poisoned");
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    // ==================== Initial Value Tests ====================

    #[test]
    fn test_defaults_to_light() {
        let store = ThemeStore::new(MemoryStorage::shared(), false);
        assert_eq!(store.get(), ThemeMode::Light);
    }

    #[test]
    fn test_system_preference_used_without_stored_value() {
        let store = ThemeStore::new(MemoryStorage::shared(), true);
        assert_eq!(store.get(), ThemeMode::Dark);
    }

    #[test]
    fn test_stored_value_beats_system_preference() {
        let storage = MemoryStorage::shared();
        storage.write(THEME_STORAGE_KEY, "light").expect("write");
        let store = ThemeStore::new(storage, true);
        assert_eq!(store.get(), ThemeMode::Light);
    }

    #[test]
    fn test_invalid_stored_value_falls_through() {
        let storage = MemoryStorage::shared();
        storage.write(THEME_STORAGE_KEY, "sepia").expect("write");
        let store = ThemeStore::new(storage, true);
        assert_eq!(store.get(), ThemeMode::Dark);
    }

    // ==================== Toggle / Persist Tests ====================

    #[test]
    fn test_toggle_flips_and_persists() {
        let storage = MemoryStorage::shared();
        let store = ThemeStore::new(Arc::clone(&storage), false);

        assert_eq!(store.toggle(), ThemeMode::Dark);
        assert_eq!(storage.read(THEME_STORAGE_KEY), Some("dark".to_string()));
        assert_eq!(store.toggle(), ThemeMode::Light);
        assert_eq!(storage.read(THEME_STORAGE_KEY), Some("light".to_string()));
    }

    // ==================== Listener Tests ====================

    #[test]
    fn test_listener_fires_on_change_only() {
        let store = ThemeStore::new(MemoryStorage::shared(), false);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        store.on_change(move |mode| seen_clone.lock().unwrap().push(mode));

        store.set(ThemeMode::Light); // no-op
        store.set(ThemeMode::Dark);
        assert_eq!(*seen.lock().unwrap(), vec![ThemeMode::Dark]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = ThemeStore::new(MemoryStorage::shared(), false);
        let count = Arc::new(Mutex::new(0usize));

        let count_clone = Arc::clone(&count);
        let id = store.on_change(move |_| *count_clone.lock().unwrap() += 1);

        store.toggle();
        store.unsubscribe(id);
        store.toggle();
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
