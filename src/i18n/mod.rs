//! Internationalization: the supported-locale set and the locale store.
//!
//! - `locale`: the closed `Locale` type every other module works with
//! - `store`: the injected, persisted holder of the active locale
//!
//! Translation bundle loading lives in `crate::translation`; it subscribes
//! to the store rather than being part of it, so routing never waits on
//! text resources.

mod locale;
mod store;

pub use locale::{Locale, SUPPORTED_LOCALES};
pub use store::{LocaleStore, Subscription, LOCALE_STORAGE_KEY};
