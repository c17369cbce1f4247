//! Navigation resolver: one decision per navigation event.
//!
//! Every URL change — initial load, link click, programmatic navigation,
//! back/forward — becomes a [`NavRequest`], and every request resolves to
//! exactly one [`Outcome`]: render a page in a locale, or replace the URL
//! with a canonical one. There is no error outcome; invalid input degrades
//! to a redirect and storage trouble degrades to in-memory state.
//!
//! Locale side effects are committed before the outcome is returned, so a
//! reentrant navigation event can never observe a half-updated locale.

use crate::i18n::{Locale, LocaleStore};
use crate::routing::matcher::{match_path, path_segments};
use crate::routing::page::Page;
use crate::routing::redirect::compute_redirect;
use crate::routing::table::{route_table, RouteTarget};
use std::sync::Arc;
use tracing::debug;

/// Query parameter allowing an explicit locale override (`?lang=en`).
pub const LANG_QUERY_KEY: &str = "lang";

/// One navigation attempt: the raw path plus its query string.
///
/// Created per URL change, consumed synchronously by
/// [`NavigationResolver::resolve`], then discarded.
#[derive(Debug, Clone)]
pub struct NavRequest {
    path: String,
    query: Option<String>,
}

impl NavRequest {
    /// Build a request from a path with no query string.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    /// Build a request from a full location string, splitting off the query
    /// at the first `?`.
    pub fn from_location(location: &str) -> Self {
        match location.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: Some(query.to_string()),
            },
            None => Self::new(location),
        }
    }

    /// The raw path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value of the `lang` query parameter, if present.
    fn lang_override(&self) -> Option<&str> {
        let query = self.query.as_deref()?;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == LANG_QUERY_KEY && !value.is_empty()).then_some(value)
        })
    }
}

/// The single output contract of the resolver: render or redirect, never
/// both, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Hand `{page, locale, params}` to the rendering layer.
    Render {
        page: Page,
        locale: Locale,
        params: Vec<String>,
    },
    /// Replace the current URL with `to` (no history entry) and let the
    /// navigation layer deliver a fresh request for it.
    Redirect { to: String },
}

/// Composes the route table, path matcher, and redirect policy around the
/// locale store.
pub struct NavigationResolver {
    locale_store: Arc<LocaleStore>,
}

impl NavigationResolver {
    pub fn new(locale_store: Arc<LocaleStore>) -> Self {
        Self { locale_store }
    }

    /// Resolve one navigation request.
    ///
    /// Side effects, in order, all before returning:
    /// 1. a valid `?lang=` override on a locale-less path is committed to
    ///    the locale store;
    /// 2. a valid locale segment in a rendering path is committed to the
    ///    locale store (a path locale always wins over the stored one);
    /// 3. for redirects, a recognized locale segment in the original path
    ///    is committed before the target is computed.
    pub fn resolve(&self, request: &NavRequest) -> Outcome {
        let path = request.path();

        // Query override only applies when the path carries no recognized
        // locale of its own; a path segment always wins.
        let path_has_locale = path_segments(path)
            .first()
            .and_then(|s| Locale::from_code(s))
            .is_some();
        if !path_has_locale {
            if let Some(code) = request.lang_override() {
                self.locale_store.set(code);
            }
        }

        let outcome = match match_path(path, route_table()) {
            Some(m) => match (m.target, m.lang) {
                (RouteTarget::Page(page), Some(code)) => match Locale::from_code(&code) {
                    Some(locale) => {
                        self.locale_store.set_locale(locale);
                        Outcome::Render {
                            page: *page,
                            locale,
                            params: m.params,
                        }
                    }
                    // A locale-shaped segment that is not a supported
                    // locale: never render under it.
                    None => self.redirect(path),
                },
                (RouteTarget::Page(page), None) => {
                    // No locale-less pattern currently renders, but the
                    // contract for one is fixed: locale-less paths redirect
                    // to their canonical form rather than rendering.
                    debug!("locale-less match for {page:?} at '{path}', redirecting");
                    self.redirect(path)
                }
                (RouteTarget::LocaleRedirect, _) => self.redirect(path),
            },
            None => self.redirect(path),
        };

        debug!("resolved '{path}' -> {outcome:?}");
        outcome
    }

    fn redirect(&self, path: &str) -> Outcome {
        // A recognized locale segment in the abandoned path still expresses
        // the user's language choice; commit it before computing the target
        // so the redirect and the store agree.
        if let Some(locale) = path_segments(path)
            .first()
            .and_then(|s| Locale::from_code(s))
        {
            self.locale_store.set_locale(locale);
        }

        Outcome::Redirect {
            to: compute_redirect(path, self.locale_store.get()),
        }
    }
}
