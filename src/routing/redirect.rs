//! Redirect policy: canonical replacement paths for non-canonical inputs.
//!
//! Pure with respect to the locale store — the current locale is passed in,
//! and the locale-set side effect for paths that carry their own recognized
//! locale belongs to the resolver.

use crate::i18n::Locale;
use crate::routing::matcher::{match_path, path_segments};
use crate::routing::table::{route_table, RouteTarget};

/// Compute the canonical path to replace `path` with.
///
/// Rules:
/// - A recognized leading locale segment takes precedence over
///   `current_locale` and is kept.
/// - If the residual (the path minus a recognized locale segment) names a
///   known page, the target is `/{locale}/{residual}`; otherwise it is
///   `/{locale}/404`.
/// - Already-canonical paths come back unchanged, so redirect chains
///   terminate after one hop.
pub fn compute_redirect(path: &str, current_locale: Locale) -> String {
    let segments = path_segments(path);

    let (locale, residual) = match segments.first().and_then(|s| Locale::from_code(s)) {
        Some(path_locale) => (path_locale, &segments[1..]),
        None => (current_locale, &segments[..]),
    };

    if residual.is_empty() {
        return format!("/{locale}");
    }

    let residual = residual.join("/");
    if residual_names_known_page(&residual) {
        format!("/{locale}/{residual}")
    } else {
        format!("/{locale}/404")
    }
}

/// Whether `/{lang}/{residual}` would match a concrete page pattern.
///
/// A match that only succeeded by spilling segments into a wildcard does
/// not count: "matches the 404 catch-all" is exactly what "unknown" means
/// here. Locale-redirector rows do not count either; they are not pages.
fn residual_names_known_page(residual: &str) -> bool {
    // Any supported code works as the probe locale; the table's `:lang`
    // placeholder does not care which.
    let probe = format!("/{}/{}", Locale::fallback(), residual);
    match match_path(&probe, route_table()) {
        Some(m) => matches!(m.target, RouteTarget::Page(_)) && m.params.is_empty(),
        None => false,
    }
}
