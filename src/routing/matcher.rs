//! Path matcher: first-match-wins classification of a raw path against the
//! route table.
//!
//! Matching is segment-based, not regex-based. A template is parsed once
//! into a list of segments; a path is split on `/` with empty segments
//! dropped, so `//zh///posts/` and `/zh/posts` classify identically.

use crate::routing::table::{RoutePattern, RouteTarget};

/// One parsed template segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(&'static str),
    /// `:lang` — matches any single non-empty segment and captures it.
    /// Validation against the supported set happens in the resolver, not
    /// here; the matcher only decomposes.
    LocaleParam,
    /// Trailing `*` — matches zero or more remaining segments.
    Wildcard,
}

/// Parse a route template into segments.
///
/// Only the shapes the route table actually uses are supported: literals,
/// one `:lang` placeholder, and a trailing `*`.
///
/// # Panics
/// Panics if `*` appears anywhere but last. Templates are static data, so
/// this is a startup-time programming error, not a runtime condition.
pub fn parse_template(template: &'static str) -> Vec<Segment> {
    let segments: Vec<Segment> = template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s {
            ":lang" => Segment::LocaleParam,
            "*" => Segment::Wildcard,
            literal => Segment::Literal(literal),
        })
        .collect();

    if let Some(wildcard_at) = segments.iter().position(|s| *s == Segment::Wildcard) {
        assert_eq!(
            wildcard_at,
            segments.len() - 1,
            "wildcard must be the last segment in template '{template}'"
        );
    }
    segments
}

/// Split a request path into non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A successful classification of a path.
#[derive(Debug)]
pub struct RouteMatch<'t> {
    /// What the matched pattern points at.
    pub target: &'t RouteTarget,
    /// The raw `:lang` capture, if the pattern had one. May be an
    /// unsupported code; the resolver decides what that means.
    pub lang: Option<String>,
    /// Segments consumed by a trailing wildcard, in order.
    pub params: Vec<String>,
}

/// Match `path` against `table` in declaration order.
///
/// The first fully matching pattern wins; later patterns are never
/// evaluated. Returns `None` when nothing matches — a sentinel, not an
/// error; the resolver turns it into a redirect.
pub fn match_path<'t>(path: &str, table: &'t [RoutePattern]) -> Option<RouteMatch<'t>> {
    let segments = path_segments(path);
    table
        .iter()
        .find_map(|pattern| match_one(&segments, pattern))
}

fn match_one<'t>(segments: &[&str], pattern: &'t RoutePattern) -> Option<RouteMatch<'t>> {
    let template = pattern.segments();
    let mut lang = None;
    let mut params = Vec::new();

    let mut i = 0;
    for segment in template {
        match segment {
            Segment::Literal(expected) => {
                if segments.get(i) != Some(expected) {
                    return None;
                }
                i += 1;
            }
            Segment::LocaleParam => {
                let captured = segments.get(i)?;
                lang = Some((*captured).to_string());
                i += 1;
            }
            Segment::Wildcard => {
                params.extend(segments[i..].iter().map(|s| (*s).to_string()));
                i = segments.len();
            }
        }
    }

    // Without a wildcard the pattern must consume the whole path.
    if i != segments.len() {
        return None;
    }

    Some(RouteMatch {
        target: pattern.target(),
        lang,
        params,
    })
}
