//! Route table: the ordered, immutable mapping from path templates to
//! targets.
//!
//! Order is part of the contract. Matching is first-match-wins, so the
//! specific auth routes sit above the per-locale wildcard and the global
//! catch-all sits last. The table is built once and never mutated.

use crate::routing::matcher::{parse_template, Segment};
use crate::routing::page::Page;
use std::sync::OnceLock;

/// What a matched pattern resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Render this page (locale permitting).
    Page(Page),
    /// Compute a canonical locale-prefixed path and redirect to it.
    LocaleRedirect,
}

/// One route table row: a template plus its target.
#[derive(Debug)]
pub struct RoutePattern {
    template: &'static str,
    segments: Vec<Segment>,
    target: RouteTarget,
}

impl RoutePattern {
    fn new(template: &'static str, target: RouteTarget) -> Self {
        Self {
            template,
            segments: parse_template(template),
            target,
        }
    }

    /// The raw template this row was declared with.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// The parsed template segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The row's target.
    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    /// Whether this row ends in a wildcard (and so matches unboundedly many
    /// paths). The redirect policy excludes such rows when deciding whether
    /// a residual path names a known page.
    pub fn is_wildcard(&self) -> bool {
        self.segments.last() == Some(&Segment::Wildcard)
    }
}

static ROUTE_TABLE: OnceLock<Vec<RoutePattern>> = OnceLock::new();

/// The canonical route table, built on first access.
///
/// The trailing "/auth" and "*" redirector rows are shadowed by "/:lang"
/// and "/:lang/*" under strict first-match-wins; they stay declared so the
/// table reads as the complete URL contract and stays correct if the
/// earlier rows are ever reordered.
pub fn route_table() -> &'static [RoutePattern] {
    ROUTE_TABLE.get_or_init(|| {
        vec![
            RoutePattern::new("/", RouteTarget::LocaleRedirect),
            RoutePattern::new("/:lang", RouteTarget::Page(Page::Home)),
            RoutePattern::new("/:lang/posts", RouteTarget::Page(Page::Posts)),
            RoutePattern::new("/:lang/categories", RouteTarget::Page(Page::Categories)),
            RoutePattern::new("/:lang/about", RouteTarget::Page(Page::About)),
            RoutePattern::new("/:lang/auth", RouteTarget::Page(Page::Login)),
            RoutePattern::new("/:lang/auth/login", RouteTarget::Page(Page::Login)),
            RoutePattern::new("/:lang/auth/forget_pass", RouteTarget::Page(Page::ForgetPassword)),
            RoutePattern::new("/:lang/auth/sign_up", RouteTarget::Page(Page::SignUp)),
            RoutePattern::new("/:lang/auth/reset_password", RouteTarget::Page(Page::ResetPassword)),
            RoutePattern::new("/auth", RouteTarget::LocaleRedirect),
            RoutePattern::new("/:lang/404", RouteTarget::Page(Page::NotFound)),
            RoutePattern::new("/:lang/error", RouteTarget::Page(Page::ErrorPage)),
            RoutePattern::new("/:lang/*", RouteTarget::Page(Page::NotFound)),
            RoutePattern::new("*", RouteTarget::LocaleRedirect),
        ]
    })
}
