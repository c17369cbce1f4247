//! Language-aware navigation: route table, path matcher, redirect policy,
//! and the resolver that composes them.
//!
//! The contract is small: every incoming path yields exactly one
//! [`Outcome`] — render a page in a locale, or redirect (replace, not push)
//! to the canonical locale-prefixed path. Redirect targets are themselves
//! canonical, so a redirect is always followed by a render on the next
//! navigation cycle.

pub mod matcher;
mod page;
mod redirect;
mod resolver;
pub mod table;

pub use page::Page;
pub use redirect::compute_redirect;
pub use resolver::{NavRequest, NavigationResolver, Outcome, LANG_QUERY_KEY};
pub use table::{route_table, RoutePattern, RouteTarget};
