//! Client-side core for a multilingual blog frontend.
//!
//! The heart of the crate is the language-aware navigation resolver
//! ([`routing`]): every URL change resolves to exactly one outcome — render
//! a page in a locale, or redirect to the canonical locale-prefixed path —
//! while the URL, the persisted locale setting, and the in-memory locale
//! stay mutually consistent. Around it sit the persisted settings stores
//! ([`i18n`], [`theme`], [`storage`]), the translation bundle loader
//! ([`translation`]), and thin clients for the backend API ([`auth`],
//! [`posts`]).

pub mod auth;
pub mod config;
pub mod error;
pub mod i18n;
pub mod posts;
pub mod retry;
pub mod routing;
pub mod storage;
pub mod theme;
pub mod translation;
