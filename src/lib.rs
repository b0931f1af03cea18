//! Translation resolver for a small static site.
//!
//! Translation bundles are loaded per language, binding key paths on the
//! page are resolved against the active bundle with a fallback language,
//! and the active language is kept in sync across the URL, the persisted
//! preference and the language selector controls.

pub mod config;
pub mod definitions;
pub mod http;
pub mod services;
pub mod utils;

/// The crate version extracted from the Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
