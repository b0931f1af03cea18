//! # Definitions
//!
//! Collections of modules that store definitions for the structures the
//! translation resolver works with

pub mod bundle;
pub mod key_path;
pub mod language;
