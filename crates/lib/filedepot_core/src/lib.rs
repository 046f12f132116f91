//! # filedepot_core
//!
//! Core domain logic for Filedepot: authentication, token records,
//! and file metadata storage.

pub mod auth;
pub mod files;
pub mod migrate;
pub mod models;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
