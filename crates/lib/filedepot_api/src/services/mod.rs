//! Service flows orchestrating core queries and the token codec.

pub mod auth;
pub mod files;
