//! File metadata storage.

pub mod queries;

use thiserror::Error;

/// File storage errors.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}
