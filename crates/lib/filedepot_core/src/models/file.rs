//! File metadata models.

use serde::Serialize;

/// File metadata row, as stored and as returned by list/info endpoints.
///
/// The blob itself lives on disk at `<upload_dir>/<id><extension>`;
/// only metadata is kept in the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    /// Original filename as uploaded.
    pub name: String,
    /// Extension including the leading dot; empty when the name has none.
    pub extension: String,
    pub mime_type: String,
    pub size: i64,
    pub upload_date: chrono::DateTime<chrono::Utc>,
}
