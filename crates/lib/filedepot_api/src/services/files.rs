//! File storage flows: metadata rows in the database, blobs on disk at
//! `<upload_dir>/<file_id><extension>`.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use sqlx::SqlitePool;
use tracing::{error, warn};

use filedepot_core::files::queries;
use filedepot_core::models::file::FileRecord;

use crate::error::{AppError, AppResult};
use crate::models::{FileListResponse, MessageResponse, Pagination, UpdateResponse, UploadResponse};

/// An uploaded file extracted from a multipart request.
#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Extension of a filename, including the leading dot; empty when absent.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

fn blob_path(upload_dir: &Path, file_id: &str, extension: &str) -> PathBuf {
    upload_dir.join(format!("{file_id}{extension}"))
}

/// Store a new file: metadata row first, then the blob. A failed disk
/// write deletes the row again so no orphan metadata survives.
pub async fn upload(
    pool: &SqlitePool,
    upload_dir: &Path,
    user_id: &str,
    file: UploadedFile,
) -> AppResult<UploadResponse> {
    let extension = extension_of(&file.name);
    let size = file.data.len() as i64;

    let file_id =
        queries::insert_file(pool, user_id, &file.name, &extension, &file.mime_type, size).await?;

    let path = blob_path(upload_dir, &file_id, &extension);
    if let Err(e) = tokio::fs::write(&path, &file.data).await {
        error!(path = %path.display(), error = %e, "failed to write uploaded blob");
        let _ = queries::delete_file(pool, user_id, &file_id).await;
        return Err(AppError::Internal("failed to store file".into()));
    }

    Ok(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_id,
        filename: file.name,
        size,
        mimetype: file.mime_type,
    })
}

/// Paginated listing of the user's files.
pub async fn list(
    pool: &SqlitePool,
    user_id: &str,
    list_size: i64,
    page: i64,
) -> AppResult<FileListResponse> {
    let offset = (page - 1) * list_size;

    let total_items = queries::count_files(pool, user_id).await?;
    let files = queries::list_files(pool, user_id, list_size, offset).await?;

    let total_pages = (total_items + list_size - 1) / list_size;

    Ok(FileListResponse {
        files,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: list_size,
        },
    })
}

/// Metadata for one file.
pub async fn info(pool: &SqlitePool, user_id: &str, file_id: &str) -> AppResult<FileRecord> {
    queries::get_file(pool, user_id, file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))
}

/// Metadata plus blob contents, for download responses.
pub async fn download(
    pool: &SqlitePool,
    upload_dir: &Path,
    user_id: &str,
    file_id: &str,
) -> AppResult<(FileRecord, Vec<u8>)> {
    let record = info(pool, user_id, file_id).await?;

    let path = blob_path(upload_dir, &record.id, &record.extension);
    let data = tokio::fs::read(&path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to read blob");
        AppError::Internal("failed to read file".into())
    })?;

    Ok((record, data))
}

/// Replace a file's contents and metadata.
pub async fn update(
    pool: &SqlitePool,
    upload_dir: &Path,
    user_id: &str,
    file_id: &str,
    file: UploadedFile,
) -> AppResult<UpdateResponse> {
    let existing = info(pool, user_id, file_id).await?;

    // The extension may change, so the old blob is removed rather than
    // overwritten. A blob that is already gone is not an error.
    let old_path = blob_path(upload_dir, file_id, &existing.extension);
    if let Err(e) = tokio::fs::remove_file(&old_path).await {
        warn!(path = %old_path.display(), error = %e, "could not remove previous blob");
    }

    let extension = extension_of(&file.name);
    let size = file.data.len() as i64;
    queries::update_file(
        pool,
        user_id,
        file_id,
        &file.name,
        &extension,
        &file.mime_type,
        size,
    )
    .await?;

    let new_path = blob_path(upload_dir, file_id, &extension);
    if let Err(e) = tokio::fs::write(&new_path, &file.data).await {
        error!(path = %new_path.display(), error = %e, "failed to write updated blob");
        return Err(AppError::Internal("failed to store file".into()));
    }

    Ok(UpdateResponse {
        message: "File updated successfully".to_string(),
        filename: file.name,
        size,
        mimetype: file.mime_type,
    })
}

/// Remove a file's blob and metadata row.
pub async fn delete(
    pool: &SqlitePool,
    upload_dir: &Path,
    user_id: &str,
    file_id: &str,
) -> AppResult<MessageResponse> {
    let record = info(pool, user_id, file_id).await?;

    let path = blob_path(upload_dir, &record.id, &record.extension);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        // A missing blob should not make the metadata row undeletable.
        warn!(path = %path.display(), error = %e, "could not remove blob");
    }

    queries::delete_file(pool, user_id, file_id).await?;

    Ok(MessageResponse {
        message: "File deleted successfully".to_string(),
    })
}
