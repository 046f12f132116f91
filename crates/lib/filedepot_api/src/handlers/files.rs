//! File CRUD request handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use filedepot_core::models::file::FileRecord;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    FileListResponse, ListQuery, MessageResponse, UpdateResponse, UploadResponse,
};
use crate::services::files::{self, UploadedFile};
use crate::validation;

/// Pull the `file` field out of a multipart body.
///
/// Oversized bodies surface as multipart read errors and map to 400,
/// like the original's upload middleware.
async fn extract_file(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("file").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        return Ok(UploadedFile {
            name,
            mime_type,
            data,
        });
    }
    Err(AppError::Validation("No file was uploaded".into()))
}

/// `POST /file/upload` — store a new file (multipart field `file`).
pub async fn upload_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let file = extract_file(multipart).await?;
    let resp = files::upload(&state.pool, &state.config.upload_dir, &user_id, file).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `GET /file/list?list_size=&page=` — paginated file listing.
pub async fn list_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<FileListResponse>> {
    let (list_size, page) = validation::page_params(query.list_size, query.page);
    let resp = files::list(&state.pool, &user_id, list_size, page).await?;
    Ok(Json(resp))
}

/// `GET /file/{id}` — file metadata.
pub async fn info_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(file_id): Path<String>,
) -> AppResult<Json<FileRecord>> {
    let record = files::info(&state.pool, &user_id, &file_id).await?;
    Ok(Json(record))
}

/// `GET /file/download/{id}` — blob download with attachment headers.
pub async fn download_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(file_id): Path<String>,
) -> AppResult<Response> {
    let (record, data) =
        files::download(&state.pool, &state.config.upload_dir, &user_id, &file_id).await?;

    let headers = [
        (header::CONTENT_TYPE, record.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", record.name),
        ),
    ];
    Ok((headers, data).into_response())
}

/// `PUT /file/update/{id}` — replace a file's contents and metadata.
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(file_id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<UpdateResponse>> {
    let file = extract_file(multipart).await?;
    let resp = files::update(
        &state.pool,
        &state.config.upload_dir,
        &user_id,
        &file_id,
        file,
    )
    .await?;
    Ok(Json(resp))
}

/// `DELETE /file/delete/{id}` — remove a file.
pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(file_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let resp = files::delete(&state.pool, &state.config.upload_dir, &user_id, &file_id).await?;
    Ok(Json(resp))
}
