//! API request/response models.
//!
//! Wire shapes follow the original service: camelCase keys, token pairs
//! as opaque strings, `{error, message}` error bodies.

use serde::{Deserialize, Serialize};

use filedepot_core::models::file::FileRecord;

/// Body for `/signup` and `/signin`.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Email address or phone number.
    pub id: String,
    pub password: String,
}

/// Body for `/signin/new_token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Token pair returned by signup/signin/refresh.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// `GET /info` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    /// The user's identifier (email or phone).
    pub id: String,
}

/// Generic `{message}` success response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /file/upload` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_id: String,
    pub filename: String,
    pub size: i64,
    pub mimetype: String,
}

/// `PUT /file/update/{id}` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub filename: String,
    pub size: i64,
    pub mimetype: String,
}

/// Pagination metadata for `GET /file/list`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// `GET /file/list` response.
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
    pub pagination: Pagination,
}

/// Query parameters for `GET /file/list`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub list_size: Option<i64>,
    pub page: Option<i64>,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
