//! # filedepot_api
//!
//! HTTP API library for Filedepot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod validation;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use filedepot_core::auth::jwt::TokenCodec;

use crate::config::ApiConfig;
use crate::handlers::{auth, files};
use crate::models::ErrorResponse;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool.
    pub pool: SqlitePool,
    /// API configuration.
    pub config: ApiConfig,
    /// Token codec built from the configured secrets.
    pub codec: TokenCodec,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ApiConfig) -> Self {
        let codec = TokenCodec::new(config.token_config());
        Self {
            pool,
            config,
            codec,
        }
    }
}

/// Run embedded database migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    filedepot_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/signup", post(auth::signup_handler))
        .route("/signin", post(auth::signin_handler))
        .route("/signin/new_token", post(auth::refresh_handler));

    // Protected routes (require a live session)
    let protected = Router::new()
        .route("/info", get(auth::info_handler))
        .route("/logout", get(auth::logout_handler))
        .route("/file/upload", post(files::upload_handler))
        .route("/file/list", get(files::list_handler))
        .route("/file/download/{id}", get(files::download_handler))
        .route("/file/update/{id}", put(files::update_handler))
        .route("/file/delete/{id}", delete(files::delete_handler))
        .route("/file/{id}", get(files::info_handler))
        .layer(DefaultBodyLimit::max(state.config.max_file_size))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// JSON 404 for unknown routes.
async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Route not found".to_string(),
        }),
    )
}
