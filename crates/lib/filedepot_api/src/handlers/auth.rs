//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    CredentialsRequest, InfoResponse, MessageResponse, RefreshRequest, TokenResponse,
};
use crate::services::auth;
use crate::validation;

/// `POST /signup` — register with email/phone + password.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let (id, password) = validation::validate_credentials(&body.id, &body.password)?;
    let resp = auth::signup(&state.pool, &state.codec, id, password).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /signin` — authenticate with email/phone + password.
pub async fn signin_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<TokenResponse>> {
    let (id, password) = validation::validate_credentials(&body.id, &body.password)?;
    let resp = auth::signin(&state.pool, &state.codec, id, password).await?;
    Ok(Json(resp))
}

/// `POST /signin/new_token` — exchange a refresh token for a new pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = validation::validate_refresh_token(&body.refresh_token)?;
    let resp = auth::refresh(&state.pool, &state.codec, token).await?;
    Ok(Json(resp))
}

/// `GET /info` — the authenticated user's identifier. Requires authentication.
pub async fn info_handler(
    State(state): State<AppState>,
    axum::Extension(AuthenticatedUser(user_id)): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<InfoResponse>> {
    let resp = auth::get_info(&state.pool, &user_id).await?;
    Ok(Json(resp))
}

/// `GET /logout` — revoke all of the user's sessions. Requires authentication.
pub async fn logout_handler(
    State(state): State<AppState>,
    axum::Extension(AuthenticatedUser(user_id)): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<MessageResponse>> {
    let resp = auth::logout(&state.pool, &user_id).await?;
    Ok(Json(resp))
}
