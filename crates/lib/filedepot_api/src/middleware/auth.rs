//! Authentication middleware — Bearer token extraction, JWT verification,
//! and the live-session revocation check.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use filedepot_core::auth::queries;

use crate::AppState;
use crate::error::AppError;

/// Verified user identity stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the
/// access token, confirms the user still has a live session, and injects
/// `AuthenticatedUser` into request extensions.
///
/// The session check only asks whether ANY valid token record exists for
/// the user — deliberately coarse, so logout revokes every outstanding
/// access token at once even though access tokens are never stored.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let claims = state
        .codec
        .verify_access(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))?;

    // Store errors surface as 500 here, never as 401.
    if !queries::has_live_session(&state.pool, &claims.sub).await? {
        return Err(AppError::Unauthorized(
            "Session expired, please sign in again".into(),
        ));
    }

    request.extensions_mut().insert(AuthenticatedUser(claims.sub));

    Ok(next.run(request).await)
}
