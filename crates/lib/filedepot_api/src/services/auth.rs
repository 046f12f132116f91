//! Session manager — signup/signin/refresh/logout/info flows.

use sqlx::SqlitePool;
use tracing::info;

use filedepot_core::auth::jwt::TokenCodec;
use filedepot_core::auth::{password, queries};

use crate::error::{AppError, AppResult};
use crate::models::{InfoResponse, MessageResponse, TokenResponse};

fn token_response(pair: filedepot_core::models::auth::TokenPair) -> TokenResponse {
    TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }
}

/// Register a new user and open a first session.
pub async fn signup(
    pool: &SqlitePool,
    codec: &TokenCodec,
    identifier: &str,
    plain_password: &str,
) -> AppResult<TokenResponse> {
    if queries::identifier_exists(pool, identifier).await? {
        return Err(AppError::IdentifierTaken);
    }

    // Only the bcrypt hash ever reaches the store.
    let password_hash = password::hash_password(plain_password)?;
    let user_id = queries::create_user(pool, identifier, &password_hash).await?;

    let pair = codec.issue_pair(&user_id)?;
    queries::store_refresh_token(pool, &user_id, &pair.refresh_token).await?;

    info!(user_id, "user registered");
    Ok(token_response(pair))
}

/// Authenticate with identifier + password and open a new session.
///
/// Existing sessions stay live: a user may be signed in from several
/// clients at once.
pub async fn signin(
    pool: &SqlitePool,
    codec: &TokenCodec,
    identifier: &str,
    plain_password: &str,
) -> AppResult<TokenResponse> {
    let (user_id, password_hash) = queries::find_user_by_identifier(pool, identifier)
        .await?
        // Same error as a wrong password: unknown identifiers are not enumerable.
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(plain_password, &password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let pair = codec.issue_pair(&user_id)?;
    queries::store_refresh_token(pool, &user_id, &pair.refresh_token).await?;

    info!(user_id, "user signed in");
    Ok(token_response(pair))
}

/// Exchange a refresh token for a new pair. Single-use: the presented
/// token's record is invalidated in the same transaction that stores
/// the replacement, so a concurrent refresh of the same token gets
/// `InvalidRefreshToken` rather than a duplicated pair.
pub async fn refresh(
    pool: &SqlitePool,
    codec: &TokenCodec,
    refresh_token: &str,
) -> AppResult<TokenResponse> {
    let claims = codec
        .verify_refresh(refresh_token)
        .ok_or(AppError::InvalidRefreshToken)?;

    let pair = codec.issue_pair(&claims.sub)?;

    let rotated =
        queries::rotate_refresh_token(pool, &claims.sub, refresh_token, &pair.refresh_token)
            .await?;
    if !rotated {
        // Never issued, already rotated, or logged out.
        return Err(AppError::InvalidRefreshToken);
    }

    Ok(token_response(pair))
}

/// Revoke every live session for the user. Idempotent.
pub async fn logout(pool: &SqlitePool, user_id: &str) -> AppResult<MessageResponse> {
    queries::revoke_all_refresh_tokens(pool, user_id).await?;
    info!(user_id, "user logged out");
    Ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Return the authenticated user's identifier.
pub async fn get_info(pool: &SqlitePool, user_id: &str) -> AppResult<InfoResponse> {
    let identifier = queries::get_user_identifier(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(InfoResponse { id: identifier })
}
