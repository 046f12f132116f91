//! JWT token codec.
//!
//! Issues and verifies access/refresh token pairs. The two token classes
//! are signed with independent secrets, so compromise of the access
//! signing key cannot forge refresh tokens and vice versa.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::info;

use super::AuthError;
use crate::models::auth::{TokenClaims, TokenPair};

/// Access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 30 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Signing secrets and lifetimes for the token codec.
///
/// Injected explicitly at construction time; the codec never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl TokenConfig {
    pub fn new(access_secret: String, refresh_secret: String) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }
}

/// Issues and verifies signed token pairs (HS256).
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issue an access/refresh pair for a user, each token carrying the
    /// user id as its `sub` claim.
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, AuthError> {
        let access_token = sign(
            user_id,
            self.config.access_secret.as_bytes(),
            self.config.access_ttl_secs,
        )?;
        let refresh_token = sign(
            user_id,
            self.config.refresh_secret.as_bytes(),
            self.config.refresh_ttl_secs,
        )?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token, returning the claims on success.
    ///
    /// Malformed, forged, and expired tokens all collapse to `None` so
    /// callers cannot distinguish the failure modes.
    pub fn verify_access(&self, token: &str) -> Option<TokenClaims> {
        verify(token, self.config.access_secret.as_bytes())
    }

    /// Verify a refresh token, returning the claims on success.
    pub fn verify_refresh(&self, token: &str) -> Option<TokenClaims> {
        verify(token, self.config.refresh_secret.as_bytes())
    }
}

/// Generate a signed JWT with the given secret and lifetime.
fn sign(user_id: &str, secret: &[u8], ttl_secs: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

fn verify(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

/// Resolve a signing secret: the given env var, else a persisted
/// generated secret under the platform data dir.
pub fn resolve_secret(env_var: &str, file_name: &str) -> String {
    if let Ok(secret) = std::env::var(env_var) {
        if !secret.is_empty() {
            return secret;
        }
    }
    // Generate and persist
    let secret_path = secret_path(file_name);
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new signing secret");
    secret
}

/// Path to a persisted secret file.
fn secret_path(file_name: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("filedepot")
        .join(file_name)
}
