//! API server configuration.

use std::path::PathBuf;

use filedepot_core::auth::jwt::{
    DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS, TokenConfig, resolve_secret,
};

/// Default maximum upload size: 10 MiB.
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// SQLite connection URL.
    pub database_url: String,
    /// Access token signing secret.
    pub access_secret: String,
    /// Refresh token signing secret (independent of the access secret).
    pub refresh_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
    /// Directory holding uploaded file blobs.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload body size in bytes.
    pub max_file_size: usize,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:3000`                 |
    /// | `DATABASE_URL`           | `sqlite://filedepot.db?mode=rwc` |
    /// | `JWT_ACCESS_SECRET`      | generated & persisted to file    |
    /// | `JWT_REFRESH_SECRET`     | generated & persisted to file    |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `900` (15 minutes)               |
    /// | `REFRESH_TOKEN_TTL_SECS` | `2592000` (30 days)              |
    /// | `UPLOAD_PATH`            | `uploads`                        |
    /// | `MAX_FILE_SIZE`          | `10485760` (10 MiB)              |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://filedepot.db?mode=rwc".into()),
            access_secret: resolve_secret("JWT_ACCESS_SECRET", "access-secret"),
            refresh_secret: resolve_secret("JWT_REFRESH_SECRET", "refresh-secret"),
            access_ttl_secs: env_i64("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl_secs: env_i64("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_PATH").unwrap_or_else(|_| "uploads".into()),
            ),
            max_file_size: env_usize("MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
        }
    }

    /// Token codec configuration derived from this config.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_secret: self.access_secret.clone(),
            refresh_secret: self.refresh_secret.clone(),
            access_ttl_secs: self.access_ttl_secs,
            refresh_ttl_secs: self.refresh_ttl_secs,
        }
    }
}

fn env_i64(var: &str, default: i64) -> i64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(var: &str, default: usize) -> usize {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
