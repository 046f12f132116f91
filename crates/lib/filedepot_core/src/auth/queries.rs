//! Auth-related database queries.

use chrono::Utc;
use sqlx::SqlitePool;

use super::AuthError;
use crate::uuid::uuidv7;

/// Check whether an identifier is already registered.
pub async fn identifier_exists(pool: &SqlitePool, identifier: &str) -> Result<bool, AuthError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE identifier = $1)",
    )
    .bind(identifier)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Create a new user, returning the generated user ID.
pub async fn create_user(
    pool: &SqlitePool,
    identifier: &str,
    password_hash: &str,
) -> Result<String, AuthError> {
    let user_id = uuidv7().to_string();
    sqlx::query(
        "INSERT INTO users (id, identifier, password_hash, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&user_id)
    .bind(identifier)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(user_id)
}

/// Fetch a user by identifier, returning (id, password_hash).
pub async fn find_user_by_identifier(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<(String, String)>, AuthError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id, password_hash FROM users WHERE identifier = $1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user's identifier by ID.
pub async fn get_user_identifier(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<String>, AuthError> {
    let row = sqlx::query_scalar::<_, String>("SELECT identifier FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Store a new, valid refresh token record.
///
/// Never touches existing records: signup and signin each open an
/// additional session, and concurrent sessions are allowed.
pub async fn store_refresh_token(
    pool: &SqlitePool,
    user_id: &str,
    refresh_token: &str,
) -> Result<(), AuthError> {
    sqlx::query(
        "INSERT INTO tokens (id, user_id, refresh_token, is_valid, created_at) \
         VALUES ($1, $2, $3, 1, $4)",
    )
    .bind(uuidv7().to_string())
    .bind(user_id)
    .bind(refresh_token)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Rotate a refresh token: invalidate the old record and insert the new
/// one in a single transaction.
///
/// The conditional UPDATE is the serialization point for concurrent
/// refreshes of the same token: exactly one caller flips `is_valid` and
/// commits; every other caller sees zero rows affected and gets `false`.
pub async fn rotate_refresh_token(
    pool: &SqlitePool,
    user_id: &str,
    old_token: &str,
    new_token: &str,
) -> Result<bool, AuthError> {
    let mut tx = pool.begin().await?;

    let rotated = sqlx::query(
        "UPDATE tokens SET is_valid = 0 \
         WHERE user_id = $1 AND refresh_token = $2 AND is_valid = 1",
    )
    .bind(user_id)
    .bind(old_token)
    .execute(&mut *tx)
    .await?;

    if rotated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO tokens (id, user_id, refresh_token, is_valid, created_at) \
         VALUES ($1, $2, $3, 1, $4)",
    )
    .bind(uuidv7().to_string())
    .bind(user_id)
    .bind(new_token)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Revoke all live token records for a user. Idempotent.
pub async fn revoke_all_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<(), AuthError> {
    sqlx::query("UPDATE tokens SET is_valid = 0 WHERE user_id = $1 AND is_valid = 1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Check whether a user has at least one live token record.
///
/// This existence check is what makes logout revoke every outstanding
/// access token for the user, not just the one tied to a refresh token.
pub async fn has_live_session(pool: &SqlitePool, user_id: &str) -> Result<bool, AuthError> {
    let live = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM tokens WHERE user_id = $1 AND is_valid = 1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrate::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let pool = test_pool().await;

        let id = create_user(&pool, "a@b.com", "hash").await.unwrap();
        assert!(identifier_exists(&pool, "a@b.com").await.unwrap());
        assert!(!identifier_exists(&pool, "c@d.com").await.unwrap());

        let (found_id, hash) = find_user_by_identifier(&pool, "a@b.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found_id, id);
        assert_eq!(hash, "hash");

        assert_eq!(
            get_user_identifier(&pool, &id).await.unwrap().as_deref(),
            Some("a@b.com")
        );
        assert!(get_user_identifier(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_identifier_is_rejected_by_schema() {
        let pool = test_pool().await;
        create_user(&pool, "a@b.com", "hash").await.unwrap();
        assert!(create_user(&pool, "a@b.com", "hash").await.is_err());
    }

    #[tokio::test]
    async fn rotation_is_single_use() {
        let pool = test_pool().await;
        let user = create_user(&pool, "a@b.com", "hash").await.unwrap();
        store_refresh_token(&pool, &user, "rt-1").await.unwrap();

        assert!(rotate_refresh_token(&pool, &user, "rt-1", "rt-2").await.unwrap());
        // The old record is spent: a second rotation of the same value loses.
        assert!(!rotate_refresh_token(&pool, &user, "rt-1", "rt-3").await.unwrap());
        // The record inserted by the winning rotation is live.
        assert!(rotate_refresh_token(&pool, &user, "rt-2", "rt-4").await.unwrap());
    }

    #[tokio::test]
    async fn rotation_of_unknown_token_fails_without_side_effects() {
        let pool = test_pool().await;
        let user = create_user(&pool, "a@b.com", "hash").await.unwrap();

        assert!(!rotate_refresh_token(&pool, &user, "never-issued", "rt-1").await.unwrap());
        // The rolled-back insert must not have created a live session.
        assert!(!has_live_session(&pool, &user).await.unwrap());
    }

    #[tokio::test]
    async fn logout_revokes_every_session_and_is_idempotent() {
        let pool = test_pool().await;
        let user = create_user(&pool, "a@b.com", "hash").await.unwrap();
        store_refresh_token(&pool, &user, "rt-1").await.unwrap();
        store_refresh_token(&pool, &user, "rt-2").await.unwrap();
        assert!(has_live_session(&pool, &user).await.unwrap());

        revoke_all_refresh_tokens(&pool, &user).await.unwrap();
        assert!(!has_live_session(&pool, &user).await.unwrap());
        // No live record left to rotate either.
        assert!(!rotate_refresh_token(&pool, &user, "rt-2", "rt-3").await.unwrap());

        // Second logout is a no-op.
        revoke_all_refresh_tokens(&pool, &user).await.unwrap();
        assert!(!has_live_session(&pool, &user).await.unwrap());
    }

    #[tokio::test]
    async fn sessions_are_scoped_per_user() {
        let pool = test_pool().await;
        let alice = create_user(&pool, "alice@b.com", "hash").await.unwrap();
        let bob = create_user(&pool, "bob@b.com", "hash").await.unwrap();
        store_refresh_token(&pool, &alice, "rt-a").await.unwrap();
        store_refresh_token(&pool, &bob, "rt-b").await.unwrap();

        revoke_all_refresh_tokens(&pool, &alice).await.unwrap();
        assert!(!has_live_session(&pool, &alice).await.unwrap());
        assert!(has_live_session(&pool, &bob).await.unwrap());
    }
}
