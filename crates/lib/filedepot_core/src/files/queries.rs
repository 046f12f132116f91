//! File-metadata database queries.
//!
//! Every query is scoped to a user id: files belonging to other users
//! are indistinguishable from nonexistent ones.

use chrono::Utc;
use sqlx::SqlitePool;

use super::FileError;
use crate::models::file::FileRecord;
use crate::uuid::uuidv7;

const FILE_COLUMNS: &str = "id, name, extension, mime_type, size, upload_date";

/// Insert a file metadata row, returning the generated file ID.
pub async fn insert_file(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    extension: &str,
    mime_type: &str,
    size: i64,
) -> Result<String, FileError> {
    let file_id = uuidv7().to_string();
    sqlx::query(
        "INSERT INTO files (id, user_id, name, extension, mime_type, size, upload_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&file_id)
    .bind(user_id)
    .bind(name)
    .bind(extension)
    .bind(mime_type)
    .bind(size)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(file_id)
}

/// Count a user's files.
pub async fn count_files(pool: &SqlitePool, user_id: &str) -> Result<i64, FileError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// List a user's files with LIMIT/OFFSET pagination, in upload order
/// (IDs are UUIDv7, so ordering by id is ordering by time).
pub async fn list_files(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<FileRecord>, FileError> {
    let rows = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one file's metadata.
pub async fn get_file(
    pool: &SqlitePool,
    user_id: &str,
    file_id: &str,
) -> Result<Option<FileRecord>, FileError> {
    let row = sqlx::query_as::<_, FileRecord>(&format!(
        "SELECT {FILE_COLUMNS} FROM files WHERE id = $1 AND user_id = $2",
    ))
    .bind(file_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Replace a file's metadata after re-upload. Returns false when the
/// row does not exist (or belongs to another user).
pub async fn update_file(
    pool: &SqlitePool,
    user_id: &str,
    file_id: &str,
    name: &str,
    extension: &str,
    mime_type: &str,
    size: i64,
) -> Result<bool, FileError> {
    let result = sqlx::query(
        "UPDATE files SET name = $1, extension = $2, mime_type = $3, size = $4, \
         upload_date = $5 WHERE id = $6 AND user_id = $7",
    )
    .bind(name)
    .bind(extension)
    .bind(mime_type)
    .bind(size)
    .bind(Utc::now())
    .bind(file_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a file metadata row. Returns false when no row matched.
pub async fn delete_file(
    pool: &SqlitePool,
    user_id: &str,
    file_id: &str,
) -> Result<bool, FileError> {
    let result = sqlx::query("DELETE FROM files WHERE id = $1 AND user_id = $2")
        .bind(file_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
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

    async fn test_user(pool: &SqlitePool, identifier: &str) -> String {
        crate::auth::queries::create_user(pool, identifier, "hash")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_get_update_delete_roundtrip() {
        let pool = test_pool().await;
        let user = test_user(&pool, "a@b.com").await;

        let id = insert_file(&pool, &user, "notes.txt", ".txt", "text/plain", 11)
            .await
            .unwrap();

        let rec = get_file(&pool, &user, &id).await.unwrap().unwrap();
        assert_eq!(rec.name, "notes.txt");
        assert_eq!(rec.extension, ".txt");
        assert_eq!(rec.mime_type, "text/plain");
        assert_eq!(rec.size, 11);

        assert!(
            update_file(&pool, &user, &id, "notes.md", ".md", "text/markdown", 20)
                .await
                .unwrap()
        );
        let rec = get_file(&pool, &user, &id).await.unwrap().unwrap();
        assert_eq!(rec.name, "notes.md");
        assert_eq!(rec.size, 20);

        assert!(delete_file(&pool, &user, &id).await.unwrap());
        assert!(get_file(&pool, &user, &id).await.unwrap().is_none());
        assert!(!delete_file(&pool, &user, &id).await.unwrap());
    }

    #[tokio::test]
    async fn files_are_scoped_per_user() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice@b.com").await;
        let bob = test_user(&pool, "bob@b.com").await;

        let id = insert_file(&pool, &alice, "a.txt", ".txt", "text/plain", 1)
            .await
            .unwrap();

        assert!(get_file(&pool, &bob, &id).await.unwrap().is_none());
        assert!(!update_file(&pool, &bob, &id, "x", ".x", "y", 0).await.unwrap());
        assert!(!delete_file(&pool, &bob, &id).await.unwrap());
        assert_eq!(count_files(&pool, &bob).await.unwrap(), 0);
        assert_eq!(count_files(&pool, &alice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_pages_in_upload_order() {
        let pool = test_pool().await;
        let user = test_user(&pool, "a@b.com").await;

        for i in 0..5 {
            insert_file(&pool, &user, &format!("f{i}.txt"), ".txt", "text/plain", i)
                .await
                .unwrap();
        }

        assert_eq!(count_files(&pool, &user).await.unwrap(), 5);

        let page1 = list_files(&pool, &user, 2, 0).await.unwrap();
        let page2 = list_files(&pool, &user, 2, 2).await.unwrap();
        let page3 = list_files(&pool, &user, 2, 4).await.unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 2);
        assert_eq!(page3.len(), 1);
        assert_eq!(page1[0].name, "f0.txt");
        assert_eq!(page2[0].name, "f2.txt");
        assert_eq!(page3[0].name, "f4.txt");
    }
}
