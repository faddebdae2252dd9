use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::connection::DbPool;
use crate::keys::StorageKey;
use crate::kv::{KvStore, StorageError};

/// Key-value blobs backed by a single sqlite table. One row per
/// [`StorageKey`], upserted whole on every write.
pub struct SqliteKvStore {
    pool: DbPool,
}

impl SqliteKvStore {
    pub async fn init(pool: DbPool) -> Result<Self, StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_blobs (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_blobs WHERE key = ?1")
            .bind(key.as_key())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO kv_blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
        )
        .bind(key.as_key())
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_blobs WHERE key = ?1")
            .bind(key.as_key())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
