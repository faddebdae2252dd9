use async_trait::async_trait;
use thiserror::Error;

use crate::keys::StorageKey;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error for `{key}`: {message}")]
    Codec { key: String, message: String },
}

/// Blob-per-key persistence. Values are opaque JSON documents; the store
/// neither inspects nor validates them.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: StorageKey, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;

    /// Drops every application slot. Used by factory reset.
    async fn clear(&self) -> Result<(), StorageError> {
        for key in StorageKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}
