use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::keys::StorageKey;
use crate::kv::{KvStore, StorageError};

/// Test double with the same contract as the sqlite store.
#[derive(Default)]
pub struct InMemoryKvStore {
    blobs: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(&key.as_key()).cloned())
    }

    async fn set(&self, key: StorageKey, value: String) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(key.as_key(), value);
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().await;
        blobs.remove(&key.as_key());
        Ok(())
    }
}
