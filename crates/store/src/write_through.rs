use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tracing::warn;

use dokkan_core::stores::ChangeListener;

use crate::keys::StorageKey;
use crate::kv::KvStore;

/// Persists every store snapshot it observes to one storage slot.
///
/// Writes are fire-and-forget: the snapshot is encoded synchronously, the
/// write is spawned onto the ambient runtime, and failures are logged without
/// rolling back the in-memory change. Outside a runtime the write is skipped
/// with a warning instead of panicking.
pub struct WriteThrough {
    kv: Arc<dyn KvStore>,
    key: StorageKey,
}

impl WriteThrough {
    pub fn new(kv: Arc<dyn KvStore>, key: StorageKey) -> Arc<Self> {
        Arc::new(Self { kv, key })
    }
}

impl<T: Serialize> ChangeListener<T> for WriteThrough {
    fn on_change(&self, snapshot: &[T]) {
        let encoded = match serde_json::to_string(snapshot) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(key = %self.key, %error, "snapshot failed to encode; not persisted");
                return;
            }
        };

        let kv = Arc::clone(&self.kv);
        let key = self.key;

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(error) = kv.set(key, encoded).await {
                        warn!(key = %key, %error, "write-through failed; in-memory state kept");
                    }
                });
            }
            Err(_) => {
                warn!(key = %key, "no async runtime available; snapshot not persisted");
            }
        }
    }
}
