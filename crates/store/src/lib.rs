pub mod connection;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod snapshots;
pub mod sqlite;
pub mod write_through;

pub use connection::{connect, connect_with_settings, DbPool};
pub use keys::StorageKey;
pub use kv::{KvStore, StorageError};
pub use memory::InMemoryKvStore;
pub use sqlite::SqliteKvStore;
pub use write_through::WriteThrough;
