//! Durable key-value storage backends for the snapshot store.
//!
//! A backend is addressed by a fixed database name and holds opaque byte
//! values under string keys. Each `put` replaces the whole value atomically;
//! `delete_database` removes everything the backend holds.
//!
//! Backends:
//! - `FileStorage`: One JSON file per key under `<base>/<database>/`
//! - `MemoryStorage`: Process-local map, for ephemeral use and tests

pub mod error;
pub mod file;
pub mod memory;

use futures::future::BoxFuture;

pub use error::StorageFault;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Database name shared by all backends.
pub const DATABASE_NAME: &str = "relay-data";

/// Async key-value storage with single-key atomicity.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, or `None` if it was never written.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageFault>>;

    /// Replace the value under `key`.
    fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), StorageFault>>;

    /// Drop the whole database. Deleting a database that does not exist succeeds.
    fn delete_database(&self) -> BoxFuture<'_, Result<(), StorageFault>>;
}
