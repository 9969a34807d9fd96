use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::RwLock;

use super::{KeyValueStorage, StorageFault};

/// In-memory storage. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageFault>> {
        async move { Ok(self.entries.read().await.get(key).cloned()) }.boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), StorageFault>> {
        async move {
            self.entries.write().await.insert(key.to_string(), value);
            Ok(())
        }
        .boxed()
    }

    fn delete_database(&self) -> BoxFuture<'_, Result<(), StorageFault>> {
        async move {
            self.entries.write().await.clear();
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_round_trip_and_delete() {
        let storage = MemoryStorage::new();
        assert!(storage.get("relays").await.unwrap().is_none());

        storage.put("relays", vec![1, 2, 3]).await.unwrap();
        assert_eq!(storage.get("relays").await.unwrap(), Some(vec![1, 2, 3]));

        storage.delete_database().await.unwrap();
        assert!(storage.get("relays").await.unwrap().is_none());
    }
}
