use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use super::{KeyValueStorage, StorageFault};

/// Shared by every handle in the process so two handles on one database never
/// pick the same temp name.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-system storage: one `<key>.json` file per key inside the database directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written value. Temp names carry the process
/// id, so concurrent writers in separate processes do not clobber each other.
pub struct FileStorage {
    db_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>, database: &str) -> Self {
        Self {
            db_dir: base_dir.into().join(database),
        }
    }

    pub fn db_dir(&self) -> &PathBuf {
        &self.db_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.db_dir.join(format!("{}.json", key))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.db_dir
            .join(format!(".{}.json.{}.{}.tmp", key, std::process::id(), n))
    }
}

impl KeyValueStorage for FileStorage {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>, StorageFault>> {
        async move {
            match tokio::fs::read(self.key_path(key)).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: Vec<u8>) -> BoxFuture<'a, Result<(), StorageFault>> {
        async move {
            tokio::fs::create_dir_all(&self.db_dir).await?;
            let tmp = self.tmp_path(key);
            tokio::fs::write(&tmp, &value).await?;
            if let Err(e) = tokio::fs::rename(&tmp, self.key_path(key)).await {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e.into());
            }
            debug!(key, bytes = value.len(), "Stored value");
            Ok(())
        }
        .boxed()
    }

    fn delete_database(&self) -> BoxFuture<'_, Result<(), StorageFault>> {
        async move {
            match tokio::fs::remove_dir_all(&self.db_dir).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }
}
