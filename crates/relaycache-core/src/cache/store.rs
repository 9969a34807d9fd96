use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::{RelayPayload, SnapshotField};
use crate::storage::{KeyValueStorage, StorageFault};

/// Storage key for the one live snapshot.
pub const SNAPSHOT_KEY: &str = "relays";

/// Consider a snapshot stale after 30 seconds.
pub const CACHE_TTL_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub data: RelayPayload,
}

impl Snapshot {
    pub fn new(data: RelayPayload) -> Self {
        Self {
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.timestamp
    }

    /// Fresh while strictly younger than `max_age`.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.age() < max_age
    }

    pub fn age_display(&self) -> String {
        let seconds = self.age().num_seconds();
        if seconds < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if seconds < 60 {
            format!("{}s ago", seconds)
        } else if seconds < 3600 {
            format!("{}m ago", seconds / 60)
        } else if seconds < 86_400 {
            let hours = seconds / 3600;
            if (seconds % 3600) / 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = seconds / 86_400;
            if (seconds % 86_400) / 3600 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Single-slot snapshot cache over a key-value backend.
///
/// Every write holds `write_lock`, so the read-modify-write in `merge_key`
/// cannot interleave with another write.
pub struct SnapshotStore {
    storage: Arc<dyn KeyValueStorage>,
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn ttl() -> Duration {
        Duration::seconds(CACHE_TTL_SECS)
    }

    async fn load(&self) -> Result<Option<Snapshot>, StorageFault> {
        let Some(bytes) = self.storage.get(SNAPSHOT_KEY).await? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(&bytes).map_err(StorageFault::Corrupt)?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageFault> {
        let bytes = serde_json::to_vec(snapshot).map_err(StorageFault::Encode)?;
        self.storage.put(SNAPSHOT_KEY, bytes).await
    }

    /// The stored snapshot regardless of age.
    pub async fn peek(&self) -> Result<Option<Snapshot>, StorageFault> {
        self.load().await
    }

    /// The stored snapshot if it is younger than `max_age`.
    ///
    /// `force_refresh` always yields `None` without touching storage; a cold
    /// store also yields `None`.
    pub async fn read(
        &self,
        max_age: Duration,
        force_refresh: bool,
    ) -> Result<Option<Snapshot>, StorageFault> {
        if force_refresh {
            debug!("Forced refresh, skipping cached snapshot");
            return Ok(None);
        }

        match self.load().await? {
            Some(snapshot) if snapshot.is_fresh(max_age) => {
                debug!(age = %snapshot.age_display(), "Snapshot cache hit");
                Ok(Some(snapshot))
            }
            Some(snapshot) => {
                debug!(age = %snapshot.age_display(), "Snapshot is stale");
                Ok(None)
            }
            None => {
                debug!("No snapshot stored");
                Ok(None)
            }
        }
    }

    /// Overwrite the snapshot with `payload`, stamped now.
    pub async fn replace(&self, payload: RelayPayload) -> Result<(), StorageFault> {
        let _guard = self.write_lock.lock().await;
        let snapshot = Snapshot::new(payload);
        self.save(&snapshot).await?;
        info!(
            verified = snapshot.data.verified.len(),
            claimable = snapshot.data.claimable.len(),
            "Snapshot replaced"
        );
        Ok(())
    }

    /// Overwrite one payload field, keeping the rest of the stored snapshot
    /// (or empty defaults on a cold store), stamped now.
    pub async fn merge_key(&self, field: SnapshotField) -> Result<(), StorageFault> {
        let _guard = self.write_lock.lock().await;
        let name = field.name();

        let mut data = self.load().await?.map(|s| s.data).unwrap_or_default();
        data.apply(field);
        self.save(&Snapshot::new(data)).await?;

        debug!(field = name, "Snapshot field merged");
        Ok(())
    }

    /// Drop the whole database. Later reads see a cold store.
    pub async fn clear(&self) -> Result<(), StorageFault> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete_database().await?;
        info!("Snapshot cache cleared");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
