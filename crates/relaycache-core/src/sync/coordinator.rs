use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::account::{is_valid_address, AccountResolver};
use crate::cache::{Snapshot, SnapshotStore};
use crate::models::RelayRow;
use crate::registry::RegistryClient;

use super::view::{family_is_verified, Category, ViewState};

/// Result of a full synchronization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fetched, written to the store, published to the view.
    Synced,
    /// Another synchronization finished while this one waited; its result stands.
    Joined,
    /// The registry returned nothing or failed; view left untouched.
    NoData,
    /// No valid account address bound.
    Unbound,
}

/// Serves relay registry state from the snapshot store, falling back to a
/// full registry fetch when the snapshot is missing or stale.
pub struct RelaySync {
    store: SnapshotStore,
    registry: Arc<dyn RegistryClient>,
    account: Arc<dyn AccountResolver>,
    view: RwLock<ViewState>,
    sync_gate: Mutex<()>,
    /// Bumped after every finished synchronization, successful or not.
    sync_generation: AtomicU64,
    /// Bumped under the view write lock whenever a sync or clear rewrites the
    /// whole view. Cache hits read before the bump must not populate after it.
    view_epoch: AtomicU64,
}

impl RelaySync {
    pub fn new(
        store: SnapshotStore,
        registry: Arc<dyn RegistryClient>,
        account: Arc<dyn AccountResolver>,
    ) -> Self {
        Self {
            store,
            registry,
            account,
            view: RwLock::new(ViewState::default()),
            sync_gate: Mutex::new(()),
            sync_generation: AtomicU64::new(0),
            view_epoch: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Copy of the current view for display.
    pub async fn view(&self) -> ViewState {
        self.view.read().await.clone()
    }

    pub async fn all_relays(&self) -> Vec<RelayRow> {
        self.view.read().await.all_relays()
    }

    pub async fn is_hardware_relay(&self, fingerprint: &str) -> bool {
        self.view.read().await.is_hardware_relay(fingerprint)
    }

    fn bound_address(&self) -> Option<String> {
        let address = self.account.address()?;
        if is_valid_address(&address) {
            Some(address)
        } else {
            debug!(address = %address, "Ignoring invalid account address");
            None
        }
    }

    /// Fresh snapshot from the store. Storage faults count as a miss.
    async fn cached(&self, force_refresh: bool) -> Option<Snapshot> {
        match self.store.read(SnapshotStore::ttl(), force_refresh).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to read relay snapshot, treating as miss");
                None
            }
        }
    }

    async fn load_category(&self, category: Category, force_refresh: bool) {
        let generation = self.sync_generation.load(Ordering::Acquire);
        let epoch = self.view_epoch.load(Ordering::Acquire);

        let Some(address) = self.bound_address() else {
            debug!(?category, "No account bound, clearing view");
            self.view.write().await.clear_category(category);
            return;
        };

        match self.cached(force_refresh).await {
            Some(snapshot) => {
                let mut view = self.view.write().await;
                if self.view_epoch.load(Ordering::Acquire) == epoch {
                    view.populate(category, &snapshot.data);
                } else {
                    debug!(?category, "View rewritten since snapshot read, keeping it");
                }
            }
            None => {
                self.synchronize(&address, generation).await;
            }
        }
    }

    pub async fn get_verified_relays(&self, force_refresh: bool) -> Vec<RelayRow> {
        self.load_category(Category::Verified, force_refresh).await;
        self.view.read().await.verified_relays.clone()
    }

    pub async fn get_claimable_relays(&self, force_refresh: bool) -> Vec<RelayRow> {
        self.load_category(Category::Claimable, force_refresh).await;
        self.view.read().await.claimable_relays.clone()
    }

    pub async fn get_registration_credits(&self, force_refresh: bool) -> BTreeSet<String> {
        self.load_category(Category::RegistrationCredits, force_refresh).await;
        self.view.read().await.registration_credits.clone()
    }

    pub async fn get_serials(&self, force_refresh: bool) -> Vec<String> {
        self.load_category(Category::Serials, force_refresh).await;
        self.view.read().await.serials.clone()
    }

    pub async fn get_families(&self, force_refresh: bool) -> HashMap<String, Vec<String>> {
        self.load_category(Category::Families, force_refresh).await;
        self.view.read().await.families.clone()
    }

    pub async fn get_nicknames(&self, force_refresh: bool) -> HashMap<String, String> {
        self.load_category(Category::Nicknames, force_refresh).await;
        self.view.read().await.nicknames.clone()
    }

    /// Whether `fingerprint` holds a registration credit.
    ///
    /// Returns `None` when the snapshot had to be rebuilt; the view is
    /// populated by then and the caller should ask again.
    pub async fn has_registration_credit(
        &self,
        fingerprint: &str,
        force_refresh: bool,
    ) -> Option<bool> {
        let generation = self.sync_generation.load(Ordering::Acquire);
        let epoch = self.view_epoch.load(Ordering::Acquire);

        let Some(address) = self.bound_address() else {
            self.view.write().await.registration_credits.clear();
            return Some(false);
        };

        match self.cached(force_refresh).await {
            Some(snapshot) => {
                let has_credit = snapshot.data.registration_credits.contains(fingerprint);
                let mut view = self.view.write().await;
                if self.view_epoch.load(Ordering::Acquire) == epoch {
                    view.registration_credits = snapshot.data.registration_credits;
                }
                Some(has_credit)
            }
            None => {
                self.synchronize(&address, generation).await;
                None
            }
        }
    }

    /// Whether every member of `fingerprint`'s declared family is verified.
    ///
    /// Families come from the cached snapshot, verified relays from the
    /// current view. Returns `None` when the snapshot had to be rebuilt; the
    /// caller should ask again.
    pub async fn family_verified(&self, fingerprint: &str) -> Option<bool> {
        let generation = self.sync_generation.load(Ordering::Acquire);

        let Some(address) = self.bound_address() else {
            self.view.write().await.families.clear();
            return Some(false);
        };

        match self.cached(false).await {
            Some(snapshot) => {
                let view = self.view.read().await;
                Some(family_is_verified(
                    &snapshot.data.families,
                    &view.verified_relays,
                    fingerprint,
                ))
            }
            None => {
                self.synchronize(&address, generation).await;
                None
            }
        }
    }

    /// Rebuild the snapshot from the registry now, ignoring the cache.
    pub async fn refresh(&self) -> SyncOutcome {
        let generation = self.sync_generation.load(Ordering::Acquire);
        match self.bound_address() {
            Some(address) => self.synchronize(&address, generation).await,
            None => SyncOutcome::Unbound,
        }
    }

    /// Empty the view and drop the persisted snapshot.
    ///
    /// Waits for any in-flight synchronization, so its result cannot land
    /// after the clear.
    pub async fn clear_cache(&self) {
        let _gate = self.sync_gate.lock().await;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear relay snapshot");
        }
        let mut view = self.view.write().await;
        view.clear();
        self.view_epoch.fetch_add(1, Ordering::Release);
    }

    /// Full fetch, store and publish, one at a time.
    ///
    /// `observed` is the generation the caller saw before it looked at the
    /// cache. If it moved by the time the gate is acquired, a synchronization
    /// completed in between and this call returns without fetching.
    async fn synchronize(&self, address: &str, observed: u64) -> SyncOutcome {
        let _gate = self.sync_gate.lock().await;
        if self.sync_generation.load(Ordering::Acquire) != observed {
            debug!("Joined in-flight relay synchronization");
            return SyncOutcome::Joined;
        }

        info!(address, "Starting relay synchronization");
        let outcome = match self.registry.fetch_all(address).await {
            Ok(Some(payload)) => {
                let verified = payload.verified.len();
                let claimable = payload.claimable.len();
                // Store first: a reader holding the old snapshot captured
                // its epoch before this publish.
                if let Err(e) = self.store.replace(payload.clone()).await {
                    warn!(error = %e, "Failed to cache relay snapshot");
                }
                let mut view = self.view.write().await;
                view.apply_payload(&payload);
                self.view_epoch.fetch_add(1, Ordering::Release);
                drop(view);
                info!(verified, claimable, "Relay synchronization complete");
                SyncOutcome::Synced
            }
            Ok(None) => {
                info!(address, "Registry returned no relay data");
                SyncOutcome::NoData
            }
            Err(e) => {
                warn!(error = %e, "Relay registry fetch failed");
                SyncOutcome::NoData
            }
        };

        self.sync_generation.fetch_add(1, Ordering::Release);
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
