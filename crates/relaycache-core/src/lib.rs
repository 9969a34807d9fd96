//! relaycache-core - local cache and sync layer for relay registry state.
//!
//! A client keeps one time-stamped snapshot of everything the relay registry
//! reports for its account (verified and claimable relays, nicknames,
//! registration credits, families, hardware attestations) so that repeated
//! UI queries are served locally instead of hitting the registry each time.
//!
//! - `cache`: `SnapshotStore`, the single-slot persisted snapshot
//! - `sync`: `RelaySync`, per-category reads, full synchronization, view state
//! - `storage`: Key-value backends behind the store
//! - `registry`: `RegistryClient` trait and its HTTP implementation
//! - `account`: `AccountResolver` trait for the bound address
//! - `config`: On-disk configuration

pub mod account;
pub mod cache;
pub mod config;
pub mod models;
pub mod registry;
pub mod storage;
pub mod sync;

pub use account::{AccountResolver, StaticAccount};
pub use cache::{Snapshot, SnapshotStore};
pub use config::Config;
pub use models::{RelayPayload, RelayRecord, RelayRow, SnapshotField};
pub use registry::{HttpRegistryClient, RegistryClient, RegistryError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageFault};
pub use sync::{RelaySync, SyncOutcome, ViewState};
