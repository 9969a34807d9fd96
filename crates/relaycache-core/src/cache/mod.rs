//! Local caching module for registry snapshots.
//!
//! This module provides the `SnapshotStore`, a single-slot, time-stamped
//! cache of the whole relay registry payload. The snapshot lives under the
//! fixed key `relays` in a `KeyValueStorage` backend and survives restarts.
//!
//! Write paths:
//! - `replace`: Full sync, overwrites the snapshot
//! - `merge_key`: Incremental update of one payload field
//! - `clear`: Drops the whole database

pub mod store;

pub use store::{Snapshot, SnapshotStore, CACHE_TTL_SECS, SNAPSHOT_KEY};
