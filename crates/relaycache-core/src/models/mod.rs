//! Data models for relay registry state.
//!
//! This module contains the data structures shared by the store and the
//! sync coordinator:
//!
//! - `RelayRecord`: A relay as reported by the registry
//! - `RelayRow`: A relay as shown in the view, with display-only fields
//! - `RelayPayload`: The full registry payload held in a snapshot
//! - `SnapshotField`: One named payload field with its new value, for merges

pub mod payload;
pub mod relay;

pub use payload::{RelayPayload, SnapshotField};
pub use relay::{RelayRecord, RelayRow};
