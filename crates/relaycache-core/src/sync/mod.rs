//! Relay synchronization between the registry, the snapshot store and the view.
//!
//! `RelaySync` answers per-category reads (verified, claimable, registration
//! credits, serials, families, nicknames). A read with no bound account
//! clears its category. Otherwise a fresh snapshot populates the category
//! directly, and a miss triggers a full synchronization that publishes the
//! whole payload to the view and replaces the stored snapshot.
//!
//! Only one synchronization runs at a time; reads that miss while one is in
//! flight wait for it instead of fetching again.

pub mod coordinator;
pub mod view;

pub use coordinator::{RelaySync, SyncOutcome};
pub use view::{family_is_verified, Category, ViewState};
