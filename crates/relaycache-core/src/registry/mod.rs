//! Remote relay registry access.
//!
//! The sync coordinator only sees the `RegistryClient` trait: one call that
//! returns the whole payload for an account, or nothing. `HttpRegistryClient`
//! is the default implementation, reading the payload as JSON from
//! `GET {registry_url}/relays/{address}`.

pub mod client;
pub mod error;

use futures::future::BoxFuture;

use crate::models::RelayPayload;

pub use client::HttpRegistryClient;
pub use error::RegistryError;

/// Fetches the full registry payload for an account.
pub trait RegistryClient: Send + Sync {
    /// `Ok(None)` means the registry has nothing for this address.
    fn fetch_all<'a>(
        &'a self,
        address: &'a str,
    ) -> BoxFuture<'a, Result<Option<RelayPayload>, RegistryError>>;
}
