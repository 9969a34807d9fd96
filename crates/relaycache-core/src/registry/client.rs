//! HTTP client for the relay registry.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::models::RelayPayload;

use super::{RegistryClient, RegistryError};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Registry client over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpRegistryClient {
    client: Client,
    base_url: String,
}

impl HttpRegistryClient {
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn relays_url(&self, address: &str) -> String {
        format!("{}/relays/{}", self.base_url, address)
    }

    async fn fetch(&self, address: &str) -> Result<Option<RelayPayload>, RegistryError> {
        let url = self.relays_url(address);
        debug!(url = %url, "Fetching relay payload");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(address, "Registry has no relays for address");
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(RegistryError::from_status(status, &body));
        }

        Self::parse_payload(&body)
    }

    /// A `null` body is treated like a missing account.
    fn parse_payload(body: &str) -> Result<Option<RelayPayload>, RegistryError> {
        serde_json::from_str::<Option<RelayPayload>>(body)
            .map_err(|e| RegistryError::InvalidResponse(format!("Failed to parse relay payload: {}", e)))
    }
}

impl RegistryClient for HttpRegistryClient {
    fn fetch_all<'a>(
        &'a self,
        address: &'a str,
    ) -> BoxFuture<'a, Result<Option<RelayPayload>, RegistryError>> {
        self.fetch(address).boxed()
    }
}
