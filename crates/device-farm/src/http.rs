//! Shared HTTP plumbing for the Corellium REST API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client bound to one Corellium server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://app.corellium.com/api`).
    ///
    /// # Errors
    /// Returns error if HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "Created Corellium API client");

        Ok(Self { client, base_url })
    }

    /// Absolute URL for an API path such as `/v1/instances`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Underlying HTTP client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Human-readable status text, e.g. `Unauthorized` for 401.
#[must_use]
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), ToString::to_string)
}
