//! W3C WebDriver client for Appium servers.
//!
//! Protocol: <https://www.w3.org/TR/webdriver2/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::models::{
    CapabilitiesRequest, FindElementRequest, NewSessionRequest, SendKeysRequest, WireError,
    WireResponse, LEGACY_ELEMENT_KEY, W3C_ELEMENT_KEY,
};
use super::{Driver, DriverError, ElementId};
use crate::selector::Selector;

/// Appium commands may block on device-side waits, so allow a generous
/// request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A live WebDriver session.
#[derive(Clone)]
pub struct WebDriver {
    /// HTTP client.
    client: Client,
    /// Server base URL without a trailing slash.
    base_url: String,
    /// Session ID.
    session_id: String,
}

impl WebDriver {
    /// Open a session on the server at `base_url` with `capabilities`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created or the server
    /// refuses the session.
    pub async fn new_session(
        base_url: impl Into<String>,
        capabilities: Value,
    ) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let body = NewSessionRequest {
            capabilities: CapabilitiesRequest {
                always_match: capabilities,
                first_match: vec![json!({})],
            },
        };

        let url = format!("{base_url}/session");
        debug!(url = %url, "POST request");
        let response = client.post(&url).json(&body).send().await?;
        let wire = handle_response(response).await?;

        let session_id = wire
            .value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or(wire.session_id)
            .ok_or(DriverError::MissingField("sessionId"))?;

        info!(session_id = %session_id, "WebDriver session created");
        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    /// Session ID assigned by the server.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Close the session.
    ///
    /// # Errors
    /// Returns error if the server rejects the request.
    pub async fn delete_session(self) -> Result<(), DriverError> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        debug!(url = %url, "DELETE request");

        let response = self.client.delete(&url).send().await?;
        handle_response(response).await?;

        info!(session_id = %self.session_id, "WebDriver session deleted");
        Ok(())
    }

    /// POST a session command and return its `value`.
    async fn command<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<Value, DriverError> {
        let url = format!("{}/session/{}{path}", self.base_url, self.session_id);
        debug!(url = %url, "POST request");

        let response = self.client.post(&url).json(body).send().await?;
        Ok(handle_response(response).await?.value)
    }
}

/// Parse a WebDriver response, mapping W3C error payloads to
/// [`DriverError::WebDriver`].
async fn handle_response(response: reqwest::Response) -> Result<WireResponse, DriverError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, body = %text, "Failed to parse response");
            DriverError::Serialization(e)
        });
    }

    let error = serde_json::from_str::<WireResponse>(&text)
        .ok()
        .and_then(|wire| serde_json::from_value::<WireError>(wire.value).ok());

    Err(match error {
        Some(e) => DriverError::WebDriver {
            status: status.as_u16(),
            error: e.error,
            message: e.message,
        },
        None => DriverError::WebDriver {
            status: status.as_u16(),
            error: "unknown error".to_string(),
            message: text,
        },
    })
}

/// Extract an element reference from a find-element `value`.
fn element_id(value: &Value) -> Option<ElementId> {
    value
        .get(W3C_ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(|id| ElementId(id.to_string()))
}

#[async_trait]
impl Driver for WebDriver {
    async fn find_element(&self, selector: &Selector) -> Result<ElementId, DriverError> {
        debug!(selector = %selector, "Finding element");

        let body = FindElementRequest {
            using: selector.strategy.as_str(),
            value: &selector.value,
        };
        let value = self.command("/element", &body).await?;

        element_id(&value).ok_or(DriverError::MissingField(W3C_ELEMENT_KEY))
    }

    async fn click(&self, element: &ElementId) -> Result<(), DriverError> {
        self.command(&format!("/element/{element}/click"), &json!({}))
            .await?;
        Ok(())
    }

    async fn add_value(&self, element: &ElementId, text: &str) -> Result<(), DriverError> {
        self.command(&format!("/element/{element}/value"), &SendKeysRequest { text })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_accepts_both_keys() {
        assert_eq!(
            element_id(&json!({W3C_ELEMENT_KEY: "e1"})),
            Some(ElementId("e1".to_string()))
        );
        assert_eq!(
            element_id(&json!({LEGACY_ELEMENT_KEY: "e2"})),
            Some(ElementId("e2".to_string()))
        );
        assert_eq!(element_id(&json!({})), None);
    }
}
