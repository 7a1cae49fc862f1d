//! Query derived device attributes such as the WiFi IP.

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ActionError;
use crate::http::{status_text, ApiClient};

/// Attribute holding the device's WiFi IP address.
pub const WIFI_IP_ATTR: &str = "wifiIp";

/// Reads one attribute of a device via
/// `GET /v1/instances?name=<name>&returnAttr=<attr>`.
#[derive(Clone, Debug)]
pub struct AttributePoller {
    api: ApiClient,
}

impl AttributePoller {
    /// Create a poller using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch `attr` for the device called `name`.
    ///
    /// # Errors
    /// Returns [`ActionError::AttributeNotFound`] if the request fails, the
    /// status is not a success, or the field is absent from the response.
    pub async fn poll(&self, bearer: &str, name: &str, attr: &str) -> Result<String, ActionError> {
        let url = self.api.url("/v1/instances");
        debug!(url = %url, name = %name, attr = %attr, "GET request");

        let not_found = |reason: String| {
            ActionError::AttributeNotFound(format!(
                "Failed to get {attr} for device {name}: {reason}"
            ))
        };

        let response = self
            .api
            .client()
            .get(&url)
            .query(&[("name", name), ("returnAttr", attr)])
            .header(ACCEPT, "application/json")
            .header("Authorization", format!("Bearer {bearer}"))
            .send()
            .await
            .map_err(|e| not_found(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), attr = %attr, "Attribute query rejected");
            return Err(not_found(status_text(status)));
        }

        let body: Value = response.json().await.map_err(|e| not_found(e.to_string()))?;

        let value = extract_attribute(&body, attr).ok_or_else(|| {
            ActionError::AttributeNotFound(format!("{attr} not found for device {name}"))
        })?;

        info!(name = %name, attr = %attr, value = %value, "Attribute retrieved");
        Ok(value)
    }
}

/// Pull `attr` out of an instance object, or the first instance of a list.
///
/// Null and empty strings count as absent; other scalars are rendered as
/// their JSON text.
fn extract_attribute(body: &Value, attr: &str) -> Option<String> {
    let record = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };

    match record.get(attr)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_attribute_shapes() {
        assert_eq!(
            extract_attribute(&json!({"wifiIp": "10.0.0.5"}), WIFI_IP_ATTR).as_deref(),
            Some("10.0.0.5")
        );
        assert_eq!(
            extract_attribute(&json!([{"wifiIp": "10.0.0.6"}]), WIFI_IP_ATTR).as_deref(),
            Some("10.0.0.6")
        );
        assert_eq!(
            extract_attribute(&json!({"port": 5001}), "port").as_deref(),
            Some("5001")
        );
        assert_eq!(extract_attribute(&json!({"wifiIp": null}), WIFI_IP_ATTR), None);
        assert_eq!(extract_attribute(&json!({"wifiIp": ""}), WIFI_IP_ATTR), None);
        assert_eq!(extract_attribute(&json!([]), WIFI_IP_ATTR), None);
        assert_eq!(extract_attribute(&json!({}), WIFI_IP_ATTR), None);
    }

    #[tokio::test]
    async fn test_poll_returns_attribute() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/instances"))
            .and(query_param("name", "ci-device"))
            .and(query_param("returnAttr", "wifiIp"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wifiIp": "10.0.0.5"})))
            .expect(1)
            .mount(&server)
            .await;

        let poller = AttributePoller::new(ApiClient::new(server.uri()).unwrap());
        let ip = poller.poll("t1", "ci-device", WIFI_IP_ATTR).await.unwrap();
        assert_eq!(ip, "10.0.0.5");
    }

    #[tokio::test]
    async fn test_poll_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ci-device"})))
            .mount(&server)
            .await;

        let poller = AttributePoller::new(ApiClient::new(server.uri()).unwrap());
        let err = poller.poll("t1", "ci-device", WIFI_IP_ATTR).await.unwrap_err();
        assert!(matches!(err, ActionError::AttributeNotFound(_)));
    }

    #[tokio::test]
    async fn test_poll_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/instances"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let poller = AttributePoller::new(ApiClient::new(server.uri()).unwrap());
        let err = poller.poll("t1", "ci-device", WIFI_IP_ATTR).await.unwrap_err();
        assert!(matches!(err, ActionError::AttributeNotFound(_)));
        assert!(err.to_string().contains("Internal Server Error"));
    }
}
