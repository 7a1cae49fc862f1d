//! W3C WebDriver request and response models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which W3C drivers return element references.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Key used by legacy JSON Wire Protocol drivers.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Every WebDriver response wraps its payload in `value`.
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    /// Response payload.
    #[serde(default)]
    pub value: Value,
    /// Session ID (legacy drivers return it at the top level).
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// W3C error payload.
#[derive(Debug, Deserialize)]
pub struct WireError {
    /// Error code, e.g. `no such element`.
    pub error: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /session`.
#[derive(Debug, Serialize)]
pub struct NewSessionRequest {
    /// Capability negotiation block.
    pub capabilities: CapabilitiesRequest,
}

/// W3C capabilities block.
#[derive(Debug, Serialize)]
pub struct CapabilitiesRequest {
    /// Capabilities every match must satisfy.
    #[serde(rename = "alwaysMatch")]
    pub always_match: Value,
    /// Alternatives; a single empty entry means "no alternatives".
    #[serde(rename = "firstMatch")]
    pub first_match: Vec<Value>,
}

/// Body of `POST /session/{id}/element`.
#[derive(Debug, Serialize)]
pub struct FindElementRequest<'a> {
    /// Locator strategy.
    pub using: &'a str,
    /// Locator value.
    pub value: &'a str,
}

/// Body of `POST /session/{id}/element/{id}/value`.
#[derive(Debug, Serialize)]
pub struct SendKeysRequest<'a> {
    /// Text to type.
    pub text: &'a str,
}
