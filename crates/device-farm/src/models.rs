//! Corellium API request and response models.

use serde::{Deserialize, Serialize};

// ============================================================================
// Authentication
// ============================================================================

/// Body of `POST /v1/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Static API token.
    #[serde(rename = "apiToken")]
    pub api_token: &'a str,
}

/// Response of `POST /v1/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Short-lived bearer token.
    pub token: Option<String>,
    /// Token expiry as reported by the server.
    pub expiration: Option<String>,
}

// ============================================================================
// Instances
// ============================================================================

/// Body of `POST /v1/instances`.
#[derive(Debug, Serialize)]
pub struct CreateInstanceRequest<'a> {
    /// Project ID.
    pub project: &'a str,
    /// Instance name.
    pub name: &'a str,
    /// Device flavor.
    pub flavor: &'a str,
    /// OS version.
    pub os: &'a str,
    /// Firmware package reference.
    #[serde(rename = "fwpackage", skip_serializing_if = "Option::is_none")]
    pub fw_package: Option<&'a str>,
}

/// Response of `POST /v1/instances`.
///
/// Only `id` is relied upon; the rest is logged when present.
#[derive(Debug, Deserialize)]
pub struct CreateInstanceResponse {
    /// Instance ID.
    pub id: Option<String>,
    /// Instance state (`creating`, `booting`, `on`, ...).
    pub state: Option<String>,
}
