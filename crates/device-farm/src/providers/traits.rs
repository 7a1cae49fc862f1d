//! Provisioner trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// Credentials for one run.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Static API token from configuration.
    pub api_token: String,
    /// Short-lived bearer token, once logged in.
    pub bearer: Option<String>,
}

impl Credentials {
    /// Credentials holding only the static token.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            bearer: None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"[REDACTED]")
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Parameters for creating a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceParams {
    /// Project the device belongs to.
    pub project: String,
    /// Device name.
    pub name: String,
    /// Hardware model tag (e.g., "ranchu", "iphone14p").
    pub flavor: String,
    /// OS version tag (e.g., "13.0.0").
    pub os: String,
    /// Optional firmware package reference.
    pub fw_package: Option<String>,
}

/// A created device as observed by this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque identifier assigned by the platform.
    pub id: String,
    /// Device name.
    pub name: String,
    /// Hardware model tag.
    pub flavor: String,
    /// OS version tag.
    pub os: String,
    /// WiFi IP, if it was polled.
    pub wifi_ip: Option<String>,
}

impl Device {
    /// Record for a freshly created device.
    #[must_use]
    pub fn created(id: impl Into<String>, params: &DeviceParams) -> Self {
        Self {
            id: id.into(),
            name: params.name.clone(),
            flavor: params.flavor.clone(),
            os: params.os.clone(),
            wifi_ip: None,
        }
    }
}

/// A way of creating a device instance.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether [`Provisioner::provision`] needs `credentials.bearer`.
    fn needs_bearer(&self) -> bool {
        true
    }

    /// One-time setup before the first [`Provisioner::provision`] call.
    async fn prepare(&self, _credentials: &Credentials) -> Result<(), ActionError> {
        Ok(())
    }

    /// Create a device and return its identifier.
    async fn provision(
        &self,
        credentials: &Credentials,
        params: &DeviceParams,
    ) -> Result<String, ActionError>;
}
