//! Direct REST provisioning against the Corellium API.
//!
//! API Documentation: <https://app.corellium.com/api/docs>

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};

use super::traits::{Credentials, DeviceParams, Provisioner};
use crate::error::ActionError;
use crate::http::{status_text, ApiClient};
use crate::models::{CreateInstanceRequest, CreateInstanceResponse};

/// Message used when creation succeeds but yields no identifier.
const NO_DEVICE_ID: &str = "Failed to retrieve device ID from Corellium";

/// Corellium REST provisioner.
#[derive(Clone, Debug)]
pub struct Corellium {
    api: ApiClient,
}

impl Corellium {
    /// Create a provisioner using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Provisioner for Corellium {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn provision(
        &self,
        credentials: &Credentials,
        params: &DeviceParams,
    ) -> Result<String, ActionError> {
        let bearer = credentials.bearer.as_deref().ok_or_else(|| {
            ActionError::Provisioning("Failed to create device: not authenticated".to_string())
        })?;

        info!(
            name = %params.name,
            flavor = %params.flavor,
            os = %params.os,
            project = %params.project,
            "Creating device"
        );

        let body = CreateInstanceRequest {
            project: &params.project,
            name: &params.name,
            flavor: &params.flavor,
            os: &params.os,
            fw_package: params.fw_package.as_deref(),
        };

        let url = self.api.url("/v1/instances");
        debug!(url = %url, "POST request");

        let response = self
            .api
            .client()
            .post(&url)
            .header(ACCEPT, "application/json")
            .header("Authorization", format!("Bearer {bearer}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ActionError::Provisioning(format!("Failed to create device: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Device creation rejected");
            return Err(ActionError::Provisioning(format!(
                "Failed to create device: {}",
                status_text(status)
            )));
        }

        let created: CreateInstanceResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse create response");
            ActionError::Provisioning(NO_DEVICE_ID.to_string())
        })?;

        let id = created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ActionError::Provisioning(NO_DEVICE_ID.to_string()))?;

        info!(device_id = %id, state = ?created.state, "Device created");
        Ok(id)
    }
}
