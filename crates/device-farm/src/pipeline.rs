//! The provisioning pipeline shared by every action variant.
//!
//! ```text
//! validate ─► authenticate? ─► prepare ─► provision ─► settle ─► poll? ─► report
//! ```
//!
//! Any error short-circuits to [`run_action`], which is the only place
//! failures are handled. Nothing is retried and a device created before a
//! later failure is left in place.

use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info};

use crate::auth::Authenticator;
use crate::config::{ActionConfig, ActionInputs, Strategy};
use crate::delay::settle;
use crate::error::ActionError;
use crate::http::ApiClient;
use crate::poller::{AttributePoller, WIFI_IP_ATTR};
use crate::providers::cli::CorelliumCli;
use crate::providers::corellium::Corellium;
use crate::providers::{Credentials, Device, Provisioner};
use crate::report::Reporter;

/// Step output carrying the device identifier.
pub const DEVICE_ID_OUTPUT: &str = "deviceId";

/// Optional stages of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Wait after creation.
    pub settle_delay: Duration,
    /// Attribute to poll after settling.
    pub poll_attribute: Option<String>,
}

/// A polled attribute and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, e.g. `wifiIp`.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The created device.
    pub device: Device,
    /// Polled attribute, if polling was enabled.
    pub attribute: Option<Attribute>,
}

impl Outcome {
    /// Human-readable success summary.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.attribute {
            Some(attr) => format!(
                "Device {} provisioned, {}: {}",
                self.device.id, attr.name, attr.value
            ),
            None => format!("Device {} provisioned", self.device.id),
        }
    }
}

/// Final status of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything succeeded.
    Succeeded(Outcome),
    /// The run failed with this message.
    Failed(String),
}

impl RunStatus {
    /// Process exit code for this status.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Succeeded(_) => ExitCode::SUCCESS,
            Self::Failed(_) => ExitCode::FAILURE,
        }
    }
}

/// Validate → authenticate → provision → settle → poll.
pub struct Pipeline {
    authenticator: Authenticator,
    provisioner: Box<dyn Provisioner>,
    poller: AttributePoller,
    options: PipelineOptions,
}

impl Pipeline {
    /// Assemble a pipeline from its parts.
    #[must_use]
    pub fn new(
        authenticator: Authenticator,
        provisioner: Box<dyn Provisioner>,
        poller: AttributePoller,
        options: PipelineOptions,
    ) -> Self {
        Self {
            authenticator,
            provisioner,
            poller,
            options,
        }
    }

    /// Build the pipeline selected by `config`.
    ///
    /// # Errors
    /// Returns error if HTTP client cannot be created.
    pub fn from_config(config: &ActionConfig) -> Result<Self, ActionError> {
        let api = ApiClient::new(&config.server)?;

        let provisioner: Box<dyn Provisioner> = match config.strategy {
            Strategy::Api => Box::new(Corellium::new(api.clone())),
            Strategy::Cli => Box::new(CorelliumCli::new(&config.cli, &config.server)),
        };

        Ok(Self::new(
            Authenticator::new(api.clone()),
            provisioner,
            AttributePoller::new(api),
            PipelineOptions {
                settle_delay: config.settle_delay,
                poll_attribute: config.poll_attribute.clone(),
            },
        ))
    }

    /// Run every stage for the device described by `config`.
    ///
    /// # Errors
    /// Returns the first stage error unchanged.
    pub async fn run(
        &self,
        config: &ActionConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<Outcome, ActionError> {
        let mut credentials = Credentials::new(config.api_token.clone());

        // Polling always needs a bearer token, even with the CLI strategy.
        if self.provisioner.needs_bearer() || self.options.poll_attribute.is_some() {
            let token = self.authenticator.login(&credentials.api_token).await?;
            credentials.bearer = Some(token);
            reporter.info("Successfully authenticated with Corellium");
        }

        info!(strategy = self.provisioner.name(), "Provisioning device");
        self.provisioner.prepare(&credentials).await?;
        let device_id = self.provisioner.provision(&credentials, &config.device).await?;
        if device_id.is_empty() {
            return Err(ActionError::Provisioning(
                "Provisioner returned an empty device ID".to_string(),
            ));
        }

        let mut device = Device::created(device_id, &config.device);
        reporter.info(&format!("Device created with ID: {}", device.id));

        settle(self.options.settle_delay).await;

        let attribute = match &self.options.poll_attribute {
            Some(name) => {
                let bearer = credentials.bearer.as_deref().ok_or_else(|| {
                    ActionError::AttributeNotFound(format!(
                        "Cannot query {name} for device {}: not authenticated",
                        device.id
                    ))
                })?;
                let value = self.poller.poll(bearer, &device.name, name).await?;
                reporter.info(&format!("Device {} {name}: {value}", device.id));
                if name == WIFI_IP_ATTR {
                    device.wifi_ip = Some(value.clone());
                }
                Some(Attribute {
                    name: name.clone(),
                    value,
                })
            }
            None => None,
        };

        Ok(Outcome { device, attribute })
    }
}

/// Validate `inputs`, run the configured pipeline and report the result.
pub async fn run_action(inputs: ActionInputs, reporter: &mut dyn Reporter) -> RunStatus {
    match execute(inputs, reporter).await {
        Ok(outcome) => {
            info!(device_id = %outcome.device.id, "Run succeeded");
            reporter.info(&outcome.message());
            reporter.set_output(DEVICE_ID_OUTPUT, &outcome.device.id);
            if let Some(attr) = &outcome.attribute {
                reporter.set_output(&attr.name, &attr.value);
            }
            RunStatus::Succeeded(outcome)
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Run failed");
            let message = format!("An error occurred: {e}");
            reporter.set_failed(&message);
            RunStatus::Failed(message)
        }
    }
}

async fn execute(inputs: ActionInputs, reporter: &mut dyn Reporter) -> Result<Outcome, ActionError> {
    let config = inputs.into_config()?;
    info!(
        server = %config.server,
        strategy = %config.strategy,
        device = %config.device.name,
        "Configuration validated"
    );

    let pipeline = Pipeline::from_config(&config)?;
    pipeline.run(&config, reporter).await
}
