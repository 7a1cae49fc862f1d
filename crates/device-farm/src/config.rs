//! Action configuration.
//!
//! Raw values arrive through [`ActionInputs`], either as command-line flags
//! or from the environment. GitHub Actions exposes secrets as plain
//! environment variables and action inputs as `INPUT_<NAME>` (upper-cased),
//! so both bind through clap's `env` fallback. [`ActionInputs::into_config`]
//! validates them once and produces the [`ActionConfig`] that the rest of
//! the pipeline receives explicitly.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use thiserror::Error;
use url::Url;

use crate::providers::DeviceParams;

/// Settle delay applied when `settleSeconds` is not supplied.
pub const DEFAULT_SETTLE_SECS: u64 = 120;

/// Executable used by the CLI-delegated strategy.
pub const DEFAULT_CLI_PROGRAM: &str = "corellium";

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment secret is absent or empty.
    #[error("Missing environment secret: {0}")]
    MissingSecret(String),

    /// A required action input is absent or empty.
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// A value is present but cannot be used.
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    /// Name of the offending configuration value.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MissingSecret(name) | Self::MissingInput(name) => name,
            Self::Invalid { name, .. } => name,
        }
    }

    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Where a configuration value is expected to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Repository secret or environment variable.
    Secret,
    /// Action input (`with:` block).
    Input,
}

/// Fail with the first value in `values` that is absent or blank.
///
/// Order matters: the error always names the earliest missing entry.
///
/// # Errors
/// Returns [`ConfigError::MissingSecret`] or [`ConfigError::MissingInput`]
/// depending on the entry's [`Source`].
pub fn validate_required<'a, I>(values: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (&'a str, Source, Option<&'a str>)>,
{
    for (name, source, value) in values {
        if value.is_some_and(|v| !v.trim().is_empty()) {
            continue;
        }
        return Err(match source {
            Source::Secret => ConfigError::MissingSecret(name.to_string()),
            Source::Input => ConfigError::MissingInput(name.to_string()),
        });
    }
    Ok(())
}

/// How the device gets created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Direct REST calls with a bearer token.
    #[default]
    Api,
    /// Delegate to the `corellium` command-line tool.
    Cli,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "cli" => Ok(Self::Cli),
            other => Err(ConfigError::invalid(
                "strategy",
                format!("expected 'api' or 'cli', got '{other}'"),
            )),
        }
    }
}

/// Options for the CLI-delegated strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    /// Executable name or path.
    pub program: String,
    /// Pass `--wait` to `instance create`.
    pub wait: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_CLI_PROGRAM.to_string(),
            wait: false,
        }
    }
}

/// Raw, unvalidated action configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ActionInputs {
    /// Corellium API token.
    #[arg(long, env = "CORELLIUM_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Project identifier the device is created in.
    #[arg(long, env = "PROJECT")]
    pub project: Option<String>,

    /// Corellium service base URL.
    #[arg(long, env = "CORELLIUM_SERVER")]
    pub corellium_server: Option<String>,

    /// Server URL override supplied as an action input.
    #[arg(long, env = "INPUT_SERVER")]
    pub server: Option<String>,

    /// Name of the device to create.
    #[arg(long, env = "INPUT_DEVICENAME")]
    pub device_name: Option<String>,

    /// Device flavor (hardware model), e.g. `ranchu`.
    #[arg(long, env = "INPUT_DEVICEFLAVOR")]
    pub device_flavor: Option<String>,

    /// OS version to install, e.g. `13.0.0`.
    #[arg(long, env = "INPUT_DEVICEOS")]
    pub device_os: Option<String>,

    /// Optional firmware package reference.
    #[arg(long, env = "INPUT_FWPACKAGE")]
    pub fw_package: Option<String>,

    /// Provisioning strategy: `api` or `cli`.
    #[arg(long, env = "INPUT_STRATEGY")]
    pub strategy: Option<String>,

    /// Seconds to wait after creation before polling.
    #[arg(long, env = "INPUT_SETTLESECONDS")]
    pub settle_seconds: Option<String>,

    /// Device attribute to poll after the settle delay, e.g. `wifiIp`.
    #[arg(long, env = "INPUT_POLLATTRIBUTE")]
    pub poll_attribute: Option<String>,

    /// Path of the `corellium` executable.
    #[arg(long, env = "INPUT_CLIPATH")]
    pub cli_path: Option<String>,

    /// Pass `--wait` to the CLI create command (`true`/`false`).
    #[arg(long, env = "INPUT_CLIWAIT")]
    pub cli_wait: Option<String>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Static API token.
    pub api_token: String,
    /// Service base URL without a trailing slash.
    pub server: String,
    /// Device to create.
    pub device: DeviceParams,
    /// Provisioning strategy.
    pub strategy: Strategy,
    /// Fixed wait after creation.
    pub settle_delay: Duration,
    /// Attribute to poll, if any.
    pub poll_attribute: Option<String>,
    /// CLI strategy options.
    pub cli: CliOptions,
}

impl ActionInputs {
    /// Validate the raw values and build an [`ActionConfig`].
    ///
    /// Required values are checked in order: `CORELLIUM_API_TOKEN`,
    /// `PROJECT`, `CORELLIUM_SERVER`, then the `deviceFlavor`, `deviceOS`
    /// and `deviceName` inputs.
    ///
    /// # Errors
    /// Returns the first missing or invalid value as a [`ConfigError`].
    pub fn into_config(self) -> Result<ActionConfig, ConfigError> {
        let server = non_blank(self.server).or_else(|| non_blank(self.corellium_server));

        validate_required([
            ("CORELLIUM_API_TOKEN", Source::Secret, self.api_token.as_deref()),
            ("PROJECT", Source::Secret, self.project.as_deref()),
            ("CORELLIUM_SERVER", Source::Secret, server.as_deref()),
            ("deviceFlavor", Source::Input, self.device_flavor.as_deref()),
            ("deviceOS", Source::Input, self.device_os.as_deref()),
            ("deviceName", Source::Input, self.device_name.as_deref()),
        ])?;

        let server = normalize_server(server.as_deref().unwrap_or_default())?;

        let strategy = match non_blank(self.strategy) {
            Some(value) => value.parse()?,
            None => Strategy::default(),
        };

        let settle_secs = match non_blank(self.settle_seconds) {
            Some(value) => value.parse::<u64>().map_err(|e| {
                ConfigError::invalid("settleSeconds", format!("'{value}' is not a number: {e}"))
            })?,
            None => DEFAULT_SETTLE_SECS,
        };

        let wait = match non_blank(self.cli_wait) {
            Some(value) => parse_bool("cliWait", &value)?,
            None => false,
        };

        Ok(ActionConfig {
            api_token: trimmed(self.api_token),
            server,
            device: DeviceParams {
                project: trimmed(self.project),
                name: trimmed(self.device_name),
                flavor: trimmed(self.device_flavor),
                os: trimmed(self.device_os),
                fw_package: non_blank(self.fw_package),
            },
            strategy,
            settle_delay: Duration::from_secs(settle_secs),
            poll_attribute: non_blank(self.poll_attribute),
            cli: CliOptions {
                program: non_blank(self.cli_path)
                    .unwrap_or_else(|| DEFAULT_CLI_PROGRAM.to_string()),
                wait,
            },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trimmed(value: Option<String>) -> String {
    non_blank(value).unwrap_or_default()
}

/// Check the server is an absolute http(s) URL and strip trailing slashes.
fn normalize_server(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid("CORELLIUM_SERVER", e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "CORELLIUM_SERVER",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(ConfigError::invalid(
            name,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
