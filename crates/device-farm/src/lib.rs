//! Virtual device provisioning for CI pipelines.
//!
//! This crate backs the GitHub Action entrypoints that create a single
//! virtual mobile device on Corellium. Every run is the same linear
//! pipeline:
//!
//! ```text
//! validate ─► authenticate? ─► provision(strategy) ─► settle ─► poll? ─► report
//! ```
//!
//! Two provisioning strategies are interchangeable behind the
//! [`Provisioner`] trait:
//!
//! - [`Corellium`] talks to the REST API directly with a bearer token.
//! - [`CorelliumCli`] shells out to the `corellium` command-line tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use device_farm::{run_action, ActionInputs, GithubReporter};
//!
//! #[tokio::main]
//! async fn main() -> std::process::ExitCode {
//!     let inputs = ActionInputs::default();
//!     let mut reporter = GithubReporter::from_env();
//!     run_action(inputs, &mut reporter).await.exit_code()
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod delay;
pub mod error;
pub mod http;
pub mod models;
pub mod pipeline;
pub mod poller;
pub mod providers;
pub mod report;

pub use auth::Authenticator;
pub use config::{ActionConfig, ActionInputs, ConfigError, Strategy};
pub use error::ActionError;
pub use pipeline::{run_action, Outcome, Pipeline, PipelineOptions, RunStatus};
pub use poller::{AttributePoller, WIFI_IP_ATTR};
pub use providers::cli::CorelliumCli;
pub use providers::corellium::Corellium;
pub use providers::runner::{CommandOutput, CommandRunner, TokioCommandRunner};
pub use providers::{Credentials, Device, DeviceParams, Provisioner};
pub use report::{GithubReporter, Reporter};
