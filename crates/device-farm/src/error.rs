//! Error kinds raised by the provisioning pipeline.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a provisioning run.
///
/// Every stage maps its failures onto exactly one of these kinds and
/// propagates them unchanged to the top-level handler.
#[derive(Error, Debug)]
pub enum ActionError {
    /// A required secret or input is missing or malformed.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Login was rejected or returned no usable token.
    #[error("{0}")]
    Authentication(String),

    /// Instance creation was rejected or returned no identifier.
    #[error("{0}")]
    Provisioning(String),

    /// The polled attribute was absent or could not be queried.
    #[error("{0}")]
    AttributeNotFound(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ActionError {
    /// Short name of the error kind, used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Authentication(_) => "authentication",
            Self::Provisioning(_) => "provisioning",
            Self::AttributeNotFound(_) => "attribute_not_found",
            Self::Client(_) => "client",
        }
    }
}
