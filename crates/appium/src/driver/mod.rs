//! Automation driver abstraction and its W3C WebDriver implementation.

mod client;
mod models;

use async_trait::async_trait;
use thiserror::Error;

use crate::selector::Selector;

pub use client::WebDriver;

/// Errors that can occur while driving a device.
#[derive(Error, Debug)]
pub enum DriverError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The driver answered with a W3C error object.
    #[error("WebDriver error: {status} {error} - {message}")]
    WebDriver {
        status: u16,
        error: String,
        message: String,
    },

    /// A successful response lacked an expected field.
    #[error("Missing field in driver response: {0}")]
    MissingField(&'static str),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Opaque element reference returned by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(pub String);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element lookups and interactions against a live session.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Find the first element matching `selector`.
    async fn find_element(&self, selector: &Selector) -> Result<ElementId, DriverError>;

    /// Tap / click an element.
    async fn click(&self, element: &ElementId) -> Result<(), DriverError>;

    /// Type `text` into an element, appending to its current value.
    async fn add_value(&self, element: &ElementId, text: &str) -> Result<(), DriverError>;
}
