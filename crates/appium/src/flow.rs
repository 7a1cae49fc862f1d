//! Ordered UI steps and their replay.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::driver::{Driver, DriverError};
use crate::selector::Selector;

/// One interaction with the app under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Find the element and click it.
    Click(Selector),
    /// Find the element and type text into it.
    AddValue(Selector, String),
}

impl Step {
    /// Element targeted by this step.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        match self {
            Self::Click(selector) | Self::AddValue(selector, _) => selector,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click(selector) => write!(f, "click {selector}"),
            Self::AddValue(selector, text) => write!(f, "type '{text}' into {selector}"),
        }
    }
}

/// A step failed.
#[derive(Error, Debug)]
#[error("Step {index} ({step}) failed: {source}")]
pub struct FlowError {
    /// 1-based index of the failing step.
    pub index: usize,
    /// Description of the failing step.
    pub step: String,
    /// Underlying driver error.
    #[source]
    pub source: DriverError,
}

/// Replay `steps` in order, stopping at the first failure.
///
/// # Errors
/// Returns the first failing step wrapped in a [`FlowError`].
pub async fn run_flow(driver: &dyn Driver, steps: &[Step]) -> Result<(), FlowError> {
    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        info!(step = index, total = steps.len(), "{step}");

        run_step(driver, step).await.map_err(|source| FlowError {
            index,
            step: step.to_string(),
            source,
        })?;
    }

    info!(steps = steps.len(), "Flow completed");
    Ok(())
}

async fn run_step(driver: &dyn Driver, step: &Step) -> Result<(), DriverError> {
    let element = driver.find_element(step.selector()).await?;
    debug!(element = %element, "Element found");

    match step {
        Step::Click(_) => driver.click(&element).await,
        Step::AddValue(_, text) => driver.add_value(&element, text).await,
    }
}
