//! Device provisioning strategies.

pub mod cli;
pub mod corellium;
pub mod runner;
mod traits;

pub use traits::{Credentials, Device, DeviceParams, Provisioner};
