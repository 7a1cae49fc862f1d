//! Appium-driven UI flows.
//!
//! A minimal W3C WebDriver client ([`WebDriver`]) plus flows expressed as
//! ordered [`Step`]s. The only flow today is the cafe ordering test that
//! runs against a freshly provisioned Android device.
//!
//! ## Example
//!
//! ```ignore
//! use appium_flow::{cafe, run_flow, WebDriver};
//!
//! let caps = cafe::capabilities("10.11.1.1:5001", cafe::APP_PACKAGE, None);
//! let driver = WebDriver::new_session("http://127.0.0.1:4723", caps).await?;
//! run_flow(&driver, &cafe::order_steps()).await?;
//! driver.delete_session().await?;
//! ```

pub mod cafe;
pub mod driver;
pub mod flow;
pub mod selector;

pub use driver::{Driver, DriverError, ElementId, WebDriver};
pub use flow::{run_flow, FlowError, Step};
pub use selector::{Selector, SelectorError, Strategy};
