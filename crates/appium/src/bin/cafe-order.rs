//! Cafe order UI test - places a guest order through Appium.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use appium_flow::{cafe, run_flow, WebDriver};

/// Cafe order UI test against a provisioned device.
#[derive(Parser)]
#[command(name = "cafe-order")]
#[command(about = "Place a cafe order on a device through an Appium server")]
struct Cli {
    /// Appium server URL.
    #[arg(long, env = "APPIUM_URL", default_value = "http://127.0.0.1:4723")]
    appium_url: String,

    /// Device UDID, e.g. `<wifi ip>:5001`.
    #[arg(long, env = "DEVICE_UDID")]
    udid: String,

    /// Application package.
    #[arg(long, default_value = cafe::APP_PACKAGE)]
    app_package: String,

    /// Launch activity (optional).
    #[arg(long)]
    app_activity: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let caps = cafe::capabilities(&cli.udid, &cli.app_package, cli.app_activity.as_deref());
    let driver = WebDriver::new_session(&cli.appium_url, caps)
        .await
        .with_context(|| format!("Failed to start Appium session at {}", cli.appium_url))?;

    let result = run_flow(&driver, &cafe::order_steps()).await;

    if let Err(e) = driver.delete_session().await {
        warn!(error = %e, "Failed to delete Appium session");
    }

    result.context("Cafe order flow failed")?;
    info!("Order placed");
    Ok(())
}
