//! Device farm action - provision a Corellium virtual device from CI.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use device_farm::{run_action, ActionInputs, GithubReporter};

/// Device farm action - provision a virtual device for CI tests.
#[derive(Parser)]
#[command(name = "device-farm")]
#[command(about = "Provision a Corellium virtual device and report back to CI")]
struct Cli {
    #[command(flatten)]
    inputs: ActionInputs,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Stdout carries workflow commands, so logs go to stderr.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to initialize logging")?;

    let mut reporter = GithubReporter::from_env();
    Ok(run_action(cli.inputs, &mut reporter).await.exit_code())
}
