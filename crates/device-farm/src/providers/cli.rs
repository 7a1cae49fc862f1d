//! Provisioning delegated to the `corellium` command-line tool.
//!
//! The tool is logged in once during [`Provisioner::prepare`] and then asked
//! to create the instance; the identifier is whatever it prints on stdout.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::runner::{CommandOutput, CommandRunner, TokioCommandRunner};
use super::traits::{Credentials, DeviceParams, Provisioner};
use crate::config::CliOptions;
use crate::error::ActionError;

/// Corellium CLI provisioner.
pub struct CorelliumCli<R = TokioCommandRunner> {
    runner: R,
    program: String,
    endpoint: String,
    wait: bool,
}

impl CorelliumCli<TokioCommandRunner> {
    /// Provisioner spawning real processes.
    #[must_use]
    pub fn new(options: &CliOptions, endpoint: impl Into<String>) -> Self {
        Self::with_runner(TokioCommandRunner, options, endpoint)
    }
}

impl<R: CommandRunner> CorelliumCli<R> {
    /// Provisioner using a custom [`CommandRunner`].
    pub fn with_runner(runner: R, options: &CliOptions, endpoint: impl Into<String>) -> Self {
        Self {
            runner,
            program: options.program.clone(),
            endpoint: endpoint.into(),
            wait: options.wait,
        }
    }

    fn login_args(&self, api_token: &str) -> Vec<String> {
        vec![
            "login".to_string(),
            "--endpoint".to_string(),
            self.endpoint.clone(),
            "--apitoken".to_string(),
            api_token.to_string(),
        ]
    }

    fn create_args(&self, params: &DeviceParams) -> Vec<String> {
        let mut args = vec![
            "instance".to_string(),
            "create".to_string(),
            params.flavor.clone(),
            params.os.clone(),
            params.project.clone(),
        ];
        if self.wait {
            args.push("--wait".to_string());
        }
        args.push("--name".to_string());
        args.push(params.name.clone());
        args
    }
}

/// The CLI reports problems on stderr and does not reliably set its exit
/// code, so any stderr output fails the step whatever the exit code says.
fn check_stderr(
    output: &CommandOutput,
    fail: impl FnOnce(String) -> ActionError,
) -> Result<(), ActionError> {
    if output.has_stderr() {
        return Err(fail(output.stderr.trim().to_string()));
    }
    if output.exit_code != Some(0) {
        warn!(exit_code = ?output.exit_code, "Command exited abnormally with empty stderr");
    }
    Ok(())
}

#[async_trait]
impl<R: CommandRunner> Provisioner for CorelliumCli<R> {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn needs_bearer(&self) -> bool {
        false
    }

    async fn prepare(&self, credentials: &Credentials) -> Result<(), ActionError> {
        debug!(program = %self.program, endpoint = %self.endpoint, "Logging in via CLI");

        let output = self
            .runner
            .run(&self.program, &self.login_args(&credentials.api_token))
            .await
            .map_err(|e| {
                ActionError::Authentication(format!("Failed to run {} login: {e}", self.program))
            })?;

        check_stderr(&output, |stderr| {
            ActionError::Authentication(format!("{} login failed: {stderr}", self.program))
        })?;

        info!(endpoint = %self.endpoint, "Logged in via CLI");
        Ok(())
    }

    async fn provision(
        &self,
        _credentials: &Credentials,
        params: &DeviceParams,
    ) -> Result<String, ActionError> {
        if params.fw_package.is_some() {
            warn!("Firmware package is not supported by the CLI strategy and will be ignored");
        }

        info!(
            name = %params.name,
            flavor = %params.flavor,
            os = %params.os,
            project = %params.project,
            wait = self.wait,
            "Creating device via CLI"
        );

        let output = self
            .runner
            .run(&self.program, &self.create_args(params))
            .await
            .map_err(|e| {
                ActionError::Provisioning(format!("Failed to run {} instance create: {e}", self.program))
            })?;

        check_stderr(&output, |stderr| {
            ActionError::Provisioning(format!("Failed to create device: {stderr}"))
        })?;

        let id = output.stdout.trim();
        if id.is_empty() {
            return Err(ActionError::Provisioning(format!(
                "Failed to retrieve device ID from {}",
                self.program
            )));
        }

        info!(device_id = %id, "Device created");
        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::runner::MockCommandRunner;

    fn params() -> DeviceParams {
        DeviceParams {
            project: "proj-1".to_string(),
            name: "ci-device".to_string(),
            flavor: "ranchu".to_string(),
            os: "13.0.0".to_string(),
            fw_package: None,
        }
    }

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: Some(exit_code),
        }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_provision_trims_stdout() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|program, args| {
                assert_eq!(program.to_string(), "corellium");
                assert_eq!(
                    args.to_vec(),
                    strings(&["instance", "create", "ranchu", "13.0.0", "proj-1", "--name", "ci-device"])
                );
                Ok(output("dev-456\n", "", 0))
            });

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        let id = cli.provision(&Credentials::default(), &params()).await.unwrap();
        assert_eq!(id, "dev-456");
    }

    #[tokio::test]
    async fn test_provision_passes_wait_flag() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_, args| {
            assert!(args.to_vec().contains(&"--wait".to_string()));
            Ok(output("dev-1", "", 0))
        });

        let options = CliOptions {
            program: "corellium".to_string(),
            wait: true,
        };
        let cli = CorelliumCli::with_runner(runner, &options, "https://c.example");
        assert_eq!(
            cli.provision(&Credentials::default(), &params()).await.unwrap(),
            "dev-1"
        );
    }

    #[tokio::test]
    async fn test_stderr_is_fatal_even_on_success_exit() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output("dev-456\n", "warning: quota nearly exhausted\n", 0)));

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        let err = cli
            .provision(&Credentials::default(), &params())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Provisioning(_)));
        assert!(err.to_string().contains("quota nearly exhausted"));
    }

    #[tokio::test]
    async fn test_empty_stdout_is_fatal() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| Ok(output("  \n", "", 0)));

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        let err = cli
            .provision(&Credentials::default(), &params())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Provisioning(_)));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_provisioning_error() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
        });

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        let err = cli
            .provision(&Credentials::default(), &params())
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Provisioning(_)));
    }

    #[tokio::test]
    async fn test_prepare_logs_in() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|program, args| {
            assert_eq!(program.to_string(), "corellium");
            assert_eq!(
                args.to_vec(),
                strings(&["login", "--endpoint", "https://c.example", "--apitoken", "static"])
            );
            Ok(output("Logged in\n", "", 0))
        });

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        cli.prepare(&Credentials::new("static")).await.unwrap();
    }

    #[tokio::test]
    async fn test_prepare_stderr_is_authentication_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Ok(output("", "Invalid API token\n", 1)));

        let cli = CorelliumCli::with_runner(runner, &CliOptions::default(), "https://c.example");
        let err = cli.prepare(&Credentials::new("bad")).await.unwrap_err();
        assert!(matches!(err, ActionError::Authentication(_)));
        assert_eq!(err.to_string(), "corellium login failed: Invalid API token");
    }

    #[test]
    fn test_cli_does_not_need_bearer() {
        let cli = CorelliumCli::new(&CliOptions::default(), "https://c.example");
        assert!(!cli.needs_bearer());
        assert_eq!(cli.name(), "cli");
    }
}
