//! Subprocess execution behind a narrow trait so the CLI strategy can be
//! driven without spawning real processes.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code; `None` when terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Whether anything at all was written to standard error.
    #[must_use]
    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Runs external commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        debug!(
            program = %program,
            exit_code = ?output.status.code(),
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "Command finished"
        );

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        })
    }
}
