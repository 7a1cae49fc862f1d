//! Reporting run status back to the CI system.
//!
//! [`GithubReporter`] speaks the GitHub Actions workflow command protocol:
//! plain stdout lines for informational messages, `::error::` for the
//! failure, and the `GITHUB_OUTPUT` file for step outputs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// Sink for run status.
pub trait Reporter {
    /// Emit an informational status line.
    fn info(&mut self, message: &str);

    /// Publish a named step output.
    fn set_output(&mut self, name: &str, value: &str);

    /// Mark the run as failed with `message`.
    fn set_failed(&mut self, message: &str);
}

/// GitHub Actions reporter.
pub struct GithubReporter<W = io::Stdout> {
    out: W,
    output_file: Option<PathBuf>,
    failed: bool,
}

impl GithubReporter<io::Stdout> {
    /// Reporter writing to stdout, with outputs going to `$GITHUB_OUTPUT`.
    #[must_use]
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self::new(io::stdout(), output_file)
    }
}

impl<W: Write> GithubReporter<W> {
    /// Reporter writing workflow commands to `out`.
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self {
            out,
            output_file,
            failed: false,
        }
    }

    /// Whether [`Reporter::set_failed`] has been called.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Consume the reporter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            warn!(error = %e, "Failed to write workflow command");
        }
    }
}

impl<W: Write> Reporter for GithubReporter<W> {
    fn info(&mut self, message: &str) {
        self.line(message);
    }

    fn set_output(&mut self, name: &str, value: &str) {
        if let Some(path) = &self.output_file {
            if let Err(e) = append_output_file(path, name, value) {
                warn!(error = %e, path = %path.display(), "Failed to write step output");
            }
            return;
        }
        let line = format!(
            "::set-output name={}::{}",
            escape_property(name),
            escape_data(value)
        );
        self.line(&line);
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        let line = format!("::error::{}", escape_data(message));
        self.line(&line);
    }
}

/// Append one output to a `GITHUB_OUTPUT` file, using a heredoc-style
/// delimiter for multi-line values.
fn append_output_file(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        writeln!(file, "{name}<<{delimiter}")?;
        writeln!(file, "{value}")?;
        writeln!(file, "{delimiter}")
    } else {
        writeln!(file, "{name}={value}")
    }
}

/// Escape workflow command data.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape workflow command property values.
#[must_use]
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
