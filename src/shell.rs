//! Shell invocation seam.
//!
//! Everything in this crate that touches a child process goes through the
//! [`Shell`] trait, so the adapter and locator can be exercised against a
//! scripted double in tests while production code uses [`SystemShell`].

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Completed process output, regardless of exit code.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Invocation-level failure: the process could not be spawned, timed out,
/// or the shell layer surfaced a non-zero exit as an error.
///
/// Distinct from a semantic failure, where the process ran to completion
/// and reported an error on stderr with a non-zero exit code.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProcessFault {
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub message: String,
}

impl ProcessFault {
    pub fn spawn_failure(message: impl Into<String>) -> Self {
        Self {
            exit_code: None,
            stdout: None,
            stderr: None,
            message: message.into(),
        }
    }
}

/// Generic command-execution capability.
#[async_trait]
pub trait Shell: Send + Sync {
    /// Run `command` through the system shell in `cwd`, bounded by `timeout_ms`.
    ///
    /// Completion with a non-zero exit code is `Ok`; only spawn failures and
    /// timeouts are faults.
    async fn run(
        &self,
        command: &str,
        cwd: &Path,
        timeout_ms: u64,
    ) -> Result<ProcessOutput, ProcessFault>;
}

/// Real process spawner backed by `/bin/sh -c`.
pub struct SystemShell;

#[async_trait]
impl Shell for SystemShell {
    async fn run(
        &self,
        command: &str,
        cwd: &Path,
        timeout_ms: u64,
    ) -> Result<ProcessOutput, ProcessFault> {
        tracing::debug!("Running command in {:?}: {}", cwd, command);

        let output = match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            Command::new("/bin/sh")
                .arg("-c")
                .arg(command)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!("Failed to spawn command: {}", e);
                return Err(ProcessFault::spawn_failure(format!(
                    "Failed to execute command: {}",
                    e
                )));
            }
            Err(_) => {
                tracing::warn!("Command timed out after {} ms: {}", timeout_ms, command);
                return Err(ProcessFault::spawn_failure(format!(
                    "Command timed out after {} ms",
                    timeout_ms
                )));
            }
        };

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tmp() -> PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn run_captures_stdout_and_zero_exit() {
        let out = SystemShell
            .run("printf hello", &tmp(), 5_000)
            .await
            .unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "hello");
        assert_eq!(out.stderr, "");
    }

    #[tokio::test]
    async fn run_reports_nonzero_exit_as_ok() {
        let out = SystemShell
            .run("printf oops >&2; exit 3", &tmp(), 5_000)
            .await
            .unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr, "oops");
    }

    #[tokio::test]
    async fn run_times_out() {
        let err = SystemShell
            .run("sleep 5", &tmp(), 100)
            .await
            .unwrap_err();
        assert!(err.message.contains("timed out"));
        assert_eq!(err.exit_code, None);
    }

    #[tokio::test]
    async fn run_in_missing_cwd_is_a_fault() {
        let err = SystemShell
            .run("true", Path::new("/nonexistent-dir-for-test"), 5_000)
            .await
            .unwrap_err();
        assert!(err.message.contains("Failed to execute"));
    }
}
