//! External process execution with a deadline.
//!
//! # Responsibilities
//! - Spawn a program with captured stdout/stderr
//! - Enforce the per-command timeout, killing the child when it fires
//! - Report exit status without interpreting it

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::runtime::RuntimeError;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs external programs. The seam the docker driver is tested through.
pub trait ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> impl Future<Output = Result<ProcessOutput, RuntimeError>>;
}

/// Runs real processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, RuntimeError> {
        let command = command_line(program, args);
        tracing::debug!(%command, "Spawning");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RuntimeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| RuntimeError::Spawn {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(RuntimeError::Timeout {
                    command,
                    after: timeout,
                })
            }
        };

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render a command for logs and error messages.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
