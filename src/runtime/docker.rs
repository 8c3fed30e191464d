//! Docker CLI driver.
//!
//! # Responsibilities
//! - Translate container operations into `docker` invocations
//! - Force-remove, so a leftover running container never blocks a fresh run
//! - Treat "No such container" on rm/stop as already done
//! - Turn non-zero exits into `RuntimeError::Failed` with stderr attached

use std::time::Duration;

use crate::runtime::process::{command_line, ProcessOutput, ProcessRunner, SystemRunner};
use crate::runtime::{ContainerRuntime, ContainerSpec, RuntimeError};

/// Container runtime that shells out to the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli<R = SystemRunner> {
    binary: String,
    timeout: Duration,
    runner: R,
}

impl DockerCli<SystemRunner> {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self::with_runner(binary, timeout, SystemRunner)
    }
}

impl<R: ProcessRunner> DockerCli<R> {
    pub fn with_runner(binary: impl Into<String>, timeout: Duration, runner: R) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            runner,
        }
    }

    async fn exec(&self, args: Vec<String>) -> Result<(ProcessOutput, String), RuntimeError> {
        let output = self.runner.run(&self.binary, &args, self.timeout).await?;
        Ok((output, command_line(&self.binary, &args)))
    }

    /// Run a command whose target may legitimately not exist.
    async fn exec_idempotent(&self, args: Vec<String>, name: &str) -> Result<(), RuntimeError> {
        let (output, command) = self.exec(args).await?;
        if output.success {
            return Ok(());
        }
        if is_missing_container(&output.stderr) {
            tracing::debug!(container = name, %command, "Container does not exist, nothing to do");
            return Ok(());
        }
        Err(failed(command, output))
    }
}

impl<R: ProcessRunner> ContainerRuntime for DockerCli<R> {
    async fn is_running(&self, name: &str) -> Result<bool, RuntimeError> {
        let (output, command) = self
            .exec(vec![
                "ps".into(),
                "--filter".into(),
                format!("name=^{}$", name),
                "--format".into(),
                "{{.Names}}".into(),
            ])
            .await?;

        if !output.success {
            return Err(failed(command, output));
        }
        Ok(output.stdout.lines().any(|line| line.trim() == name))
    }

    async fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        self.exec_idempotent(vec!["rm".into(), "-f".into(), name.into()], name).await
    }

    async fn run(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        let (output, command) = self.exec(run_args(spec)).await?;
        if !output.success {
            return Err(failed(command, output));
        }
        tracing::debug!(container = %spec.name, id = output.stdout.trim(), "Container started");
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), RuntimeError> {
        self.exec_idempotent(vec!["stop".into(), name.into()], name).await
    }
}

/// Arguments for `docker run -d ...`.
pub fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec!["run".to_string(), "-d".into(), "--name".into(), spec.name.clone()];

    if let Some(network) = spec.network.as_deref().filter(|n| !n.is_empty()) {
        args.push("--net".into());
        args.push(network.to_string());
    }
    for volume in &spec.volumes {
        args.push("-v".into());
        args.push(volume.to_string());
    }
    for port in &spec.ports {
        args.push("-p".into());
        args.push(port.clone());
    }

    args.push(spec.image.clone());
    args.extend(spec.command.iter().cloned());
    args
}

fn is_missing_container(stderr: &str) -> bool {
    stderr.to_ascii_lowercase().contains("no such container")
}

fn failed(command: String, output: ProcessOutput) -> RuntimeError {
    RuntimeError::Failed {
        command,
        code: output.code,
        stderr: output.stderr.trim().to_string(),
    }
}
