//! Container runtime subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle step (activate / deactivate / start balancer)
//!     → ContainerRuntime (is_running / remove / run / stop)
//!     → docker.rs (build `docker ...` arguments, interpret exit status)
//!     → process.rs (spawn with deadline, capture output)
//! ```
//!
//! # Design Decisions
//! - Narrow capability: four operations, nothing else
//! - rm/stop of a missing container succeed (re-runnable deploys)
//! - Every command carries the configured timeout

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::resilience::Retryable;

pub mod docker;
pub mod process;

pub use docker::DockerCli;
pub use process::{ProcessOutput, ProcessRunner, SystemRunner};

/// Errors from the container runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("`{command}` exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl Retryable for RuntimeError {
    fn is_transient(&self) -> bool {
        !matches!(self, RuntimeError::Failed { .. })
    }
}

/// Bind mount for `docker run -v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub source: String,
    pub target: String,
    pub read_only: bool,
}

impl VolumeMount {
    pub fn read_only(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: true,
        }
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)?;
        if self.read_only {
            write!(f, ":ro")?;
        }
        Ok(())
    }
}

/// Everything needed to start one detached container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub network: Option<String>,
    pub ports: Vec<String>,
    pub volumes: Vec<VolumeMount>,
    pub command: Vec<String>,
}

/// Container lifecycle operations the deploy helper depends on.
pub trait ContainerRuntime {
    /// Whether a container with exactly this name is running.
    fn is_running(&self, name: &str) -> impl Future<Output = Result<bool, RuntimeError>>;

    /// Remove a stopped container. A missing container is not an error.
    fn remove(&self, name: &str) -> impl Future<Output = Result<(), RuntimeError>>;

    /// Start a detached container.
    fn run(&self, spec: &ContainerSpec) -> impl Future<Output = Result<(), RuntimeError>>;

    /// Stop a container. A missing container is not an error.
    fn stop(&self, name: &str) -> impl Future<Output = Result<(), RuntimeError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failed_exit_is_permanent() {
        let failed = RuntimeError::Failed {
            command: "docker run".into(),
            code: Some(125),
            stderr: "conflict".into(),
        };
        assert!(!failed.is_transient());
        assert_eq!(failed.to_string(), "`docker run` exited with status 125: conflict");

        let timeout = RuntimeError::Timeout {
            command: "docker stop web1".into(),
            after: Duration::from_secs(60),
        };
        assert!(timeout.is_transient());
    }
}
