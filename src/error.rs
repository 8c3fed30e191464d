//! Top-level error taxonomy for deploy commands.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::load_balancer::ProbeError;
use crate::runtime::RuntimeError;

/// A state-changing step performed through the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// `is_running` check on the balancer container.
    Inspect,
    Remove,
    Run,
    Stop,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleAction::Inspect => "inspect",
            LifecycleAction::Remove => "remove",
            LifecycleAction::Run => "run",
            LifecycleAction::Stop => "stop",
        };
        f.write_str(s)
    }
}

/// Errors that abort a top-level command.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("status probe for '{backend}' failed: {source}")]
    ProbeUnavailable {
        backend: String,
        #[source]
        source: ProbeError,
    },

    #[error("no inactive backend available, all of {backends:?} are running")]
    NoInactiveBackend { backends: Vec<String> },

    #[error("a swap needs at least two backends, got {0}")]
    TooFewBackends(usize),

    #[error("{action} of '{target}' failed: {source}")]
    LifecycleCommandFailed {
        action: LifecycleAction,
        target: String,
        #[source]
        source: RuntimeError,
    },

    #[error("'{backend}' did not become ready within {waited:?}")]
    ReadinessTimeout { backend: String, waited: Duration },

    #[error("stop finished with {} failure(s): {}", .failures.len(), summarize(.failures))]
    StopIncomplete { failures: Vec<DeployError> },

    #[error("another deploy holds the lease at {}{}", .path.display(), .holder.as_deref().map(|h| format!(" ({h})")).unwrap_or_default())]
    LeaseHeld { path: PathBuf, holder: Option<String> },

    #[error("cannot take lease at {}: {source}", .path.display())]
    Lease {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DeployError {
    pub(crate) fn lifecycle(action: LifecycleAction, target: &str, source: RuntimeError) -> Self {
        DeployError::LifecycleCommandFailed {
            action,
            target: target.to_string(),
            source,
        }
    }

    pub(crate) fn probe(backend: &str, source: ProbeError) -> Self {
        DeployError::ProbeUnavailable {
            backend: backend.to_string(),
            source,
        }
    }
}

fn summarize(failures: &[DeployError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
