//! Backend health subsystem.
//!
//! # Data Flow
//! ```text
//! Status check (probe_backend):
//!     → StatusProbe::status(name), retried on transient failure
//!     → BackendStatus, or DeployError::ProbeUnavailable
//!
//! Readiness gate (readiness.rs):
//!     Freshly activated backend
//!     → poll probe_backend until Running or deadline
//! ```
//!
//! # Design Decisions
//! - Status is re-derived from the load balancer on every invocation
//! - A probe that cannot answer is an error, never "stopped"

use crate::error::DeployError;
use crate::load_balancer::{Backend, BackendSet, BackendStatus, StatusProbe};
use crate::resilience::{retry, RetryPolicy};

pub mod readiness;

pub use readiness::wait_until_running;

/// Query the probe for one backend.
pub async fn probe_backend<P: StatusProbe>(
    probe: &P,
    backend: &str,
    policy: &RetryPolicy,
) -> Result<BackendStatus, DeployError> {
    retry(policy, "status probe", || probe.status(backend))
        .await
        .map_err(|source| DeployError::probe(backend, source))
}

/// Probe every backend in declaration order; the first failure aborts.
pub async fn probe_all<P: StatusProbe>(
    probe: &P,
    backends: &BackendSet,
    policy: &RetryPolicy,
) -> Result<Vec<Backend>, DeployError> {
    let mut observed = Vec::new();
    for name in backends.iter() {
        tracing::info!(backend = name, "Getting status");
        let status = probe_backend(probe, name, policy).await?;
        tracing::info!(backend = name, %status, "Status retrieved");
        observed.push(Backend::new(name, status));
    }
    Ok(observed)
}
