//! Readiness gate for a freshly activated backend.
//!
//! Polls the load balancer until the backend holds a routing slot or the
//! deadline passes. Only consulted when `swap.wait_for_ready` is set.

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::error::DeployError;
use crate::health::probe_backend;
use crate::load_balancer::{BackendStatus, StatusProbe};
use crate::resilience::RetryPolicy;

/// Wait until `backend` reports running, polling every `interval`.
pub async fn wait_until_running<P: StatusProbe>(
    probe: &P,
    backend: &str,
    timeout: Duration,
    interval: Duration,
    policy: &RetryPolicy,
) -> Result<BackendStatus, DeployError> {
    let started = Instant::now();
    let deadline = started + timeout;

    tracing::info!(backend, timeout_secs = timeout.as_secs(), "Waiting for backend to become ready");

    loop {
        let status = probe_backend(probe, backend, policy).await?;
        if status.is_running() {
            tracing::info!(
                backend,
                %status,
                waited_ms = started.elapsed().as_millis() as u64,
                "Backend is ready"
            );
            return Ok(status);
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::error!(backend, "Backend did not become ready in time");
            return Err(DeployError::ReadinessTimeout {
                backend: backend.to_string(),
                waited: timeout,
            });
        }

        tracing::debug!(backend, "Not ready yet");
        time::sleep(interval.min(deadline - now)).await;
    }
}
