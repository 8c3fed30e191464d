//! Stop the load balancer and every backend.

use crate::error::{DeployError, LifecycleAction};
use crate::lifecycle::backends::BackendLifecycle;
use crate::load_balancer::BackendSet;
use crate::resilience::{retry, RetryPolicy};
use crate::runtime::ContainerRuntime;

/// Stop the balancer, then each backend in declaration order.
///
/// Best effort: every stop is attempted even after a failure. Failures are
/// collected and returned together as `StopIncomplete`.
pub async fn stop_all<R: ContainerRuntime>(
    runtime: &R,
    balancer: &str,
    backends: &BackendSet,
    lifecycle: &BackendLifecycle<'_, R>,
    policy: &RetryPolicy,
) -> Result<(), DeployError> {
    tracing::info!(container = balancer, backends = %backends, "Stopping load balancer and backends");

    let mut failures = Vec::new();

    match retry(policy, "stop container", || runtime.stop(balancer)).await {
        Ok(()) => tracing::info!(container = balancer, "Load balancer stopped"),
        Err(e) => {
            tracing::error!(container = balancer, error = %e, "Failed to stop load balancer");
            failures.push(DeployError::lifecycle(LifecycleAction::Stop, balancer, e));
        }
    }

    for name in backends.iter() {
        if let Err(e) = lifecycle.deactivate(name).await {
            tracing::error!(backend = name, error = %e, "Failed to stop backend");
            failures.push(e);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DeployError::StopIncomplete { failures })
    }
}
