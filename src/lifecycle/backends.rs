//! Backend activation and deactivation.

use std::fmt;

use crate::config::BackendTemplate;
use crate::error::{DeployError, LifecycleAction};
use crate::resilience::{retry, RetryPolicy, Retryable};
use crate::runtime::{ContainerRuntime, ContainerSpec, RuntimeError};

/// Starts and stops backend containers from the configured template.
pub struct BackendLifecycle<'a, R> {
    runtime: &'a R,
    template: &'a BackendTemplate,
    policy: &'a RetryPolicy,
}

impl<'a, R: ContainerRuntime> BackendLifecycle<'a, R> {
    pub fn new(runtime: &'a R, template: &'a BackendTemplate, policy: &'a RetryPolicy) -> Self {
        Self {
            runtime,
            template,
            policy,
        }
    }

    /// Container spec for a backend name.
    pub fn spec(&self, name: &str) -> ContainerSpec {
        ContainerSpec {
            name: name.to_string(),
            image: self.template.image.clone(),
            network: self.template.network.clone(),
            ports: Vec::new(),
            volumes: Vec::new(),
            command: self.template.command.clone(),
        }
    }

    /// Replace any stale container with this name by a fresh one.
    pub async fn activate(&self, name: &str) -> Result<(), DeployError> {
        tracing::info!(backend = name, image = %self.template.image, "Starting backend");

        replace_container(self.runtime, &self.spec(name), self.policy).await?;

        tracing::info!(backend = name, "Backend started");
        Ok(())
    }

    /// Stop the container for this backend.
    pub async fn deactivate(&self, name: &str) -> Result<(), DeployError> {
        tracing::info!(backend = name, "Stopping backend");

        retry(self.policy, "stop container", || self.runtime.stop(name))
            .await
            .map_err(|e| DeployError::lifecycle(LifecycleAction::Stop, name, e))?;

        tracing::info!(backend = name, "Backend stopped");
        Ok(())
    }
}

/// Force-remove whatever holds `spec.name`, then run a fresh container.
///
/// Both steps retry as one unit: a timed-out `run` may already have
/// created the container, so every attempt starts with the removal.
pub(crate) async fn replace_container<R: ContainerRuntime>(
    runtime: &R,
    spec: &ContainerSpec,
    policy: &RetryPolicy,
) -> Result<(), DeployError> {
    let name = spec.name.as_str();
    retry(policy, "replace container", || async move {
        runtime
            .remove(name)
            .await
            .map_err(|e| StepError(LifecycleAction::Remove, e))?;
        runtime
            .run(spec)
            .await
            .map_err(|e| StepError(LifecycleAction::Run, e))
    })
    .await
    .map_err(|StepError(action, e)| DeployError::lifecycle(action, name, e))
}

/// A runtime failure tagged with the step that produced it.
struct StepError(LifecycleAction, RuntimeError);

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

impl Retryable for StepError {
    fn is_transient(&self) -> bool {
        self.1.is_transient()
    }
}
