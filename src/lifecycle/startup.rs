//! Load balancer startup.
//!
//! # Responsibilities
//! - Check whether the balancer container is already running
//! - Otherwise clear a stale container and start a fresh one
//!
//! # Design Decisions
//! - Idempotent: a running balancer is left untouched
//! - Config directory is mounted read-only; the balancer never writes it

use std::path::Path;

use crate::config::LoadBalancerConfig;
use crate::error::{DeployError, LifecycleAction};
use crate::lifecycle::backends::replace_container;
use crate::resilience::{retry, RetryPolicy};
use crate::runtime::{ContainerRuntime, ContainerSpec, VolumeMount};

/// What `start_balancer` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning,
    Started,
}

/// Container spec for the load balancer, mounting `config_dir`.
pub fn balancer_spec(config: &LoadBalancerConfig, config_dir: &Path) -> ContainerSpec {
    ContainerSpec {
        name: config.container_name.clone(),
        image: config.image.clone(),
        network: config.network.clone(),
        ports: config.ports.clone(),
        volumes: vec![VolumeMount::read_only(
            config_dir.to_string_lossy(),
            config.config_mount.as_str(),
        )],
        command: Vec::new(),
    }
}

/// Start the load balancer unless it is already running.
pub async fn start_balancer<R: ContainerRuntime>(
    runtime: &R,
    config: &LoadBalancerConfig,
    config_dir: &Path,
    policy: &RetryPolicy,
) -> Result<StartOutcome, DeployError> {
    let name = config.container_name.as_str();

    let running = retry(policy, "inspect container", || runtime.is_running(name))
        .await
        .map_err(|e| DeployError::lifecycle(LifecycleAction::Inspect, name, e))?;

    if running {
        tracing::info!(container = name, "Load balancer is running");
        return Ok(StartOutcome::AlreadyRunning);
    }
    tracing::info!(container = name, "Load balancer is stopped");

    tracing::info!(container = name, image = %config.image, config_dir = %config_dir.display(), "Starting load balancer");

    replace_container(runtime, &balancer_spec(config, config_dir), policy).await?;

    tracing::info!(container = name, "Load balancer started");
    Ok(StartOutcome::Started)
}
