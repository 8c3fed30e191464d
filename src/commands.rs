//! Top-level command dispatch.
//!
//! Wires configuration to the concrete collaborators (docker CLI, HAProxy
//! admin socket), takes the swap lease and runs exactly one action.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::Instrument;
use uuid::Uuid;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::lifecycle::{start_balancer, stop_all, BackendLifecycle, SwapLease};
use crate::load_balancer::{AdminSocketProbe, BackendSet};
use crate::resilience::RetryPolicy;
use crate::runtime::DockerCli;
use crate::swap::{SwapController, SwapOptions};

/// The three actions the CLI exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the load balancer if it is not running.
    Start,
    /// Stop the load balancer and all backends.
    Stop,
    /// Swap the active backend for a fresh one.
    Deploy,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Deploy => "deploy",
        })
    }
}

/// Run one command against the real runtime and load balancer.
///
/// Relative paths in the config (`lease_path`, `config_dir`) resolve
/// against `workdir`.
pub async fn execute(command: Command, config: &DeployConfig, workdir: &Path) -> Result<(), DeployError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id, %command);

    async move {
        let lease_path = workdir.join(&config.swap.lease_path);
        let _lease = SwapLease::acquire(&lease_path, run_id, &command.to_string())?;

        let runtime = DockerCli::new(&config.runtime.binary, config.timeouts.command());
        let policy = RetryPolicy::from(&config.retries);
        let backends = BackendSet::new(config.backends.names.iter().cloned());

        match command {
            Command::Start => {
                let config_dir = balancer_config_dir(config, workdir);
                start_balancer(&runtime, &config.load_balancer, &config_dir, &policy).await?;
            }
            Command::Stop => {
                let lifecycle = BackendLifecycle::new(&runtime, &config.backends.template, &policy);
                stop_all(
                    &runtime,
                    &config.load_balancer.container_name,
                    &backends,
                    &lifecycle,
                    &policy,
                )
                .await?;
            }
            Command::Deploy => {
                let probe = AdminSocketProbe::from_config(&config.load_balancer, config.timeouts.probe());
                SwapController::new(probe, runtime, backends, config.backends.template.clone())
                    .with_options(SwapOptions::from(&config.swap))
                    .with_retry_policy(policy)
                    .swap()
                    .await?;
            }
        }
        Ok::<(), DeployError>(())
    }
    .instrument(span)
    .await
}

/// Host directory mounted into the balancer container.
pub fn balancer_config_dir(config: &DeployConfig, workdir: &Path) -> PathBuf {
    match &config.load_balancer.config_dir {
        Some(dir) => workdir.join(dir),
        None => workdir.to_path_buf(),
    }
}
