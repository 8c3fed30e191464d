//! Swap controller: probe, decide, activate, then deactivate.

use std::time::Duration;

use crate::config::{BackendTemplate, SwapConfig};
use crate::error::DeployError;
use crate::health::{probe_all, wait_until_running};
use crate::lifecycle::BackendLifecycle;
use crate::load_balancer::{BackendSet, StatusProbe};
use crate::resilience::RetryPolicy;
use crate::runtime::ContainerRuntime;
use crate::swap::decision::{decide, SwapDecision};

/// Readiness gate settings for a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOptions {
    pub wait_for_ready: bool,
    pub ready_timeout: Duration,
    pub ready_poll_interval: Duration,
}

impl From<&SwapConfig> for SwapOptions {
    fn from(config: &SwapConfig) -> Self {
        Self {
            wait_for_ready: config.wait_for_ready,
            ready_timeout: config.ready_timeout(),
            ready_poll_interval: config.ready_poll_interval(),
        }
    }
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self::from(&SwapConfig::default())
    }
}

/// Drives one blue/green swap over a fixed backend set.
pub struct SwapController<P, R> {
    probe: P,
    runtime: R,
    backends: BackendSet,
    template: BackendTemplate,
    options: SwapOptions,
    policy: RetryPolicy,
}

impl<P: StatusProbe, R: ContainerRuntime> SwapController<P, R> {
    pub fn new(probe: P, runtime: R, backends: BackendSet, template: BackendTemplate) -> Self {
        Self {
            probe,
            runtime,
            backends,
            template,
            options: SwapOptions::default(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_options(mut self, options: SwapOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Probe every backend and decide, without touching any container.
    pub async fn plan(&self) -> Result<SwapDecision, DeployError> {
        let observed = probe_all(&self.probe, &self.backends, &self.policy).await?;
        decide(&observed)
    }

    /// Perform the swap.
    ///
    /// Nothing is started or stopped unless every probe answered and a
    /// stopped backend exists. The old backend is only stopped after the new
    /// one was started (and, with `wait_for_ready`, reported running).
    pub async fn swap(&self) -> Result<SwapDecision, DeployError> {
        let decision = self.plan().await?;
        tracing::info!(
            activate = %decision.activate,
            deactivate = %decision.deactivate,
            "Swapping backends"
        );

        let lifecycle = BackendLifecycle::new(&self.runtime, &self.template, &self.policy);

        lifecycle.activate(&decision.activate).await?;

        if self.options.wait_for_ready {
            wait_until_running(
                &self.probe,
                &decision.activate,
                self.options.ready_timeout,
                self.options.ready_poll_interval,
                &self.policy,
            )
            .await?;
        } else {
            tracing::debug!(backend = %decision.activate, "Readiness gate disabled, not waiting");
        }

        lifecycle.deactivate(&decision.deactivate).await?;

        tracing::info!(
            active = %decision.activate,
            retired = %decision.deactivate,
            "Swap complete"
        );
        Ok(decision)
    }
}
