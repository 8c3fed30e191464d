//! Swap decision: which backend comes up, which goes down.
//!
//! # Selection rule
//! - Activate: the first backend, in declaration order, that is stopped.
//! - Deactivate: the first *running* backend other than the one being
//!   activated; on a first deploy (nothing running) the first other backend.
//!
//! With a pair this is always "the other one".

use crate::error::DeployError;
use crate::load_balancer::Backend;

/// Outcome of the decision step. `activate != deactivate` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapDecision {
    pub activate: String,
    pub deactivate: String,
}

/// Pick activation and deactivation targets from observed statuses.
pub fn decide(backends: &[Backend]) -> Result<SwapDecision, DeployError> {
    if backends.len() < 2 {
        return Err(DeployError::TooFewBackends(backends.len()));
    }

    let activate = backends
        .iter()
        .find(|b| !b.is_running())
        .ok_or_else(|| DeployError::NoInactiveBackend {
            backends: backends.iter().map(|b| b.name.clone()).collect(),
        })?;

    let mut others = backends.iter().filter(|b| b.name != activate.name);
    let deactivate = others
        .clone()
        .find(|b| b.is_running())
        .or_else(|| others.next())
        .ok_or(DeployError::TooFewBackends(1))?;

    debug_assert_ne!(activate.name, deactivate.name);
    Ok(SwapDecision {
        activate: activate.name.clone(),
        deactivate: deactivate.name.clone(),
    })
}
