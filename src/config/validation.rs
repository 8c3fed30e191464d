//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend set is usable for a swap (>= 2 unique names)
//! - Validate value ranges (timeouts > 0, ports valid, known log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::DeployConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least two backends are required, got {0}")]
    TooFewBackends(usize),

    #[error("backend names must not be empty")]
    EmptyBackendName,

    #[error("duplicate backend name '{0}'")]
    DuplicateBackend(String),

    #[error("backend '{0}' collides with the load balancer container name")]
    BackendNamedLikeBalancer(String),

    #[error("{0} image must not be empty")]
    EmptyImage(&'static str),

    #[error("invalid admin address '{0}'")]
    InvalidAdminAddress(String),

    #[error("invalid port binding '{0}' (expected host:container)")]
    InvalidPortBinding(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown log level '{0}' (expected trace, debug, info, warn, error or off)")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DeployConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let names = &config.backends.names;
    if names.len() < 2 {
        errors.push(ValidationError::TooFewBackends(names.len()));
    }

    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyBackendName);
            continue;
        }
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(name.clone()));
        }
        if *name == config.load_balancer.container_name {
            errors.push(ValidationError::BackendNamedLikeBalancer(name.clone()));
        }
    }

    if config.backends.template.image.trim().is_empty() {
        errors.push(ValidationError::EmptyImage("backend"));
    }
    if config.load_balancer.image.trim().is_empty() {
        errors.push(ValidationError::EmptyImage("load balancer"));
    }

    if config
        .load_balancer
        .admin_address
        .parse::<SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidAdminAddress(
            config.load_balancer.admin_address.clone(),
        ));
    }

    for binding in &config.load_balancer.ports {
        if !is_port_binding(binding) {
            errors.push(ValidationError::InvalidPortBinding(binding.clone()));
        }
    }

    if config.timeouts.command_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.command_secs"));
    }
    if config.timeouts.probe_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.probe_secs"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero("retries.max_attempts"));
    }
    if config.swap.wait_for_ready {
        if config.swap.ready_timeout_secs == 0 {
            errors.push(ValidationError::Zero("swap.ready_timeout_secs"));
        }
        if config.swap.ready_poll_interval_ms == 0 {
            errors.push(ValidationError::Zero("swap.ready_poll_interval_ms"));
        }
    }

    let level = &config.observability.log_level;
    if level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:container`, optionally prefixed with a bind IP (`ip:host:container`).
fn is_port_binding(binding: &str) -> bool {
    let parts: Vec<&str> = binding.rsplitn(3, ':').collect();
    if parts.len() < 2 {
        return false;
    }
    parts[..2].iter().all(|p| p.parse::<u16>().is_ok_and(|port| port > 0))
}
