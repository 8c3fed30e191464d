//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a deployment.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file reproduces the stock
//! `web1`/`web2` behind `haproxy` setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the deploy helper.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployConfig {
    /// Load balancer container and admin socket.
    pub load_balancer: LoadBalancerConfig,

    /// Backend set and the container template used to activate a backend.
    pub backends: BackendsConfig,

    /// Swap behaviour (readiness gate, lease).
    pub swap: SwapConfig,

    /// Container runtime settings.
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Load balancer (HAProxy) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadBalancerConfig {
    /// Container name of the load balancer.
    pub container_name: String,

    /// Image the load balancer container runs.
    pub image: String,

    /// Docker network shared with the backends. Empty means the default network.
    pub network: Option<String>,

    /// Published ports, `host:container`.
    pub ports: Vec<String>,

    /// Host directory mounted read-only as the HAProxy config directory.
    /// Defaults to the working directory when unset.
    pub config_dir: Option<String>,

    /// Mount point of `config_dir` inside the container.
    pub config_mount: String,

    /// Runtime admin socket address (e.g., "127.0.0.1:9999").
    pub admin_address: String,

    /// HAProxy backend section the servers belong to.
    pub backend_group: String,
}

impl Default for LoadBalancerConfig {
    fn default() -> Self {
        Self {
            container_name: "haproxy".to_string(),
            image: "haproxytech/haproxy-alpine".to_string(),
            network: Some("sample".to_string()),
            ports: vec!["4500:4500".to_string(), "9999:9999".to_string()],
            config_dir: None,
            config_mount: "/usr/local/etc/haproxy".to_string(),
            admin_address: "127.0.0.1:9999".to_string(),
            backend_group: "web".to_string(),
        }
    }
}

/// Backend set configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// Ordered backend names, exactly as named in the HAProxy config.
    pub names: Vec<String>,

    /// Container template for activating a backend.
    #[serde(flatten)]
    pub template: BackendTemplate,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            names: vec!["web1".to_string(), "web2".to_string()],
            template: BackendTemplate::default(),
        }
    }
}

/// How a backend container is started.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendTemplate {
    /// Deployed image.
    pub image: String,

    /// Docker network the backend joins. Empty means the default network.
    pub network: Option<String>,

    /// Command run inside the container.
    pub command: Vec<String>,
}

impl Default for BackendTemplate {
    fn default() -> Self {
        Self {
            image: "go-webapp".to_string(),
            network: Some("sample".to_string()),
            command: vec!["/go/src/go-webapp/go-webapp".to_string()],
        }
    }
}

/// Swap behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Wait for the activated backend to report running before the old
    /// one is stopped.
    pub wait_for_ready: bool,

    /// Readiness gate deadline in seconds.
    pub ready_timeout_secs: u64,

    /// Readiness poll interval in milliseconds.
    pub ready_poll_interval_ms: u64,

    /// Lock file guarding state-changing commands.
    pub lease_path: String,
}

impl SwapConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_interval_ms)
    }
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            wait_for_ready: false,
            ready_timeout_secs: 30,
            ready_poll_interval_ms: 500,
            lease_path: ".bluegreen.lock".to_string(),
        }
    }
}

/// Container runtime settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime CLI binary.
    pub binary: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }
}

/// Timeout configuration for external calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a single container runtime command, in seconds.
    pub command_secs: u64,

    /// Deadline for a single admin socket query, in seconds.
    pub probe_secs: u64,
}

impl TimeoutConfig {
    pub fn command(&self) -> Duration {
        Duration::from_secs(self.command_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command_secs: 60,
            probe_secs: 5,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
