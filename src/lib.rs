//! Blue/green deploy helper for containers behind HAProxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   bluegreen start|stop|deploy
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌──────────────────────────────┐
//!   │ commands         │────▶│ lifecycle::lease (flock)     │
//!   └────────┬─────────┘     └──────────────────────────────┘
//!            │
//!     deploy │ start / stop
//!            ▼                        ┌──────────────────────┐
//!   ┌──────────────────┐   status     │ load_balancer        │
//!   │ swap::controller │─────────────▶│ admin socket probe   │──▶ HAProxy :9999
//!   │  decide + order  │              └──────────────────────┘
//!   └────────┬─────────┘
//!            │ activate / deactivate
//!            ▼
//!   ┌──────────────────┐              ┌──────────────────────┐
//!   │ lifecycle        │─────────────▶│ runtime (docker CLI) │──▶ docker
//!   └──────────────────┘              └──────────────────────┘
//!
//!   Cross-cutting: config, resilience (timeouts/retries), observability
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod resilience;
pub mod runtime;
pub mod swap;

pub use commands::{execute, Command};
pub use config::DeployConfig;
pub use error::DeployError;
pub use swap::{SwapController, SwapDecision};
