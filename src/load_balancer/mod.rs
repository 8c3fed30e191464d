//! Load balancer subsystem.
//!
//! # Data Flow
//! ```text
//! Swap needs a backend's status
//!     → StatusProbe::status(name)
//!     → admin.rs (send `show servers conn <group>` to the admin socket)
//!     → servers.rs (parse table, match `<group>/<name>` exactly)
//!     → BackendStatus::Running { address } | BackendStatus::Stopped
//! ```
//!
//! # Design Decisions
//! - The probe is read-only; it never changes routing
//! - Probe failures are errors, never "stopped"
//! - The backend set comes from config; nothing is discovered from the table

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::resilience::Retryable;

pub mod admin;
pub mod backend;
pub mod servers;

pub use admin::AdminSocketProbe;
pub use backend::{Backend, BackendSet, BackendStatus};

/// Errors from querying the load balancer admin interface.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cannot connect to admin socket: {0}")]
    Connect(#[source] std::io::Error),

    #[error("admin socket I/O failed: {0}")]
    Io(#[source] std::io::Error),

    #[error("admin socket did not answer within {0:?}")]
    Timeout(Duration),

    #[error("unexpected admin socket reply: {0}")]
    Malformed(String),
}

impl Retryable for ProbeError {
    fn is_transient(&self) -> bool {
        !matches!(self, ProbeError::Malformed(_))
    }
}

/// Read-only view of which backends currently hold a routing slot.
pub trait StatusProbe {
    fn status(&self, backend: &str) -> impl Future<Output = Result<BackendStatus, ProbeError>>;
}
