//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server and its probed status
//! - Hold the ordered backend set a swap chooses from

use std::fmt;

/// Routing status of a backend as reported by the load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// The load balancer has a network address assigned to the server.
    Running { address: String },
    /// No address assigned (`-`) or the server is absent from the table.
    Stopped,
}

impl BackendStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, BackendStatus::Running { .. })
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Running { address } => write!(f, "running ({})", address),
            BackendStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// A single backend with the status observed during this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: String,
    pub status: BackendStatus,
}

impl Backend {
    pub fn new(name: impl Into<String>, status: BackendStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }
}

/// Fixed, ordered set of backend names the load balancer routes to.
///
/// Built from validated configuration; declaration order is selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSet {
    names: Vec<String>,
}

impl BackendSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for BackendSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}
