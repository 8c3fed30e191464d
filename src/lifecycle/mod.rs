//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Every state-changing command:
//!     lease.rs (exclusive lock) → command → lease released on drop
//!
//! start (startup.rs):
//!     balancer running? → yes: nothing to do
//!                       → no: force-remove stale container → run fresh one
//!
//! stop (shutdown.rs):
//!     stop balancer → stop each backend in order (best effort)
//!
//! Backend steps (backends.rs):
//!     activate = remove stale + run fresh, deactivate = stop
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: balancer first, so no traffic hits stopping backends
//! - Shutdown continues past failures and reports them all at the end
//! - Lease is acquired before any probe or command
//! - remove + run retry together, never run alone

pub mod backends;
pub mod lease;
pub mod shutdown;
pub mod startup;

pub use backends::BackendLifecycle;
pub use lease::SwapLease;
pub use shutdown::stop_all;
pub use startup::{start_balancer, StartOutcome};
