//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Admin query / runtime command:
//!     → bounded by its own deadline (tokio::time::timeout at the call site)
//!     → On transient failure: retries.rs (retry with backoff.rs delays)
//!     → On permanent failure or exhausted attempts: error surfaces to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries are bounded and only for transient failures
//! - The swap decision is never retried as a whole, only its individual calls

pub mod backoff;
pub mod retries;

pub use retries::{retry, RetryPolicy, Retryable};
