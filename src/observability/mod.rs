//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (status line before/after each step)
//!     → inside the per-invocation span (run_id, command)
//!
//! Consumers:
//!     → terminal (pretty) or log collector (JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields (backend, container, error) rather than formatted text
//! - Run ID flows through every event of an invocation

pub mod logging;

pub use logging::init_logging;
