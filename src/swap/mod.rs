//! Blue/green swap subsystem.
//!
//! # Data Flow
//! ```text
//! deploy
//!     → probe each backend in declared order (health::probe_all)
//!     → decision.rs (first stopped activates, a different one retires)
//!     → activate target (remove stale + run)
//!     → [optional] readiness gate on the target
//!     → deactivate the retired backend (stop)
//! ```
//!
//! # Design Decisions
//! - Any probe failure aborts before a single container command
//! - Activation strictly precedes deactivation
//! - A failed activation never stops the old backend

pub mod controller;
pub mod decision;

pub use controller::{SwapController, SwapOptions};
pub use decision::{decide, SwapDecision};
