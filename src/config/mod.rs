//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config <path> | ./bluegreen.toml | defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DeployConfig (validated, immutable)
//!     → borrowed by the command being run
//! ```
//!
//! # Design Decisions
//! - Config is read once per invocation; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::BackendTemplate;
pub use schema::DeployConfig;
pub use schema::LoadBalancerConfig;
pub use schema::RetryConfig;
pub use schema::SwapConfig;
