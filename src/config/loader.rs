//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::DeployConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "bluegreen.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeployConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DeployConfig, ConfigError> {
    let config: DeployConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the configuration for a run.
///
/// An explicit path must exist. Without one, `bluegreen.toml` in `dir` is
/// used if present, otherwise the validated defaults.
pub fn resolve_config(explicit: Option<&Path>, dir: &Path) -> Result<DeployConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "Using config from working directory");
        return load_config(&candidate);
    }

    tracing::debug!("No config file found, using defaults");
    let config = DeployConfig::default();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
