//! Error types for reachping.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe failures are not
//! errors; they are reported as [`crate::prober::ProbeOutcome::Failure`].

use crate::types::TargetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or validating the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("timeout must be greater than zero seconds")]
    InvalidTimeout,

    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced to the command-line front end at startup.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
