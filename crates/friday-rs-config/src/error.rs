//! Config errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading or validating `friday.json5`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field holds a value the assistant cannot run with.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
