//! Error types for the CLI

use std::path::PathBuf;

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Common(#[from] logpipe_common::Error),

    #[error("{0}")]
    Telemetry(#[from] logpipe_common::telemetry::TelemetryError),

    #[error("validation failed: {count} invalid pipeline(s)")]
    ValidationFailed { count: usize },
}
