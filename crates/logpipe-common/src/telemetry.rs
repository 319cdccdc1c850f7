//! Logging initialization
//!
//! Installs a `tracing` subscriber with an `EnvFilter` (honouring `RUST_LOG`)
//! and either JSON structured output or human-readable output. Logs always go
//! to stderr so that tools writing rendered configuration to stdout stay
//! pipe-friendly.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,logpipe=debug";

/// Errors that can occur during logging initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Directive that failed to parse
        directive: String,
        /// Parser message
        message: String,
    },

    /// Failed to install the tracing subscriber (usually: already installed)
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Plain,
    /// JSON objects, one per line
    Json,
}

/// Configuration for logging initialization
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Line format
    pub format: LogFormat,

    /// Explicit filter directive. When `None`, `RUST_LOG` is used, falling
    /// back to [`DEFAULT_FILTER`].
    pub filter: Option<String>,
}

/// Initialize logging with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config.filter.as_deref())?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Plain => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}

fn build_filter(directive: Option<&str>) -> Result<EnvFilter, TelemetryError> {
    match directive {
        Some(d) => EnvFilter::try_new(d).map_err(|e| TelemetryError::InvalidFilter {
            directive: d.to_string(),
            message: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}
