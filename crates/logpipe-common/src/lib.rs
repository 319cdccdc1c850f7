//! Common types for logpipe: the LogPipeline CRD, errors, and utilities

#![deny(missing_docs)]

pub mod crd;
pub mod envvar;
pub mod error;
pub mod telemetry;
pub mod yaml;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

