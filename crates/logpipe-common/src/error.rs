//! Error types for logpipe
//!
//! Errors carry the pipeline name and, where known, the offending field path
//! so that problems can be reported against the resource the user authored.

use thiserror::Error;

/// Main error type for logpipe operations
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error for LogPipeline specs
    #[error("validation error for {pipeline}: {message}")]
    Validation {
        /// Name of the pipeline with invalid configuration
        pipeline: String,
        /// Description of what's invalid
        message: String,
        /// The invalid field path (e.g., "spec.output.http.host")
        field: Option<String>,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being deserialized (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create a validation error with pipeline context and field path
    pub fn validation_for_field(
        pipeline: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Validation {
            pipeline: pipeline.into(),
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Get the pipeline name if this error is associated with a specific pipeline
    pub fn pipeline(&self) -> Option<&str> {
        match self {
            Error::Validation { pipeline, .. } => Some(pipeline),
            Error::Serialization { .. } => None,
        }
    }

    /// Get the field path if this error points at a specific field
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            Error::Serialization { .. } => None,
        }
    }
}
