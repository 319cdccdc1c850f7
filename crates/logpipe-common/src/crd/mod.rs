//! Custom Resource Definitions for logpipe
//!
//! This module contains the LogPipeline CRD and the value types it shares
//! with other resources.

mod log_pipeline;
mod types;

pub use log_pipeline::{
    HttpOutput, LogPipeline, LogPipelineSpec, LokiOutput, Output, Sink, TlsConfig,
};
pub use types::{SecretKeyRef, ValueFromSource, ValueType};
