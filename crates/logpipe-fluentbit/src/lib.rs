//! Fluent Bit output compiler for LogPipelines
//!
//! Compiles the output of a `LogPipeline` into the `[OUTPUT]` section the
//! Fluent Bit agent consumes. Pure compilation crate: no I/O, no shared
//! state, safe to call concurrently for many pipelines.
//!
//! Secret values are never read. Secret-backed fields are rendered as
//! `${NAME}` placeholders and [`secret_bindings`] tells the caller which
//! secret keys to project into the agent's environment and TLS mount.

mod builder;
mod defaults;
mod output;
mod parser;
mod resolve;
mod secrets;

pub use builder::{ConfigParam, ConfigParams, SectionBuilder, OUTPUT_SECTION_HEADER};
pub use defaults::PipelineDefaults;
pub use output::{
    compile_output, concatenate_labels, create_output_section, TlsMaterial, DEFAULT_HTTP_FORMAT,
    DEFAULT_HTTP_PORT, LOKI_LABEL_MAP_PATH, RETRY_LIMIT, TLS_MOUNT_DIR,
};
pub use parser::parse_multiline;
pub use resolve::resolve_value;
pub use secrets::{secret_bindings, SecretBinding, SecretTarget};
