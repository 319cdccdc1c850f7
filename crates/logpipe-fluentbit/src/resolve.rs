//! Value resolution for literal and secret-backed fields

use logpipe_common::crd::ValueType;
use logpipe_common::envvar::{format_env_var_name, placeholder};

/// Resolve a value to the text written into the section.
///
/// A non-empty literal is returned as is. A secret reference becomes a
/// `${NAME}` placeholder that the agent expands from its environment; the
/// secret itself is never read. Anything else resolves to an empty string.
pub fn resolve_value(value: &ValueType, pipeline: &str) -> String {
    if !value.value.is_empty() {
        return value.value.clone();
    }
    match value.secret_key_ref() {
        Some(r) => placeholder(&format_env_var_name(pipeline, &r.namespace, &r.name, &r.key)),
        None => String::new(),
    }
}
