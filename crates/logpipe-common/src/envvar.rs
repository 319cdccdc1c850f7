//! Environment variable naming for secret projections
//!
//! Secret values never appear in rendered agent configuration. Instead the
//! configuration references `${NAME}` and the reconciler projects the secret
//! key into the agent's environment under `NAME`. Both sides derive `NAME`
//! from this module so they always agree.

/// Build the env var name for a secret key referenced by a pipeline.
///
/// Parts are joined with `_`, upper-cased, and `-`/`.` are replaced with `_`
/// so the result is a valid POSIX environment variable name. The function is
/// pure: the same inputs always yield the same name.
pub fn format_env_var_name(pipeline: &str, namespace: &str, name: &str, key: &str) -> String {
    make_env_var_compliant(&format!("{pipeline}_{namespace}_{name}_{key}"))
}

/// Wrap an env var name in the `${...}` placeholder syntax the agent expands
pub fn placeholder(env_var: &str) -> String {
    format!("${{{env_var}}}")
}

fn make_env_var_compliant(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}
