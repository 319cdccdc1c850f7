//! Secret references a compiled pipeline depends on
//!
//! The reconciler uses this list to project secret keys into the agent: as
//! environment variables for values rendered as `${NAME}` placeholders, and
//! as files under the TLS mount directory for TLS material. Names come from
//! the same functions the section generators use.

use logpipe_common::crd::{LogPipeline, SecretKeyRef, Sink, ValueType};
use logpipe_common::envvar::format_env_var_name;

use crate::output::TlsMaterial;

/// Where a secret key must be made available to the agent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecretTarget {
    /// Environment variable with this name
    EnvVar(String),
    /// File with this name inside the TLS mount directory
    TlsFile(String),
}

/// A secret key the compiled section references
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretBinding {
    /// Spec field the reference came from (e.g., "http.password")
    pub field: &'static str,
    /// The referenced secret key
    pub secret_ref: SecretKeyRef,
    /// Where the reconciler must place the value
    pub target: SecretTarget,
}

/// List the secret bindings of a pipeline's populated output.
///
/// Order: HTTP host, user, password, TLS CA, cert, key, then Loki URL.
/// Fields given as literals produce no binding. Custom outputs have none.
pub fn secret_bindings(pipeline: &LogPipeline) -> Vec<SecretBinding> {
    let name = pipeline.name();
    let mut bindings = Vec::new();

    match pipeline.spec.output.sink() {
        Sink::Http(http) => {
            for (field, value) in [
                ("http.host", &http.host),
                ("http.user", &http.user),
                ("http.password", &http.password),
            ] {
                push_env_binding(&mut bindings, name, field, value);
            }

            let tls = &http.tls_config;
            for (field, material, value) in [
                ("http.tls.ca", TlsMaterial::Ca, &tls.ca),
                ("http.tls.cert", TlsMaterial::Cert, &tls.cert),
                ("http.tls.key", TlsMaterial::Key, &tls.key),
            ] {
                if let Some(r) = value.as_ref().and_then(ValueType::secret_key_ref) {
                    bindings.push(SecretBinding {
                        field,
                        secret_ref: r.clone(),
                        target: SecretTarget::TlsFile(material.file_name(name)),
                    });
                }
            }
        }
        Sink::Loki(loki) => push_env_binding(&mut bindings, name, "loki.url", &loki.url),
        Sink::Custom(_) | Sink::Unset => {}
    }

    bindings
}

fn push_env_binding(
    bindings: &mut Vec<SecretBinding>,
    pipeline: &str,
    field: &'static str,
    value: &ValueType,
) {
    if let Some(r) = value.secret_key_ref() {
        bindings.push(SecretBinding {
            field,
            secret_ref: r.clone(),
            target: SecretTarget::EnvVar(format_env_var_name(
                pipeline,
                &r.namespace,
                &r.name,
                &r.key,
            )),
        });
    }
}
