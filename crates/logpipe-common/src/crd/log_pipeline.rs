//! LogPipeline Custom Resource Definition
//!
//! A LogPipeline describes where the log records tagged for this pipeline are
//! shipped: an HTTP endpoint, a Loki-compatible endpoint, or a free-form
//! custom output whose directives are passed to the agent verbatim.
//!
//! The pipeline name namespaces everything derived from it: the record match
//! pattern, output aliases, TLS mount paths and secret env var names.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::ValueType;
use crate::{Error, Result};

/// LogPipeline spec.
///
/// Example:
/// ```yaml
/// apiVersion: telemetry.logpipe.dev/v1alpha1
/// kind: LogPipeline
/// metadata:
///   name: http-output-pipeline
/// spec:
///   output:
///     http:
///       host:
///         valueFrom:
///           secretKeyRef:
///             name: log-receiver
///             namespace: log-http-output
///             key: host
///       uri: /logs
///       tls:
///         disabled: true
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "telemetry.logpipe.dev",
    version = "v1alpha1",
    kind = "LogPipeline",
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct LogPipelineSpec {
    /// Where records are shipped
    #[serde(default)]
    pub output: Output,
}

/// Output destination. At most one of the fields should be populated.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    /// Free-form agent output directives, one `key value` pair per line
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom: String,

    /// HTTP output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpOutput>,

    /// Grafana Loki output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loki: Option<LokiOutput>,
}

/// The populated output of a pipeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sink<'a> {
    /// Free-form custom directives
    Custom(&'a str),
    /// HTTP output
    Http(&'a HttpOutput),
    /// Loki output
    Loki(&'a LokiOutput),
    /// Nothing populated
    Unset,
}

impl Sink<'_> {
    /// Short name of the sink kind for logs and messages
    pub fn kind(&self) -> &'static str {
        match self {
            Sink::Custom(_) => "custom",
            Sink::Http(_) => "http",
            Sink::Loki(_) => "loki",
            Sink::Unset => "unset",
        }
    }
}

impl Output {
    /// Returns true if custom output text is present
    pub fn is_custom_defined(&self) -> bool {
        !self.custom.is_empty()
    }

    /// Returns true if an HTTP output with a host is present
    pub fn is_http_defined(&self) -> bool {
        self.http.as_ref().is_some_and(|h| h.host.is_defined())
    }

    /// Returns true if a Loki output with a URL is present
    pub fn is_loki_defined(&self) -> bool {
        self.loki.as_ref().is_some_and(|l| l.url.is_defined())
    }

    /// Resolve the populated output.
    ///
    /// Checked in priority order custom, HTTP, Loki, so the result is a single
    /// variant even if an unvalidated spec populates several.
    pub fn sink(&self) -> Sink<'_> {
        if self.is_custom_defined() {
            return Sink::Custom(&self.custom);
        }
        if let Some(http) = self.http.as_ref().filter(|h| h.host.is_defined()) {
            return Sink::Http(http);
        }
        if let Some(loki) = self.loki.as_ref().filter(|l| l.url.is_defined()) {
            return Sink::Loki(loki);
        }
        Sink::Unset
    }

    fn defined_count(&self) -> usize {
        [
            self.is_custom_defined(),
            self.is_http_defined(),
            self.is_loki_defined(),
        ]
        .into_iter()
        .filter(|defined| *defined)
        .count()
    }
}

/// HTTP output settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpOutput {
    /// Target host
    #[serde(default)]
    pub host: ValueType,

    /// Basic auth user
    #[serde(default)]
    pub user: ValueType,

    /// Basic auth password
    #[serde(default)]
    pub password: ValueType,

    /// Request URI path (e.g., "/logs")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,

    /// Target port (default "443")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub port: String,

    /// Payload compression (e.g., "gzip")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub compress: String,

    /// Payload format (default "json")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    /// TLS settings
    #[serde(default, rename = "tls")]
    pub tls_config: TlsConfig,
}

/// TLS settings for an HTTP output
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    /// Turn TLS off entirely
    #[serde(default)]
    pub disabled: bool,

    /// Skip server certificate verification
    #[serde(default)]
    pub skip_certificate_validation: bool,

    /// CA bundle used to verify the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<ValueType>,

    /// Client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<ValueType>,

    /// Client private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<ValueType>,
}

impl TlsConfig {
    /// Returns true if CA material is present
    pub fn has_ca(&self) -> bool {
        self.ca.as_ref().is_some_and(ValueType::is_defined)
    }

    /// Returns true if a client certificate is present
    pub fn has_cert(&self) -> bool {
        self.cert.as_ref().is_some_and(ValueType::is_defined)
    }

    /// Returns true if a client key is present
    pub fn has_key(&self) -> bool {
        self.key.as_ref().is_some_and(ValueType::is_defined)
    }
}

/// Grafana Loki output settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LokiOutput {
    /// Push endpoint
    #[serde(default)]
    pub url: ValueType,

    /// Static stream labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Record keys dropped before shipping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_keys: Vec<String>,
}

impl LogPipelineSpec {
    /// Check the spec for mistakes the compiler would silently tolerate.
    ///
    /// The compiler never calls this; it is for admission-style callers that
    /// want to reject ambiguous or incomplete pipelines up front.
    pub fn validate(&self, pipeline: &str) -> Result<()> {
        let output = &self.output;

        if output.defined_count() > 1 {
            return Err(Error::validation_for_field(
                pipeline,
                "spec.output",
                "only one of custom, http, or loki may be defined",
            ));
        }

        if let Some(http) = &output.http {
            if !http.host.is_defined() {
                return Err(Error::validation_for_field(
                    pipeline,
                    "spec.output.http.host",
                    "host must be set to a value or a secret key reference",
                ));
            }
            let tls = &http.tls_config;
            if tls.has_cert() != tls.has_key() {
                return Err(Error::validation_for_field(
                    pipeline,
                    "spec.output.http.tls",
                    "cert and key must be defined together",
                ));
            }
        }

        if let Some(loki) = &output.loki {
            if !loki.url.is_defined() {
                return Err(Error::validation_for_field(
                    pipeline,
                    "spec.output.loki.url",
                    "url must be set to a value or a secret key reference",
                ));
            }
        }

        Ok(())
    }
}

impl LogPipeline {
    /// Pipeline name, or empty if the object has none
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Validate the spec using this pipeline's name for error context
    pub fn validate(&self) -> Result<()> {
        self.spec.validate(self.name())
    }
}
