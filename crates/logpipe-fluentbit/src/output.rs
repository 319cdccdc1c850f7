//! Output section compilation
//!
//! Generates one `[OUTPUT]` section per pipeline from its populated sink.
//! Every non-empty section carries the operator-owned match pattern, buffer
//! ceiling and retry limit; custom text cannot opt out of them.

use logpipe_common::crd::{HttpOutput, LogPipeline, LokiOutput, Output, Sink};
use tracing::debug;

use crate::builder::SectionBuilder;
use crate::defaults::PipelineDefaults;
use crate::parser::parse_multiline;
use crate::resolve::resolve_value;

/// Retry ceiling for every output.
///
/// With the agent's exponential back-off and jitter under the default
/// `scheduler.base` and `scheduler.cap`, 300 retries span roughly three days.
/// Retries are bounded so undeliverable records cannot pin the buffer forever.
pub const RETRY_LIMIT: &str = "300";

/// Port used by HTTP outputs that do not set one
pub const DEFAULT_HTTP_PORT: &str = "443";

/// Payload format used by HTTP outputs that do not set one
pub const DEFAULT_HTTP_FORMAT: &str = "json";

/// Directory where TLS material for HTTP outputs is mounted
pub const TLS_MOUNT_DIR: &str = "/fluent-bit/tls";

/// Label map consumed by the Loki output plugin
pub const LOKI_LABEL_MAP_PATH: &str = "/fluent-bit/etc/loki-labelmap.json";

const LOKI_LOG_LEVEL: &str = "warn";
const LOKI_LINE_FORMAT: &str = "json";

/// TLS files an HTTP output may reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsMaterial {
    /// CA bundle
    Ca,
    /// Client certificate
    Cert,
    /// Client private key
    Key,
}

impl TlsMaterial {
    /// Directive pointing the agent at the file
    pub fn param_key(self) -> &'static str {
        match self {
            TlsMaterial::Ca => "tls.ca_file",
            TlsMaterial::Cert => "tls.crt_file",
            TlsMaterial::Key => "tls.key_file",
        }
    }

    /// File name within [`TLS_MOUNT_DIR`] for a pipeline
    pub fn file_name(self, pipeline: &str) -> String {
        match self {
            TlsMaterial::Ca => format!("{pipeline}-ca.crt"),
            TlsMaterial::Cert => format!("{pipeline}-cert.crt"),
            TlsMaterial::Key => format!("{pipeline}-key.key"),
        }
    }

    /// Absolute mount path for a pipeline
    pub fn mount_path(self, pipeline: &str) -> String {
        format!("{TLS_MOUNT_DIR}/{}", self.file_name(pipeline))
    }
}

/// Compile the output section of a pipeline.
///
/// Returns an empty string when no sink is populated.
pub fn create_output_section(pipeline: &LogPipeline, defaults: &PipelineDefaults) -> String {
    compile_output(pipeline.name(), &pipeline.spec.output, defaults)
}

/// Compile an output for the named pipeline.
///
/// Exactly one generator runs, chosen by [`Output::sink`].
pub fn compile_output(name: &str, output: &Output, defaults: &PipelineDefaults) -> String {
    let fs_buffer_limit = defaults.fs_buffer_limit.as_str();
    let sink = output.sink();

    let section = match sink {
        Sink::Custom(text) => generate_custom_output(text, fs_buffer_limit, name),
        Sink::Http(http) => generate_http_output(http, fs_buffer_limit, name),
        Sink::Loki(loki) => generate_loki_output(loki, fs_buffer_limit, name),
        Sink::Unset => {
            debug!(pipeline = name, "no output defined, skipping section");
            return String::new();
        }
    };

    debug!(
        pipeline = name,
        sink = sink.kind(),
        params = section.params().len(),
        "compiled output section"
    );
    section.build()
}

fn match_pattern(name: &str) -> String {
    format!("{name}.*")
}

/// Custom text passes through verbatim; an alias is synthesized if missing
fn generate_custom_output(custom: &str, fs_buffer_limit: &str, name: &str) -> SectionBuilder {
    let params = parse_multiline(custom);
    let output_name = params
        .get_by_key("name")
        .map(|p| p.value.as_str())
        .unwrap_or_default();
    let alias_present = params.contains_key("alias");

    let mut sb = SectionBuilder::output();
    for p in &params {
        sb.add(p.key.as_str(), p.value.as_str());
    }
    if !alias_present {
        sb.add("alias", format!("{name}-{output_name}"));
    }
    // Appended even if the custom text sets them; both copies are rendered
    sb.add("match", match_pattern(name))
        .add("storage.total_limit_size", fs_buffer_limit)
        .add("retry_limit", RETRY_LIMIT);
    sb
}

fn generate_http_output(http: &HttpOutput, fs_buffer_limit: &str, name: &str) -> SectionBuilder {
    let mut sb = SectionBuilder::output();
    sb.add("name", "http")
        .add("allow_duplicated_headers", "true")
        .add("match", match_pattern(name))
        .add("alias", format!("{name}-http"))
        .add("storage.total_limit_size", fs_buffer_limit)
        .add("retry_limit", RETRY_LIMIT)
        .add_if_not_empty("uri", &http.uri)
        .add_if_not_empty("compress", &http.compress)
        .add_if_not_empty_or_default("port", &http.port, DEFAULT_HTTP_PORT)
        .add_if_not_empty_or_default("format", &http.format, DEFAULT_HTTP_FORMAT);

    if http.host.is_defined() {
        sb.add("host", resolve_value(&http.host, name));
    }
    if http.password.is_defined() {
        sb.add("http_passwd", resolve_value(&http.password, name));
    }
    if http.user.is_defined() {
        sb.add("http_user", resolve_value(&http.user, name));
    }

    let tls = &http.tls_config;
    sb.add("tls", on_off(!tls.disabled))
        .add("tls.verify", on_off(!tls.skip_certificate_validation));

    let materials = [
        (TlsMaterial::Ca, tls.has_ca()),
        (TlsMaterial::Cert, tls.has_cert()),
        (TlsMaterial::Key, tls.has_key()),
    ];
    for (material, present) in materials {
        if present {
            sb.add(material.param_key(), material.mount_path(name));
        }
    }

    sb
}

fn generate_loki_output(loki: &LokiOutput, fs_buffer_limit: &str, name: &str) -> SectionBuilder {
    let mut sb = SectionBuilder::output();
    sb.add("labelMapPath", LOKI_LABEL_MAP_PATH)
        .add("loglevel", LOKI_LOG_LEVEL)
        .add("lineformat", LOKI_LINE_FORMAT)
        .add("match", match_pattern(name))
        .add("storage.total_limit_size", fs_buffer_limit)
        .add("retry_limit", RETRY_LIMIT)
        .add("name", "grafana-loki")
        .add("alias", format!("{name}-grafana-loki"))
        .add("url", resolve_value(&loki.url, name));

    if !loki.labels.is_empty() {
        sb.add("labels", concatenate_labels(&loki.labels));
    }
    if !loki.remove_keys.is_empty() {
        sb.add("removeKeys", loki.remove_keys.join(", "));
    }
    sb
}

/// Format labels as a sorted selector: `{k1="v1", k2="v2"}`.
///
/// Entries are sorted by key (byte-wise) regardless of the map's iteration
/// order, so the result is identical across compiles.
pub fn concatenate_labels<'a, I>(labels: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut entries: Vec<(&String, &String)> = labels.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    let body = entries
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use logpipe_common::crd::{LogPipelineSpec, TlsConfig, ValueType};

    use super::*;

    fn defaults() -> PipelineDefaults {
        PipelineDefaults {
            fs_buffer_limit: "1G".to_string(),
        }
    }

    fn pipeline(name: &str, output: Output) -> LogPipeline {
        LogPipeline::new(name, LogPipelineSpec { output })
    }

    fn http_output(http: HttpOutput) -> Output {
        Output {
            http: Some(http),
            ..Default::default()
        }
    }

    fn lines(section: &str) -> Vec<&str> {
        section.lines().collect()
    }

    fn count_key(section: &str, key: &str) -> usize {
        let prefix = format!("    {key}  ");
        section.lines().filter(|l| l.starts_with(&prefix)).count()
    }

    #[test]
    fn unset_output_compiles_to_empty_string() {
        let p = pipeline("p1", Output::default());
        assert_eq!(create_output_section(&p, &defaults()), "");
    }

    #[test]
    fn http_output_without_host_compiles_to_empty_string() {
        let p = pipeline("p1", http_output(HttpOutput::default()));
        assert_eq!(create_output_section(&p, &defaults()), "");
    }

    #[test]
    fn custom_output_full_section() {
        let p = pipeline(
            "p1",
            Output {
                custom: "Name  kafka\nBrokers  broker:9092".to_string(),
                ..Default::default()
            },
        );
        let expected = "[OUTPUT]\n\
                        \x20   Name  kafka\n\
                        \x20   Brokers  broker:9092\n\
                        \x20   alias  p1-kafka\n\
                        \x20   match  p1.*\n\
                        \x20   storage.total_limit_size  1G\n\
                        \x20   retry_limit  300\n\
                        \n";
        assert_eq!(create_output_section(&p, &defaults()), expected);
    }

    #[test]
    fn custom_output_keeps_author_alias() {
        let section = compile_output(
            "p1",
            &Output {
                custom: "name stdout\nALIAS my-alias".to_string(),
                ..Default::default()
            },
            &defaults(),
        );
        assert_eq!(count_key(&section, "ALIAS"), 1);
        assert_eq!(count_key(&section, "alias"), 0);
        assert!(section.contains("    ALIAS  my-alias\n"));
    }

    #[test]
    fn custom_output_without_name_gets_dangling_alias() {
        let section = compile_output(
            "p1",
            &Output {
                custom: "format json".to_string(),
                ..Default::default()
            },
            &defaults(),
        );
        assert!(section.contains("    alias  p1-\n"));
    }

    #[test]
    fn custom_output_drops_comment_lines() {
        let section = compile_output(
            "p1",
            &Output {
                custom: "# forward to stdout\nname stdout".to_string(),
                ..Default::default()
            },
            &defaults(),
        );
        assert!(!section.contains('#'));
        assert_eq!(lines(&section)[1], "    name  stdout");
        assert_eq!(count_key(&section, "alias"), 1);
    }

    #[test]
    fn custom_output_duplicates_operator_owned_keys() {
        let section = compile_output(
            "p1",
            &Output {
                custom: "name http\nmatch *\nretry_limit 5".to_string(),
                ..Default::default()
            },
            &defaults(),
        );
        let l = lines(&section);
        assert_eq!(count_key(&section, "match"), 2);
        assert_eq!(count_key(&section, "retry_limit"), 2);
        // Author's copies first, operator's copies last
        assert_eq!(l[2], "    match  *");
        assert_eq!(l.last(), Some(&""));
        assert_eq!(l[l.len() - 2], "    retry_limit  300");
    }

    /// Story: HTTP output with defaults (port, format, TLS on)
    #[test]
    fn story_http_output_defaults() {
        let p = pipeline(
            "p1",
            http_output(HttpOutput {
                host: ValueType::literal("example"),
                uri: "https://example/logs".to_string(),
                ..Default::default()
            }),
        );
        let section = create_output_section(&p, &defaults());
        for expected in [
            "    tls  on\n",
            "    tls.verify  on\n",
            "    port  443\n",
            "    format  json\n",
            "    uri  https://example/logs\n",
            "    host  example\n",
        ] {
            assert!(section.contains(expected), "missing {expected:?} in {section}");
        }
        assert_eq!(count_key(&section, "compress"), 0);
        assert_eq!(count_key(&section, "http_user"), 0);
        assert_eq!(count_key(&section, "http_passwd"), 0);
        assert_eq!(count_key(&section, "tls.ca_file"), 0);
    }

    #[test]
    fn http_output_parameter_order() {
        let section = compile_output(
            "p1",
            &http_output(HttpOutput {
                host: ValueType::literal("example.com"),
                user: ValueType::literal("alice"),
                password: ValueType::literal("secret"),
                uri: "/logs".to_string(),
                compress: "gzip".to_string(),
                port: "9880".to_string(),
                format: "msgpack".to_string(),
                ..Default::default()
            }),
            &defaults(),
        );
        let keys: Vec<&str> = section
            .lines()
            .skip(1)
            .filter_map(|l| l.trim_start().split("  ").next())
            .filter(|k| !k.is_empty())
            .collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "allow_duplicated_headers",
                "match",
                "alias",
                "storage.total_limit_size",
                "retry_limit",
                "uri",
                "compress",
                "port",
                "format",
                "host",
                "http_passwd",
                "http_user",
                "tls",
                "tls.verify",
            ]
        );
        assert!(section.contains("    alias  p1-http\n"));
        assert!(section.contains("    port  9880\n"));
        assert!(section.contains("    format  msgpack\n"));
    }

    #[test]
    fn http_output_resolves_secret_refs_to_placeholders() {
        let section = compile_output(
            "http-output-pipeline",
            &http_output(HttpOutput {
                host: ValueType::from_secret("log-http-output", "log-receiver", "host"),
                password: ValueType::from_secret("log-http-output", "log-receiver", "password"),
                ..Default::default()
            }),
            &defaults(),
        );
        assert!(section.contains(
            "    host  ${HTTP_OUTPUT_PIPELINE_LOG_HTTP_OUTPUT_LOG_RECEIVER_HOST}\n"
        ));
        assert!(section.contains(
            "    http_passwd  ${HTTP_OUTPUT_PIPELINE_LOG_HTTP_OUTPUT_LOG_RECEIVER_PASSWORD}\n"
        ));
    }

    #[test]
    fn tls_flags_map_to_on_off_exactly_once() {
        for (disabled, skip) in [(false, false), (true, false), (false, true), (true, true)] {
            let section = compile_output(
                "p1",
                &http_output(HttpOutput {
                    host: ValueType::literal("example.com"),
                    tls_config: TlsConfig {
                        disabled,
                        skip_certificate_validation: skip,
                        ..Default::default()
                    },
                    ..Default::default()
                }),
                &defaults(),
            );
            assert_eq!(count_key(&section, "tls"), 1);
            assert_eq!(count_key(&section, "tls.verify"), 1);
            let tls = if disabled { "off" } else { "on" };
            let verify = if skip { "off" } else { "on" };
            assert!(section.contains(&format!("    tls  {tls}\n")));
            assert!(section.contains(&format!("    tls.verify  {verify}\n")));
        }
    }

    #[test]
    fn tls_material_emits_mount_paths() {
        let section = compile_output(
            "p1",
            &http_output(HttpOutput {
                host: ValueType::literal("example.com"),
                tls_config: TlsConfig {
                    ca: Some(ValueType::literal("ca-pem")),
                    cert: Some(ValueType::from_secret("ns", "tls", "tls.crt")),
                    key: Some(ValueType::from_secret("ns", "tls", "tls.key")),
                    ..Default::default()
                },
                ..Default::default()
            }),
            &defaults(),
        );
        assert!(section.contains("    tls.ca_file  /fluent-bit/tls/p1-ca.crt\n"));
        assert!(section.contains("    tls.crt_file  /fluent-bit/tls/p1-cert.crt\n"));
        assert!(section.contains("    tls.key_file  /fluent-bit/tls/p1-key.key\n"));
    }

    #[test]
    fn empty_tls_material_is_not_referenced() {
        let section = compile_output(
            "p1",
            &http_output(HttpOutput {
                host: ValueType::literal("example.com"),
                tls_config: TlsConfig {
                    ca: Some(ValueType::default()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            &defaults(),
        );
        assert_eq!(count_key(&section, "tls.ca_file"), 0);
    }

    #[test]
    fn loki_output_full_section() {
        let section = compile_output(
            "p1",
            &Output {
                loki: Some(LokiOutput {
                    url: ValueType::literal("http://loki:3100/loki/api/v1/push"),
                    labels: BTreeMap::from([
                        ("env".to_string(), "prod".to_string()),
                        ("app".to_string(), "foo".to_string()),
                    ]),
                    remove_keys: vec!["kubernetes".to_string(), "stream".to_string()],
                }),
                ..Default::default()
            },
            &defaults(),
        );
        let expected = "[OUTPUT]\n\
                        \x20   labelMapPath  /fluent-bit/etc/loki-labelmap.json\n\
                        \x20   loglevel  warn\n\
                        \x20   lineformat  json\n\
                        \x20   match  p1.*\n\
                        \x20   storage.total_limit_size  1G\n\
                        \x20   retry_limit  300\n\
                        \x20   name  grafana-loki\n\
                        \x20   alias  p1-grafana-loki\n\
                        \x20   url  http://loki:3100/loki/api/v1/push\n\
                        \x20   labels  {app=\"foo\", env=\"prod\"}\n\
                        \x20   removeKeys  kubernetes, stream\n\
                        \n";
        assert_eq!(section, expected);
    }

    #[test]
    fn loki_output_omits_empty_labels_and_remove_keys() {
        let section = compile_output(
            "p1",
            &Output {
                loki: Some(LokiOutput {
                    url: ValueType::from_secret("ns", "loki", "url"),
                    ..Default::default()
                }),
                ..Default::default()
            },
            &defaults(),
        );
        assert_eq!(count_key(&section, "labels"), 0);
        assert_eq!(count_key(&section, "removeKeys"), 0);
        assert!(section.contains("    url  ${P1_NS_LOKI_URL}\n"));
    }

    #[test]
    fn buffer_limit_comes_from_defaults() {
        let defaults = PipelineDefaults {
            fs_buffer_limit: "250M".to_string(),
        };
        let outputs = [
            Output {
                custom: "name stdout".to_string(),
                ..Default::default()
            },
            http_output(HttpOutput {
                host: ValueType::literal("example.com"),
                ..Default::default()
            }),
            Output {
                loki: Some(LokiOutput {
                    url: ValueType::literal("http://loki"),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ];
        for output in &outputs {
            let section = compile_output("p1", output, &defaults);
            assert_eq!(count_key(&section, "storage.total_limit_size"), 1);
            assert_eq!(count_key(&section, "retry_limit"), 1);
            assert!(section.contains("    storage.total_limit_size  250M\n"));
            assert!(section.contains("    retry_limit  300\n"));
        }
    }

    #[test]
    fn labels_are_sorted_regardless_of_map_order() {
        let ordered = BTreeMap::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);
        let hashed: HashMap<String, String> = ordered.clone().into_iter().collect();
        let mut reversed: Vec<(&String, &String)> = ordered.iter().collect();
        reversed.reverse();

        let expected = r#"{a="1", b="2", c="3"}"#;
        assert_eq!(concatenate_labels(&ordered), expected);
        assert_eq!(concatenate_labels(&hashed), expected);
        assert_eq!(concatenate_labels(reversed), expected);
    }

    #[test]
    fn labels_sort_bytewise() {
        let labels = BTreeMap::from([
            ("app".to_string(), "x".to_string()),
            ("Zone".to_string(), "y".to_string()),
        ]);
        assert_eq!(concatenate_labels(&labels), r#"{Zone="y", app="x"}"#);
    }

    #[test]
    fn tls_material_file_names() {
        assert_eq!(TlsMaterial::Ca.file_name("p1"), "p1-ca.crt");
        assert_eq!(TlsMaterial::Cert.file_name("p1"), "p1-cert.crt");
        assert_eq!(TlsMaterial::Key.file_name("p1"), "p1-key.key");
    }
}
