//! YAML manifest loading
//!
//! Manifests are parsed with yaml-rust2, converted to `serde_json::Value`, and
//! then deserialized into typed resources. Multi-document input (`---`
//! separated) is supported; empty documents are skipped.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

use crate::{Error, Result};

/// Parse every document of a YAML string into `serde_json::Value`s.
pub fn parse_documents(input: &str) -> Result<Vec<Value>> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| Error::serialization(e.to_string()))?;
    docs.into_iter().map(to_json).collect()
}

/// Parse every non-empty document of a YAML string as `T`.
///
/// `kind` names the expected resource kind for error messages.
pub fn load_all<T: DeserializeOwned>(input: &str, kind: &str) -> Result<Vec<T>> {
    parse_documents(input)?
        .into_iter()
        .filter(|doc| !doc.is_null())
        .enumerate()
        .map(|(index, doc)| {
            serde_json::from_value(doc).map_err(|e| {
                Error::serialization_for_kind(kind, format!("document {index}: {e}"))
            })
        })
        .collect()
}

fn to_json(yaml: Yaml) -> Result<Value> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Boolean(b) => Value::Bool(b),
        Yaml::Integer(i) => Value::Number(i.into()),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e: std::num::ParseFloatError| Error::serialization(e.to_string()))?;
            Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Array(items) => Value::Array(items.into_iter().map(to_json).collect::<Result<_>>()?),
        Yaml::Hash(map) => {
            let mut object = Map::with_capacity(map.len());
            for (k, v) in map {
                object.insert(key_to_string(k)?, to_json(v)?);
            }
            Value::Object(object)
        }
        Yaml::Alias(_) => return Err(Error::serialization("YAML aliases not supported")),
        Yaml::BadValue => return Err(Error::serialization("bad YAML value")),
    })
}

fn key_to_string(key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err(Error::serialization("unsupported YAML key type")),
    }
}
