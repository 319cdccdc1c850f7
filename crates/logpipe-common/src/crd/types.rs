//! Shared value types for CRD specs

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A configuration value given either literally or by reference to a secret.
///
/// A non-empty literal always wins over a secret reference on the same field.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValueType {
    /// Literal value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Indirect source for the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<ValueFromSource>,
}

impl ValueType {
    /// Create a literal value
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_from: None,
        }
    }

    /// Create a value backed by a secret key
    pub fn from_secret(
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            value: String::new(),
            value_from: Some(ValueFromSource {
                secret_key_ref: Some(SecretKeyRef {
                    name: name.into(),
                    namespace: namespace.into(),
                    key: key.into(),
                }),
            }),
        }
    }

    /// Returns true if either a literal or a usable secret reference is set
    pub fn is_defined(&self) -> bool {
        !self.value.is_empty() || self.secret_key_ref().is_some()
    }

    /// The secret reference backing this value, if it is usable.
    ///
    /// Returns `None` when a literal is set, since the literal takes precedence.
    pub fn secret_key_ref(&self) -> Option<&SecretKeyRef> {
        if !self.value.is_empty() {
            return None;
        }
        self.value_from
            .as_ref()
            .filter(|from| from.is_secret_key_ref())
            .and_then(|from| from.secret_key_ref.as_ref())
    }
}

/// Indirect value source
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValueFromSource {
    /// Reference to a key within a Kubernetes Secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<SecretKeyRef>,
}

impl ValueFromSource {
    /// Returns true if a secret key reference with a name and key is present
    pub fn is_secret_key_ref(&self) -> bool {
        self.secret_key_ref
            .as_ref()
            .is_some_and(|r| !r.name.is_empty() && !r.key.is_empty())
    }
}

/// Reference to a key within a Kubernetes Secret
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct SecretKeyRef {
    /// Secret name
    pub name: String,
    /// Secret namespace
    #[serde(default)]
    pub namespace: String,
    /// Key within the secret
    pub key: String,
}

impl std::fmt::Display for SecretKeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.namespace, self.name, self.key)
    }
}
