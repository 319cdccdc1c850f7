//! Ordered configuration parameter lists and section rendering
//!
//! Parameters are an append log: insertion order is preserved, duplicate keys
//! are kept, and nothing is sorted or deduplicated at render time.

/// Header line opening an output section
pub const OUTPUT_SECTION_HEADER: &str = "[OUTPUT]";

const INDENT: &str = "    ";
const KEY_VALUE_SEPARATOR: &str = "  ";

/// A single `key value` directive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigParam {
    /// Directive name, stored verbatim
    pub key: String,
    /// Directive value
    pub value: String,
}

impl ConfigParam {
    /// Create a parameter
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of parameters with case-insensitive key lookup
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigParams(Vec<ConfigParam>);

impl ConfigParams {
    /// Append a parameter
    pub fn push(&mut self, param: ConfigParam) {
        self.0.push(param);
    }

    /// Returns true if any parameter has this key (ASCII case-insensitive)
    pub fn contains_key(&self, key: &str) -> bool {
        self.get_by_key(key).is_some()
    }

    /// First parameter with this key (ASCII case-insensitive)
    pub fn get_by_key(&self, key: &str) -> Option<&ConfigParam> {
        self.0.iter().find(|p| p.key.eq_ignore_ascii_case(key))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigParam> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ConfigParams {
    type Item = &'a ConfigParam;
    type IntoIter = std::slice::Iter<'a, ConfigParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ConfigParam> for ConfigParams {
    fn from_iter<I: IntoIterator<Item = ConfigParam>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Accumulates the parameters of one configuration section and renders it
#[derive(Clone, Debug)]
pub struct SectionBuilder {
    header: &'static str,
    params: ConfigParams,
}

impl SectionBuilder {
    /// Builder for an `[OUTPUT]` section
    pub fn output() -> Self {
        Self {
            header: OUTPUT_SECTION_HEADER,
            params: ConfigParams::default(),
        }
    }

    /// Append a parameter unconditionally
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push(ConfigParam::new(key, value));
        self
    }

    /// Append a parameter only if its value is not blank
    pub fn add_if_not_empty(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.add(key, value);
        }
        self
    }

    /// Append a parameter, falling back to `default` if the value is blank
    pub fn add_if_not_empty_or_default(&mut self, key: &str, value: &str, default: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(key, default)
        } else {
            self.add(key, value)
        }
    }

    /// Returns true if a parameter with this key was added (case-insensitive)
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// First added parameter with this key (case-insensitive)
    pub fn get_by_key(&self, key: &str) -> Option<&ConfigParam> {
        self.params.get_by_key(key)
    }

    /// Parameters added so far
    pub fn params(&self) -> &ConfigParams {
        &self.params
    }

    /// Render the section.
    ///
    /// The header line is followed by one `    key  value` line per parameter
    /// in insertion order, and the section is closed by an empty line.
    pub fn build(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + 2 + self.params.len() * 32);
        out.push_str(self.header);
        out.push('\n');
        for param in &self.params {
            out.push_str(INDENT);
            out.push_str(&param.key);
            out.push_str(KEY_VALUE_SEPARATOR);
            out.push_str(&param.value);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}
