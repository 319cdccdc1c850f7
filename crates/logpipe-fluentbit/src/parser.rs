//! Parsing of free-form custom output text
//!
//! Each non-blank line is a `key value` directive. Lines starting with `#`
//! are comments, as in the agent's own configuration format. The key ends at the first
//! whitespace; the value is the rest of the line with surrounding whitespace
//! removed. Keys are not checked against any schema.

use tracing::trace;

use crate::builder::{ConfigParam, ConfigParams};

/// Parse multiline `key value` text into ordered parameters.
///
/// Blank and comment lines are skipped. Lines with a key but no value are skipped as
/// malformed rather than rejected.
pub fn parse_multiline(text: &str) -> ConfigParams {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let param = parse_line(line);
            if param.is_none() {
                trace!(line = index + 1, "skipping custom output line without a value");
            }
            param
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ConfigParam> {
    let (key, rest) = line.split_once(char::is_whitespace)?;
    let value = rest.trim();
    if value.is_empty() {
        return None;
    }
    Some(ConfigParam::new(key, value))
}
