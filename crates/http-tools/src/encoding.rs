//! Percent-encoding and argument stringification for URL composition.

use serde_json::Value;

/// Percent-encode a path segment or query component.
///
/// Everything outside the RFC 3986 unreserved set (`ALPHA / DIGIT / "-" / "." / "_" / "~"`)
/// is encoded, including `/`, `?`, `&`, `=` and spaces.
#[must_use]
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Convert a JSON argument value to the string placed in a URL.
///
/// Strings are used as-is (no surrounding quotes); arrays and objects fall back to their
/// compact JSON text.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
