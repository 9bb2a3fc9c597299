//! Conversions between plain strings and rich-text arrays.

use serde_json::{Value, json};

/// Flattens a rich-text array into plain text.
///
/// Fragments are joined with a single space; non-breaking spaces become
/// regular spaces. Fragments without `plain_text` fall back to
/// `text.content`. A bare string is returned as-is.
#[must_use]
pub fn to_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\u{a0}', " "),
        Value::Array(fragments) => fragments
            .iter()
            .map(fragment_text)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn fragment_text(fragment: &Value) -> String {
    fragment
        .get("plain_text")
        .and_then(Value::as_str)
        .or_else(|| fragment.pointer("/text/content").and_then(Value::as_str))
        .unwrap_or_default()
        .replace('\u{a0}', " ")
}

/// Builds the single-fragment array the service accepts for a plain string.
#[must_use]
pub fn from_plain(text: &str) -> Value {
    json!([{ "text": { "content": text }, "plain_text": text }])
}

/// Wraps strings; structured arrays pass through unchanged.
#[must_use]
pub fn wrap(value: &Value) -> Value {
    match value {
        Value::String(s) => from_plain(s),
        other => other.clone(),
    }
}

/// True when every element looks like a rich-text fragment.
#[must_use]
pub fn is_rich_text_array(value: &Value) -> bool {
    value.as_array().is_some_and(|items| {
        !items.is_empty() && items.iter().all(|item| item.get("plain_text").is_some())
    })
}
