//! Normalized property values.

use crate::kind::PropertyKind;
use crate::rich_text;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// Plain value read from a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<PropertyValue>),
    Json(Value),
}

impl PropertyValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts back to JSON (lists become arrays).
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

/// `"start"`, `"start~end"`, or `""` when the date is absent.
#[must_use]
pub fn date_string(date: &Value) -> String {
    let start = date.get("start").and_then(Value::as_str);
    let end = date.get("end").and_then(Value::as_str);
    match (start, end) {
        (Some(start), Some(end)) => format!("{start}~{end}"),
        (Some(start), None) => start.to_string(),
        _ => String::new(),
    }
}

fn name_of(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .map(|name| name.replace('\u{a0}', " "))
}

/// Recursively strips `{type, <type>: value}` envelopes.
///
/// Used for formula and rollup results and for properties whose wire type is
/// not registered.
#[must_use]
pub fn unwrap_envelope(raw: &Value) -> PropertyValue {
    match raw {
        Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => PropertyValue::Number(n.clone()),
        Value::String(s) => PropertyValue::Text(s.clone()),
        Value::Array(_) if rich_text::is_rich_text_array(raw) => {
            PropertyValue::Text(rich_text::to_plain(raw))
        }
        Value::Array(items) => PropertyValue::List(items.iter().map(unwrap_envelope).collect()),
        Value::Object(map) => {
            let tagged = map
                .get("type")
                .and_then(Value::as_str)
                .and_then(|tag| map.get(tag).map(|inner| (tag, inner)));
            match tagged {
                Some(("date", inner)) => PropertyValue::Text(date_string(inner)),
                Some(("title" | "rich_text", inner)) => {
                    PropertyValue::Text(rich_text::to_plain(inner))
                }
                Some((_, inner)) => unwrap_envelope(inner),
                None if map.contains_key("start") => PropertyValue::Text(date_string(raw)),
                None => name_of(raw).map_or_else(|| PropertyValue::Json(raw.clone()), PropertyValue::Text),
            }
        }
    }
}

/// Element of a multi-valued property: its name, else its id.
fn element(raw: &Value) -> PropertyValue {
    if let Some(name) = name_of(raw) {
        return PropertyValue::Text(name);
    }
    match raw.get("id").and_then(Value::as_str) {
        Some(id) => PropertyValue::Text(id.to_string()),
        None => unwrap_envelope(raw),
    }
}

fn scalar(raw: &Value) -> PropertyValue {
    match raw {
        Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => PropertyValue::Number(n.clone()),
        Value::String(s) => PropertyValue::Text(s.clone()),
        other => PropertyValue::Json(other.clone()),
    }
}

/// Normalizes the inner value of a row-scoped property of `kind`.
pub(crate) fn normalize_row(kind: PropertyKind, raw: &Value) -> PropertyValue {
    use PropertyKind as K;
    match kind {
        K::Title | K::RichText | K::Text => PropertyValue::Text(rich_text::to_plain(raw)),
        K::Number
        | K::Checkbox
        | K::Url
        | K::Email
        | K::PhoneNumber
        | K::CreatedTime
        | K::LastEditedTime => scalar(raw),
        K::Select | K::Status => match raw {
            Value::Null => PropertyValue::Null,
            other => element(other),
        },
        K::MultiSelect | K::People | K::Relation | K::Files => match raw {
            Value::Array(items) => PropertyValue::List(items.iter().map(element).collect()),
            Value::Null => PropertyValue::List(Vec::new()),
            other => unwrap_envelope(other),
        },
        K::Date => PropertyValue::Text(date_string(raw)),
        K::CreatedBy | K::LastEditedBy => element(raw),
        K::Formula | K::Rollup => unwrap_envelope(raw),
    }
}
