//! Descriptor tables keyed by wire type.
//!
//! One table per owner kind: page rows carry values, database schemas carry
//! column definitions. The database table is what `create_page` inputs are
//! validated against.

use crate::error::{ModelError, ModelResult};
use crate::kind::PropertyKind;
use crate::rich_text;
use notionizer_types::ObjectKind;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::fmt;

/// Dynamic type of a locally supplied JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocalType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl LocalType {
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for LocalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type PayloadFn = fn(PropertyKind, &Value) -> Value;

const TEXTUAL: &[LocalType] = &[LocalType::String, LocalType::Array];
const NUMERIC: &[LocalType] = &[LocalType::Number];
const BOOLEAN: &[LocalType] = &[LocalType::Bool];
const STRING: &[LocalType] = &[LocalType::String];
const CHOICE: &[LocalType] = &[LocalType::String, LocalType::Object];
const LIST: &[LocalType] = &[LocalType::Array];
const NOTHING: &[LocalType] = &[];

/// Behaviour of one wire type for one owner kind.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    kind: PropertyKind,
    accepted: &'static [LocalType],
    mutable: bool,
    convert: PayloadFn,
}

impl PropertyDescriptor {
    const fn new(
        kind: PropertyKind,
        accepted: &'static [LocalType],
        mutable: bool,
        convert: PayloadFn,
    ) -> Self {
        Self {
            kind,
            accepted,
            mutable,
            convert,
        }
    }

    const fn read_only(kind: PropertyKind) -> Self {
        Self::new(kind, NOTHING, false, scalar_payload)
    }

    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    #[must_use]
    pub const fn wire_type(&self) -> &'static str {
        self.kind.as_wire()
    }

    #[must_use]
    pub const fn accepted(&self) -> &'static [LocalType] {
        self.accepted
    }

    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.accepted.contains(&LocalType::of(value))
    }

    /// Checks mutability and the value's local type for the property `name`.
    pub fn validate(&self, name: &str, value: &Value) -> ModelResult<()> {
        if !self.mutable {
            return Err(ModelError::Immutable {
                name: name.to_string(),
            });
        }
        if !self.accepts(value) {
            return Err(ModelError::Validation {
                name: name.to_string(),
                expected: self.expected(),
                actual: LocalType::of(value),
            });
        }
        Ok(())
    }

    /// Converts a validated local value into the service's request shape.
    #[must_use]
    pub fn to_update_payload(&self, value: &Value) -> Value {
        (self.convert)(self.kind, value)
    }

    fn expected(&self) -> String {
        self.accepted
            .iter()
            .map(LocalType::as_str)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

// ── Payload converters ───────────────────────────────────────────

fn keyed(kind: PropertyKind, value: Value) -> Value {
    let mut body = Map::new();
    body.insert(kind.request_key().to_string(), value);
    Value::Object(body)
}

fn scalar_payload(kind: PropertyKind, value: &Value) -> Value {
    keyed(kind, value.clone())
}

fn rich_text_payload(kind: PropertyKind, value: &Value) -> Value {
    keyed(kind, rich_text::wrap(value))
}

fn choice_payload(kind: PropertyKind, value: &Value) -> Value {
    let choice = match value {
        Value::String(name) => json!({ "name": name }),
        other => other.clone(),
    };
    keyed(kind, choice)
}

fn wrap_elements(value: &Value, wrap: impl Fn(&str) -> Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => wrap(s),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn multi_choice_payload(kind: PropertyKind, value: &Value) -> Value {
    keyed(kind, wrap_elements(value, |s| json!({ "name": s })))
}

fn reference_payload(kind: PropertyKind, value: &Value) -> Value {
    keyed(kind, wrap_elements(value, |s| json!({ "id": s })))
}

fn files_payload(kind: PropertyKind, value: &Value) -> Value {
    keyed(
        kind,
        wrap_elements(value, |s| {
            json!({ "name": s, "type": "external", "external": { "url": s } })
        }),
    )
}

/// `"start"` / `"start~end"` strings become a date object (`"start~"` has no
/// end); `""` clears it.
fn date_payload(kind: PropertyKind, value: &Value) -> Value {
    let date = match value {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::String(s) => match s.split_once('~') {
            Some((start, "")) => json!({ "start": start, "end": null }),
            Some((start, end)) => json!({ "start": start, "end": end }),
            None => json!({ "start": s, "end": null }),
        },
        other => other.clone(),
    };
    keyed(kind, date)
}

// ── Registry ─────────────────────────────────────────────────────

/// Descriptor tables for page rows and database schemas.
#[derive(Debug, Clone)]
pub struct PropertyTypeRegistry {
    page: HashMap<PropertyKind, PropertyDescriptor>,
    database: HashMap<PropertyKind, PropertyDescriptor>,
}

impl PropertyTypeRegistry {
    /// Builds the tables for every kind the service defines.
    #[must_use]
    pub fn standard() -> Self {
        use PropertyKind as K;

        let writable = [
            PropertyDescriptor::new(K::Title, TEXTUAL, true, rich_text_payload),
            PropertyDescriptor::new(K::Number, NUMERIC, true, scalar_payload),
            PropertyDescriptor::new(K::Checkbox, BOOLEAN, true, scalar_payload),
            PropertyDescriptor::new(K::Url, STRING, true, scalar_payload),
            PropertyDescriptor::new(K::Email, STRING, true, scalar_payload),
            PropertyDescriptor::new(K::PhoneNumber, STRING, true, scalar_payload),
            PropertyDescriptor::new(K::Select, CHOICE, true, choice_payload),
            PropertyDescriptor::new(K::Status, CHOICE, true, choice_payload),
            PropertyDescriptor::new(K::MultiSelect, LIST, true, multi_choice_payload),
            PropertyDescriptor::new(K::Date, CHOICE, true, date_payload),
            PropertyDescriptor::new(K::People, LIST, true, reference_payload),
            PropertyDescriptor::new(K::Files, LIST, true, files_payload),
        ];
        let computed = [
            K::Formula,
            K::Rollup,
            K::CreatedTime,
            K::CreatedBy,
            K::LastEditedTime,
            K::LastEditedBy,
        ]
        .map(PropertyDescriptor::read_only);

        let mut page: HashMap<_, _> = writable
            .iter()
            .chain(computed.iter())
            .map(|d| (d.kind, *d))
            .collect();
        page.insert(
            K::RichText,
            PropertyDescriptor::new(K::RichText, TEXTUAL, true, rich_text_payload),
        );
        page.insert(
            K::Relation,
            PropertyDescriptor::new(K::Relation, LIST, true, reference_payload),
        );

        let mut database: HashMap<_, _> = writable
            .iter()
            .chain(computed.iter())
            .map(|d| (d.kind, *d))
            .collect();
        database.insert(
            K::Text,
            PropertyDescriptor::new(K::Text, TEXTUAL, true, rich_text_payload),
        );
        database.insert(K::Relation, PropertyDescriptor::read_only(K::Relation));

        Self { page, database }
    }

    fn table(&self, owner: ObjectKind) -> &HashMap<PropertyKind, PropertyDescriptor> {
        match owner {
            ObjectKind::Page => &self.page,
            ObjectKind::Database => &self.database,
        }
    }

    /// Resolves a wire tag for the given owner kind.
    pub fn resolve(&self, owner: ObjectKind, wire_type: &str) -> ModelResult<&PropertyDescriptor> {
        PropertyKind::from_wire(wire_type)
            .and_then(|kind| self.table(owner).get(&kind))
            .ok_or_else(|| ModelError::Schema {
                wire_type: wire_type.to_string(),
            })
    }

    #[must_use]
    pub fn descriptor(&self, owner: ObjectKind, kind: PropertyKind) -> Option<&PropertyDescriptor> {
        self.table(owner).get(&kind)
    }

    /// Number of registered kinds for an owner.
    #[must_use]
    pub fn len(&self, owner: ObjectKind) -> usize {
        self.table(owner).len()
    }
}

impl Default for PropertyTypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
