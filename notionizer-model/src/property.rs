//! A single property of a single entity.

use crate::error::{ModelError, ModelResult};
use crate::kind::PropertyKind;
use crate::registry::{PropertyDescriptor, PropertyTypeRegistry};
use crate::value::{self, PropertyValue};
use notionizer_types::{ObjectId, ObjectKind};
use serde_json::{Map, Value, json};

static NULL: Value = Value::Null;

/// Whether a property carries a row value or a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Bound to a page: holds the value of one cell.
    Row,
    /// Bound to a database: describes the column itself.
    Schema,
}

impl From<ObjectKind> for Scope {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Page => Self::Row,
            ObjectKind::Database => Self::Schema,
        }
    }
}

/// Local wrapper around one property's raw JSON.
///
/// The object never changes after construction. Writes return request
/// payloads; the owning entity sends them and rebuilds its collection from
/// the response.
#[derive(Debug, Clone)]
pub struct PropertyObject {
    owner: ObjectId,
    owner_kind: ObjectKind,
    name: String,
    wire_type: String,
    raw: Value,
    descriptor: Option<PropertyDescriptor>,
}

impl PropertyObject {
    /// Resolves `raw` (`{id, type, <type>: …}`) against the registry.
    ///
    /// Database-scoped `rich_text` columns are tracked as `text`.
    pub fn resolve(
        registry: &PropertyTypeRegistry,
        owner: ObjectId,
        owner_kind: ObjectKind,
        name: &str,
        raw: Value,
    ) -> ModelResult<Self> {
        let tag = wire_tag(name, &raw)?;
        let wire_type = match (owner_kind, tag) {
            (ObjectKind::Database, "rich_text") => "text".to_string(),
            (_, tag) => tag.to_string(),
        };
        let descriptor = *registry.resolve(owner_kind, &wire_type)?;
        Ok(Self {
            owner,
            owner_kind,
            name: name.to_string(),
            wire_type,
            raw,
            descriptor: Some(descriptor),
        })
    }

    /// Builds an object for a wire type the registry does not know.
    pub fn catch_all(
        owner: ObjectId,
        owner_kind: ObjectKind,
        name: &str,
        raw: Value,
    ) -> ModelResult<Self> {
        let wire_type = wire_tag(name, &raw)?.to_string();
        Ok(Self {
            owner,
            owner_kind,
            name: name.to_string(),
            wire_type,
            raw,
            descriptor: None,
        })
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn owner_kind(&self) -> ObjectKind {
        self.owner_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_type(&self) -> &str {
        &self.wire_type
    }

    /// `None` for catch-all objects.
    pub fn kind(&self) -> Option<PropertyKind> {
        self.descriptor.map(|d| d.kind())
    }

    pub fn descriptor(&self) -> Option<&PropertyDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn scope(&self) -> Scope {
        Scope::from(self.owner_kind)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The service-assigned property id.
    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(Value::as_str)
    }

    pub fn is_catch_all(&self) -> bool {
        self.descriptor.is_none()
    }

    /// True when a row value may be written.
    pub fn is_mutable(&self) -> bool {
        self.scope() == Scope::Row && self.descriptor.is_some_and(|d| d.is_mutable())
    }

    /// The value under the `<type>` key, using the tag the service sent.
    fn inner(&self) -> &Value {
        self.raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(|tag| self.raw.get(tag))
            .unwrap_or(&NULL)
    }

    /// Normalized value.
    ///
    /// Row scope yields plain values; schema scope yields the column
    /// configuration as JSON.
    pub fn value(&self) -> PropertyValue {
        match (self.scope(), self.kind()) {
            (Scope::Schema, _) => PropertyValue::Json(self.inner().clone()),
            (Scope::Row, Some(kind)) => value::normalize_row(kind, self.inner()),
            (Scope::Row, None) => value::unwrap_envelope(self.inner()),
        }
    }

    /// Option names of a select, multi-select or status column.
    pub fn options(&self) -> Vec<String> {
        if self.scope() != Scope::Schema || !self.kind().is_some_and(|k| k.has_options()) {
            return Vec::new();
        }
        self.inner()
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|o| o.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn require_descriptor(&self) -> ModelResult<&PropertyDescriptor> {
        self.descriptor.as_ref().ok_or_else(|| ModelError::Schema {
            wire_type: self.wire_type.clone(),
        })
    }

    /// Validates `value` and converts it to the `<type>`-keyed payload.
    ///
    /// Works for both scopes; a schema-scoped object validates the input a
    /// new row would carry for this column.
    pub fn payload_for(&self, value: &Value) -> ModelResult<Value> {
        let descriptor = self.require_descriptor()?;
        descriptor.validate(&self.name, value)?;
        Ok(descriptor.to_update_payload(value))
    }

    /// Builds the `{name: payload}` body for a row value write.
    pub fn prepare_update(&self, value: &Value) -> ModelResult<Value> {
        if self.scope() == Scope::Schema {
            self.require_descriptor()?;
            return Err(ModelError::Immutable {
                name: self.name.clone(),
            });
        }
        let payload = self.payload_for(value)?;
        Ok(self.keyed(payload))
    }

    /// Builds the `{name: {"name": new}}` body that renames a column.
    pub fn prepare_rename(&self, new_name: &str) -> ModelResult<Value> {
        self.require_schema()?;
        if new_name.trim().is_empty() {
            return Err(ModelError::Malformed {
                name: self.name.clone(),
                reason: "new name must not be empty".to_string(),
            });
        }
        Ok(self.keyed(json!({ "name": new_name })))
    }

    /// Builds the `{name: {"type": t, t: {}}}` body that changes a column's type.
    pub fn prepare_retype(&self, kind: PropertyKind) -> ModelResult<Value> {
        self.require_schema()?;
        if matches!(
            kind,
            PropertyKind::Formula | PropertyKind::Rollup | PropertyKind::Relation
        ) {
            return Err(ModelError::Malformed {
                name: self.name.clone(),
                reason: format!("'{kind}' columns need a configuration"),
            });
        }
        let tag = kind.request_key();
        let mut change = Map::new();
        change.insert("type".to_string(), Value::String(tag.to_string()));
        change.insert(tag.to_string(), json!({}));
        Ok(self.keyed(Value::Object(change)))
    }

    fn require_schema(&self) -> ModelResult<()> {
        if self.scope() == Scope::Schema {
            Ok(())
        } else {
            Err(ModelError::Immutable {
                name: self.name.clone(),
            })
        }
    }

    fn keyed(&self, payload: Value) -> Value {
        let mut body = Map::new();
        body.insert(self.name.clone(), payload);
        Value::Object(body)
    }
}

fn wire_tag<'a>(name: &str, raw: &'a Value) -> ModelResult<&'a str> {
    raw.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelError::Malformed {
            name: name.to_string(),
            reason: "missing 'type' tag".to_string(),
        })
}
