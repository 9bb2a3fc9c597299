//! Ordered property map of one entity.

use crate::error::{ModelError, ModelResult};
use crate::kind::PropertyKind;
use crate::property::PropertyObject;
use crate::registry::PropertyTypeRegistry;
use crate::value::PropertyValue;
use indexmap::IndexMap;
use notionizer_types::{ObjectId, ObjectKind};
use serde_json::Value;
use tracing::warn;

/// Name → [`PropertyObject`] map in server order.
///
/// Built wholesale from an entity's `properties` JSON. There is no public
/// way to add or replace entries afterwards; [`insert`](Self::insert) only
/// succeeds during construction.
#[derive(Debug, Clone, Default)]
pub struct PropertiesCollection {
    entries: IndexMap<String, PropertyObject>,
    schema_errors: Vec<(String, ModelError)>,
    rebuilding: bool,
}

impl PropertiesCollection {
    /// Builds the collection for `owner` from a raw `properties` object.
    ///
    /// Unregistered wire types become catch-all objects and their
    /// `SchemaError` is kept in [`schema_errors`](Self::schema_errors).
    /// Entries without a `type` tag are skipped the same way.
    pub fn build(
        registry: &PropertyTypeRegistry,
        owner: ObjectId,
        owner_kind: ObjectKind,
        raw: &Value,
    ) -> ModelResult<Self> {
        let properties = match raw {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => {
                return Err(ModelError::Malformed {
                    name: "properties".to_string(),
                    reason: "expected an object".to_string(),
                });
            }
        };

        let mut collection = Self {
            rebuilding: true,
            ..Self::default()
        };
        for (name, value) in properties {
            let object =
                match PropertyObject::resolve(registry, owner, owner_kind, name, value.clone()) {
                    Ok(object) => object,
                    Err(err @ ModelError::Schema { .. }) => {
                        warn!(property = %name, %owner, "{err}");
                        let fallback =
                            PropertyObject::catch_all(owner, owner_kind, name, value.clone())?;
                        collection.schema_errors.push((name.clone(), err));
                        fallback
                    }
                    Err(err) => {
                        warn!(property = %name, %owner, "{err}");
                        collection.schema_errors.push((name.clone(), err));
                        continue;
                    }
                };
            collection.insert(object)?;
        }
        collection.rebuilding = false;
        Ok(collection)
    }

    /// Adds an entry. Fails with [`ModelError::ReadOnlyCollection`] outside
    /// of construction.
    pub fn insert(&mut self, object: PropertyObject) -> ModelResult<()> {
        if !self.rebuilding {
            return Err(ModelError::ReadOnlyCollection);
        }
        self.entries.insert(object.name().to_string(), object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyObject> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyObject)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized value of every property, in order.
    pub fn values(&self) -> IndexMap<String, PropertyValue> {
        self.entries
            .iter()
            .map(|(name, object)| (name.clone(), object.value()))
            .collect()
    }

    /// First property of the given kind (e.g. the title column).
    pub fn find_kind(&self, kind: PropertyKind) -> Option<&PropertyObject> {
        self.entries.values().find(|object| object.kind() == Some(kind))
    }

    /// Properties that could not be resolved, with the reason.
    pub fn schema_errors(&self) -> &[(String, ModelError)] {
        &self.schema_errors
    }
}

impl<'a> IntoIterator for &'a PropertiesCollection {
    type Item = (&'a String, &'a PropertyObject);
    type IntoIter = indexmap::map::Iter<'a, String, PropertyObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
