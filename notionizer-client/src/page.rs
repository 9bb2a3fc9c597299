//! Page handles.

use crate::database::Database;
use crate::entity::Entity;
use crate::error::{ClientError, ClientResult};
use indexmap::IndexMap;
use notionizer_model::PropertyValue;
use notionizer_types::{ObjectId, ObjectKind};
use serde_json::Value;
use std::ops::Deref;

/// A page: one row of a database, or a standalone document.
#[derive(Debug, Clone)]
pub struct Page(Entity);

impl Page {
    pub(crate) fn from_entity(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    /// Writes one row value and refreshes from the response.
    ///
    /// The value is validated against the property's type before any
    /// request is made.
    pub fn set_property(&self, name: &str, value: impl Into<Value>) -> ClientResult<()> {
        let value = value.into();
        let body = self.read(|state| {
            let property = state
                .properties()
                .get(name)
                .ok_or_else(|| ClientError::UnknownProperty(name.to_string()))?;
            Ok::<_, ClientError>(property.prepare_update(&value)?)
        })?;
        self.update("properties", body)
    }

    /// Normalized value of one property.
    pub fn property_value(&self, name: &str) -> Option<PropertyValue> {
        self.read(|state| state.properties().get(name).map(|p| p.value()))
    }

    /// Normalized values of every property, in server order.
    pub fn property_values(&self) -> IndexMap<String, PropertyValue> {
        self.read(|state| state.properties().values())
    }

    /// Plain text of the title property.
    pub fn title(&self) -> String {
        self.read(|state| state.title())
    }

    pub fn set_title(&self, title: &str) -> ClientResult<()> {
        self.set_field("title", Value::String(title.to_string()))
    }

    pub fn is_archived(&self) -> bool {
        self.read(|state| state.archived())
    }

    /// Moves the page to the trash.
    pub fn archive(&self) -> ClientResult<()> {
        self.set_field("archived", Value::Bool(true))
    }

    pub fn restore(&self) -> ClientResult<()> {
        self.set_field("archived", Value::Bool(false))
    }

    /// Id of the database this page is a row of.
    pub fn parent_database_id(&self) -> Option<ObjectId> {
        self.read(|state| {
            state
                .parent()
                .get("database_id")
                .and_then(Value::as_str)
                .and_then(|id| ObjectId::parse(id).ok())
        })
    }

    /// The parent database, from the cache or fetched.
    pub fn parent_database(&self) -> ClientResult<Option<Database>> {
        match self.parent_database_id() {
            Some(id) => self
                .context()
                .lookup(ObjectKind::Database, id)
                .map(|entity| Some(Database::from_entity(entity))),
            None => Ok(None),
        }
    }
}

impl Deref for Page {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.0
    }
}

impl TryFrom<Entity> for Page {
    type Error = ClientError;

    fn try_from(entity: Entity) -> ClientResult<Self> {
        match entity.kind() {
            ObjectKind::Page => Ok(Self(entity)),
            found => Err(ClientError::WrongKind {
                expected: ObjectKind::Page,
                found,
            }),
        }
    }
}
