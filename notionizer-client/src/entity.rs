//! Entity state and the shared handle behind [`Database`](crate::Database)
//! and [`Page`](crate::Page).

use crate::cache::EntityCell;
use crate::client::ClientContext;
use crate::error::{ClientError, ClientResult};
use notionizer_model::{
    LocalType, ModelError, PropertiesCollection, PropertyKind, PropertyTypeRegistry, rich_text,
};
use notionizer_types::{ObjectId, ObjectKind, Timestamp};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Top-level fields that are never written by the client.
pub const IMMUTABLE_FIELDS: &[&str] = &[
    "id",
    "object",
    "created_time",
    "last_edited_time",
    "created_by",
    "last_edited_by",
    "parent",
    "url",
];

/// Top-level fields accepted by [`Entity::set_field`].
pub const MUTABLE_FIELDS: &[&str] = &["title", "icon", "cover", "archived", "properties"];

/// Everything known locally about one database or page.
///
/// Always built from a complete server response; never edited field by
/// field.
#[derive(Debug, Clone)]
pub struct EntityState {
    id: ObjectId,
    kind: ObjectKind,
    created_time: Option<Timestamp>,
    last_edited_time: Option<Timestamp>,
    created_by: Value,
    last_edited_by: Value,
    parent: Value,
    icon: Value,
    cover: Value,
    url: Option<String>,
    title: Value,
    archived: bool,
    properties: PropertiesCollection,
    raw: Value,
}

impl EntityState {
    /// Builds the state from an entity JSON object.
    pub fn from_json(registry: &PropertyTypeRegistry, raw: Value) -> ClientResult<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| ClientError::UnexpectedResponse("entity is not an object".into()))?;

        let tag = object
            .get("object")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::UnexpectedResponse("entity has no 'object' tag".into()))?;
        let kind = ObjectKind::from_wire(tag)?;

        let id = object
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("{kind} has no 'id'")))?;
        let id = ObjectId::parse(id)?;

        let timestamp = |key: &str| -> ClientResult<Option<Timestamp>> {
            match object.get(key).and_then(Value::as_str) {
                Some(s) => Ok(Some(Timestamp::parse(s)?)),
                None => Ok(None),
            }
        };
        let field = |key: &str| object.get(key).cloned().unwrap_or(Value::Null);

        let properties = PropertiesCollection::build(
            registry,
            id,
            kind,
            object.get("properties").unwrap_or(&Value::Null),
        )?;

        Ok(Self {
            id,
            kind,
            created_time: timestamp("created_time")?,
            last_edited_time: timestamp("last_edited_time")?,
            created_by: field("created_by"),
            last_edited_by: field("last_edited_by"),
            parent: field("parent"),
            icon: field("icon"),
            cover: field("cover"),
            url: object.get("url").and_then(Value::as_str).map(str::to_string),
            title: field("title"),
            archived: object.get("archived").and_then(Value::as_bool).unwrap_or(false),
            properties,
            raw,
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn created_time(&self) -> Option<Timestamp> {
        self.created_time
    }

    pub fn last_edited_time(&self) -> Option<Timestamp> {
        self.last_edited_time
    }

    pub fn created_by(&self) -> &Value {
        &self.created_by
    }

    pub fn last_edited_by(&self) -> &Value {
        &self.last_edited_by
    }

    pub fn parent(&self) -> &Value {
        &self.parent
    }

    pub fn icon(&self) -> &Value {
        &self.icon
    }

    pub fn cover(&self) -> &Value {
        &self.cover
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Raw top-level `title` (databases only; a page's title is a property).
    pub fn title_raw(&self) -> &Value {
        &self.title
    }

    /// Plain-text title.
    pub fn title(&self) -> String {
        match self.kind {
            ObjectKind::Database => rich_text::to_plain(&self.title),
            ObjectKind::Page => self
                .properties
                .find_kind(PropertyKind::Title)
                .and_then(|p| p.value().as_str().map(str::to_string))
                .unwrap_or_default(),
        }
    }

    pub fn archived(&self) -> bool {
        self.archived
    }

    pub fn properties(&self) -> &PropertiesCollection {
        &self.properties
    }

    /// The response this state was built from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub(crate) fn path(&self) -> String {
        format!("{}/{}", self.kind.endpoint(), self.id)
    }
}

/// Handle on a cached entity.
///
/// Cloning is cheap and every clone shares the cached cell. Writes go to the
/// server first; local state only changes when the response comes back.
#[derive(Clone)]
pub struct Entity {
    cell: EntityCell,
    ctx: Arc<ClientContext>,
}

impl Entity {
    pub(crate) fn new(cell: EntityCell, ctx: Arc<ClientContext>) -> Self {
        Self { cell, ctx }
    }

    pub(crate) fn context(&self) -> &Arc<ClientContext> {
        &self.ctx
    }

    pub fn id(&self) -> ObjectId {
        self.cell.read().id()
    }

    pub fn kind(&self) -> ObjectKind {
        self.cell.read().kind()
    }

    /// Runs `f` against the current state under a read lock.
    ///
    /// Do not call back into this entity from `f`.
    pub fn read<R>(&self, f: impl FnOnce(&EntityState) -> R) -> R {
        f(&self.cell.read())
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> EntityState {
        self.cell.read().clone()
    }

    /// True when both handles point at the same cached cell.
    pub fn same_as(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// PATCHes `{field: payload}` and refreshes from the response.
    ///
    /// On error the cached state is left exactly as it was.
    pub fn update(&self, field: &str, payload: Value) -> ClientResult<()> {
        let path = self.cell.read().path();
        let mut body = Map::new();
        body.insert(field.to_string(), payload);
        let response = self.ctx.transport.patch(&path, &Value::Object(body))?;
        self.absorb(response)
    }

    /// Re-reads the entity from the server.
    pub fn refresh(&self) -> ClientResult<()> {
        let path = self.cell.read().path();
        let response = self.ctx.transport.get(&path)?;
        self.absorb(response)
    }

    /// Writes a top-level field.
    ///
    /// `title` accepts a string or a rich-text array, `archived` a bool,
    /// `properties` an object. `icon` and `cover` are sent as given.
    pub fn set_field(&self, name: &str, value: Value) -> ClientResult<()> {
        if IMMUTABLE_FIELDS.contains(&name) {
            return Err(ModelError::Immutable {
                name: name.to_string(),
            }
            .into());
        }
        match name {
            "title" => self.set_title_field(value),
            "archived" => {
                require(name, &value, LocalType::Bool)?;
                self.update(name, value)
            }
            "properties" => {
                require(name, &value, LocalType::Object)?;
                self.update(name, value)
            }
            "icon" | "cover" => self.update(name, value),
            other => Err(ClientError::UnknownProperty(other.to_string())),
        }
    }

    fn set_title_field(&self, value: Value) -> ClientResult<()> {
        let page_body = {
            let state = self.cell.read();
            match state.kind() {
                ObjectKind::Database => None,
                ObjectKind::Page => {
                    let title = state
                        .properties()
                        .find_kind(PropertyKind::Title)
                        .ok_or_else(|| ClientError::UnknownProperty("title".to_string()))?;
                    Some(title.prepare_update(&value)?)
                }
            }
        };
        match page_body {
            Some(body) => self.update("properties", body),
            None => {
                if !matches!(LocalType::of(&value), LocalType::String | LocalType::Array) {
                    return Err(ModelError::Validation {
                        name: "title".to_string(),
                        expected: "string or array".to_string(),
                        actual: LocalType::of(&value),
                    }
                    .into());
                }
                self.update("title", rich_text::wrap(&value))
            }
        }
    }

    pub(crate) fn absorb(&self, response: Value) -> ClientResult<()> {
        let state = EntityState::from_json(&self.ctx.registry, response)?;
        let id = self.id();
        if state.id() != id {
            return Err(ClientError::UnexpectedResponse(format!(
                "response for {id} describes {}",
                state.id()
            )));
        }
        self.ctx.cache.refresh(&self.cell, state)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.cell.read();
        f.debug_struct("Entity")
            .field("id", &state.id())
            .field("kind", &state.kind())
            .finish()
    }
}

fn require(name: &str, value: &Value, expected: LocalType) -> ClientResult<()> {
    let actual = LocalType::of(value);
    if actual == expected {
        Ok(())
    } else {
        Err(ModelError::Validation {
            name: name.to_string(),
            expected: expected.to_string(),
            actual,
        }
        .into())
    }
}
