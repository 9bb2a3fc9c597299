//! Database handles: schema access, queries and row creation.

use crate::entity::Entity;
use crate::error::{ClientError, ClientResult};
use crate::page::Page;
use crate::pagination::QueryRows;
use indexmap::IndexMap;
use notionizer_model::{
    ModelError, PropertiesCollection, PropertyKind, PropertyObject, PropertyValue,
};
use notionizer_query::{FilterTree, QueryCompiler, SortSpec};
use notionizer_types::ObjectKind;
use serde_json::{Map, Value, json};
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

/// A database: a titled collection of pages sharing one property schema.
#[derive(Debug, Clone)]
pub struct Database(Entity);

impl Database {
    pub(crate) fn from_entity(entity: Entity) -> Self {
        Self(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn title(&self) -> String {
        self.read(|state| state.title())
    }

    pub fn set_title(&self, title: &str) -> ClientResult<()> {
        self.set_field("title", Value::String(title.to_string()))
    }

    /// A copy of the column definitions.
    pub fn schema(&self) -> PropertiesCollection {
        self.read(|state| state.properties().clone())
    }

    /// Column names in server order.
    pub fn column_names(&self) -> Vec<String> {
        self.read(|state| state.properties().keys().map(str::to_string).collect())
    }

    /// Starts a query. `page_size` falls back to the configured default.
    pub fn query(
        &self,
        filter: Option<&FilterTree>,
        sorts: Option<&SortSpec>,
        page_size: Option<u32>,
    ) -> ClientResult<QueryRows> {
        let mut body = Map::new();
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            body.insert("filter".to_string(), filter.to_json());
        }
        if let Some(sorts) = sorts.filter(|s| !s.is_empty()) {
            body.insert("sorts".to_string(), sorts.to_json());
        }
        if let Some(size) = page_size.or(self.context().config.page_size) {
            body.insert("page_size".to_string(), json!(size));
        }
        let path = format!("databases/{}/query", self.id());
        QueryRows::start(Arc::clone(self.context()), path, body)
    }

    /// Compiles `expression` against the current schema, then queries.
    pub fn query_expr(&self, expression: &str) -> ClientResult<QueryRows> {
        let filter = self.compile(expression)?;
        self.query(Some(&filter), None, None)
    }

    /// Compiles `expression` against the current schema without querying.
    pub fn compile(&self, expression: &str) -> ClientResult<FilterTree> {
        let filter =
            self.read(|state| QueryCompiler::new(state.properties()).compile(expression))?;
        Ok(filter)
    }

    /// Creates a row.
    ///
    /// `properties` maps column names to local values. Every name must be a
    /// column and every value must suit the column's type; nothing is sent
    /// otherwise.
    pub fn create_page(&self, properties: &Value) -> ClientResult<Page> {
        let values = properties.as_object().ok_or_else(|| ModelError::Malformed {
            name: "properties".to_string(),
            reason: "expected an object".to_string(),
        })?;

        let payload = self.read(|state| {
            let schema = state.properties();
            let mut payload = Map::new();
            for (name, value) in values {
                let column = schema
                    .get(name)
                    .ok_or_else(|| ClientError::UnknownProperty(name.clone()))?;
                payload.insert(name.clone(), column.payload_for(value)?);
            }
            Ok::<_, ClientError>(payload)
        })?;

        let id = self.id();
        debug!(database = %id, columns = payload.len(), "creating page");
        let body = json!({
            "parent": { "database_id": id.to_string() },
            "properties": Value::Object(payload),
        });
        let response = self.context().transport.post("pages", &body)?;
        let entity = self.context().absorb(response)?;
        Page::try_from(entity)
    }

    /// Renames a column.
    pub fn rename_property(&self, name: &str, new_name: &str) -> ClientResult<()> {
        let body = self.with_column(name, |column| column.prepare_rename(new_name))?;
        self.update("properties", body)
    }

    /// Changes a column's type.
    pub fn change_property_type(&self, name: &str, kind: PropertyKind) -> ClientResult<()> {
        let body = self.with_column(name, |column| column.prepare_retype(kind))?;
        self.update("properties", body)
    }

    fn with_column<R>(
        &self,
        name: &str,
        f: impl FnOnce(&PropertyObject) -> Result<R, ModelError>,
    ) -> ClientResult<R> {
        self.read(|state| {
            let column = state
                .properties()
                .get(name)
                .ok_or_else(|| ClientError::UnknownProperty(name.to_string()))?;
            Ok(f(column)?)
        })
    }

    /// Flattens rows into name → value maps.
    ///
    /// `columns` selects and orders the columns; empty means every column.
    pub fn get_as_dictionaries(
        &self,
        rows: &[Page],
        columns: &[&str],
    ) -> ClientResult<Vec<IndexMap<String, PropertyValue>>> {
        let columns = self.resolve_columns(columns)?;
        Ok(rows
            .iter()
            .map(|row| {
                let mut values = row.property_values();
                columns
                    .iter()
                    .map(|name| {
                        let value = values.swap_remove(name).unwrap_or(PropertyValue::Null);
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect())
    }

    /// Flattens rows into value lists, optionally led by a header row of
    /// column names.
    pub fn get_as_tuples(
        &self,
        rows: &[Page],
        columns: &[&str],
        header: bool,
    ) -> ClientResult<Vec<Vec<PropertyValue>>> {
        let columns = self.resolve_columns(columns)?;
        let mut table = Vec::with_capacity(rows.len() + usize::from(header));
        if header {
            table.push(columns.iter().map(|c| PropertyValue::Text(c.clone())).collect());
        }
        for row in rows {
            let mut values = row.property_values();
            table.push(
                columns
                    .iter()
                    .map(|name| values.swap_remove(name).unwrap_or(PropertyValue::Null))
                    .collect(),
            );
        }
        Ok(table)
    }

    fn resolve_columns(&self, columns: &[&str]) -> ClientResult<Vec<String>> {
        self.read(|state| {
            let schema = state.properties();
            if columns.is_empty() {
                return Ok(schema.keys().map(str::to_string).collect());
            }
            columns
                .iter()
                .map(|name| {
                    if schema.contains(name) {
                        Ok((*name).to_string())
                    } else {
                        Err(ClientError::UnknownProperty((*name).to_string()))
                    }
                })
                .collect()
        })
    }
}

impl Deref for Database {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.0
    }
}

impl TryFrom<Entity> for Database {
    type Error = ClientError;

    fn try_from(entity: Entity) -> ClientResult<Self> {
        match entity.kind() {
            ObjectKind::Database => Ok(Self(entity)),
            found => Err(ClientError::WrongKind {
                expected: ObjectKind::Database,
                found,
            }),
        }
    }
}
