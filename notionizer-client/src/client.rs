//! Client facade.

use crate::cache::EntityCache;
use crate::config::ClientConfig;
use crate::database::Database;
use crate::entity::{Entity, EntityState};
use crate::error::{ClientError, ClientResult};
use crate::page::Page;
use crate::transport::{HttpTransport, Transport};
use notionizer_model::PropertyTypeRegistry;
use notionizer_types::{ObjectId, ObjectKind};
use serde_json::Value;
use std::sync::Arc;

/// State shared by the client and every entity handle.
pub(crate) struct ClientContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) registry: Arc<PropertyTypeRegistry>,
    pub(crate) cache: EntityCache,
    pub(crate) config: ClientConfig,
}

impl ClientContext {
    /// Builds state from `raw` and registers or refreshes it in the cache.
    pub(crate) fn absorb(self: &Arc<Self>, raw: Value) -> ClientResult<Entity> {
        let state = EntityState::from_json(&self.registry, raw)?;
        let cell = self.cache.store(state)?;
        Ok(Entity::new(cell, Arc::clone(self)))
    }

    /// GETs `kind`/`id` and absorbs the response.
    pub(crate) fn fetch(self: &Arc<Self>, kind: ObjectKind, id: ObjectId) -> ClientResult<Entity> {
        let response = self.transport.get(&format!("{}/{id}", kind.endpoint()))?;
        let state = EntityState::from_json(&self.registry, response)?;
        if state.id() != id {
            return Err(ClientError::UnexpectedResponse(format!(
                "response for {id} describes {}",
                state.id()
            )));
        }
        let entity = Entity::new(self.cache.store(state)?, Arc::clone(self));
        expect_kind(&entity, kind)?;
        Ok(entity)
    }

    /// The cached handle for `id`, fetching it on a miss.
    pub(crate) fn lookup(self: &Arc<Self>, kind: ObjectKind, id: ObjectId) -> ClientResult<Entity> {
        match self.cache.get(&id) {
            Some(cell) => {
                let entity = Entity::new(cell, Arc::clone(self));
                expect_kind(&entity, kind)?;
                Ok(entity)
            }
            None => self.fetch(kind, id),
        }
    }
}

fn expect_kind(entity: &Entity, expected: ObjectKind) -> ClientResult<()> {
    let found = entity.kind();
    if found == expected {
        Ok(())
    } else {
        Err(ClientError::WrongKind { expected, found })
    }
}

/// Entry point: owns the transport, the property registry and the identity
/// cache.
///
/// ```no_run
/// use notionizer_client::{ClientConfig, NotionClient};
/// use notionizer_types::ObjectId;
///
/// # fn main() -> notionizer_client::ClientResult<()> {
/// let client = NotionClient::from_token("secret_...", ClientConfig::from_env()?)?;
/// let id = ObjectId::parse("a8aec43384f447ed84390e8e42c2e089")?;
/// let db = client.get_database(id)?;
/// for page in db.query_expr("Done == False")? {
///     println!("{}", page?.title());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NotionClient {
    ctx: Arc<ClientContext>,
}

impl NotionClient {
    /// Uses `transport` with the default configuration.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self::with_registry(transport, config, Arc::new(PropertyTypeRegistry::standard()))
    }

    /// Uses a custom property registry.
    pub fn with_registry(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        registry: Arc<PropertyTypeRegistry>,
    ) -> Self {
        Self {
            ctx: Arc::new(ClientContext {
                transport,
                registry,
                cache: EntityCache::new(),
                config,
            }),
        }
    }

    /// HTTP client authenticated with an integration token.
    pub fn from_token(token: &str, config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(token, &config)?;
        Ok(Self::with_config(Arc::new(transport), config))
    }

    /// Fetches a database. A cached handle for the id is refreshed in place.
    pub fn get_database(&self, id: ObjectId) -> ClientResult<Database> {
        self.ctx.fetch(ObjectKind::Database, id).map(Database::from_entity)
    }

    /// Fetches a page. A cached handle for the id is refreshed in place.
    pub fn get_page(&self, id: ObjectId) -> ClientResult<Page> {
        self.ctx.fetch(ObjectKind::Page, id).map(Page::from_entity)
    }

    /// The cached database, fetched only on a miss.
    pub fn database(&self, id: ObjectId) -> ClientResult<Database> {
        self.ctx.lookup(ObjectKind::Database, id).map(Database::from_entity)
    }

    /// The cached page, fetched only on a miss.
    pub fn page(&self, id: ObjectId) -> ClientResult<Page> {
        self.ctx.lookup(ObjectKind::Page, id).map(Page::from_entity)
    }

    /// Registers a database from JSON already in hand.
    pub fn database_from_json(&self, raw: Value) -> ClientResult<Database> {
        let entity = self.ctx.absorb(raw)?;
        expect_kind(&entity, ObjectKind::Database)?;
        Ok(Database::from_entity(entity))
    }

    /// Registers a page from JSON already in hand.
    pub fn page_from_json(&self, raw: Value) -> ClientResult<Page> {
        let entity = self.ctx.absorb(raw)?;
        expect_kind(&entity, ObjectKind::Page)?;
        Ok(Page::from_entity(entity))
    }

    /// The handle cached for `id`, without any request.
    pub fn cached(&self, id: &ObjectId) -> Option<Entity> {
        self.ctx
            .cache
            .get(id)
            .map(|cell| Entity::new(cell, Arc::clone(&self.ctx)))
    }

    pub fn cache(&self) -> &EntityCache {
        &self.ctx.cache
    }

    pub fn registry(&self) -> &PropertyTypeRegistry {
        &self.ctx.registry
    }

    pub fn config(&self) -> &ClientConfig {
        &self.ctx.config
    }
}
