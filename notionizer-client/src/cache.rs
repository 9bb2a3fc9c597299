//! Identity cache: one shared cell per remote id.

use crate::entity::EntityState;
use crate::error::{ClientError, ClientResult};
use notionizer_types::ObjectId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The canonical local state of one remote entity.
///
/// Every handle for the same id holds a clone of the same `Arc`, so a
/// refresh written through the lock is seen by all of them.
pub type EntityCell = Arc<RwLock<EntityState>>;

/// Maps ids to their canonical cells.
///
/// Lock order is always the map first, then a cell. Nothing here calls the
/// transport, so no lock is held across a request.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: Mutex<HashMap<ObjectId, EntityCell>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `state`, or refreshes the existing cell for its id in place.
    ///
    /// A refresh that changes the object kind is rejected and leaves the
    /// cached state untouched.
    pub fn store(&self, state: EntityState) -> ClientResult<EntityCell> {
        let mut entries = self.entries.lock();
        match entries.get(&state.id()) {
            Some(cell) => {
                let cell = Arc::clone(cell);
                overwrite(&cell, state)?;
                Ok(cell)
            }
            None => {
                let id = state.id();
                debug!(%id, kind = %state.kind(), "caching entity");
                let cell = Arc::new(RwLock::new(state));
                entries.insert(id, Arc::clone(&cell));
                Ok(cell)
            }
        }
    }

    /// Writes `state` into `cell`, which a handle already holds.
    ///
    /// If the id was evicted in the meantime the cell is registered again; if
    /// another cell took its place that one is refreshed as well.
    pub(crate) fn refresh(&self, cell: &EntityCell, state: EntityState) -> ClientResult<()> {
        let mut entries = self.entries.lock();
        let id = state.id();
        match entries.get(&id) {
            Some(current) if !Arc::ptr_eq(current, cell) => {
                let current = Arc::clone(current);
                overwrite(&current, state.clone())?;
                overwrite(cell, state)
            }
            Some(_) => overwrite(cell, state),
            None => {
                overwrite(cell, state)?;
                entries.insert(id, Arc::clone(cell));
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &ObjectId) -> Option<EntityCell> {
        self.entries.lock().get(id).cloned()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.entries.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops the cache's reference. Live handles keep their cell; the next
    /// lookup for the id fetches a new one.
    pub fn evict(&self, id: &ObjectId) -> bool {
        self.entries.lock().remove(id).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

fn overwrite(cell: &EntityCell, state: EntityState) -> ClientResult<()> {
    let mut current = cell.write();
    if current.kind() != state.kind() {
        return Err(ClientError::KindMismatch {
            id: current.id(),
            cached: current.kind(),
            received: state.kind(),
        });
    }
    debug!(id = %current.id(), kind = %current.kind(), "refreshing entity");
    *current = state;
    Ok(())
}
