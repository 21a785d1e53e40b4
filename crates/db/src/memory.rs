use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Entity, EntityId, StorageError, StorageResult, Store};

struct Table<E> {
    next_id: EntityId,
    rows: BTreeMap<EntityId, E>,
}

/// In-memory implementation of the storage collaborator.
///
/// Ids start at 1 and are never reused, even after a delete. Every operation
/// takes the table lock once, so a save, delete or `update_where` is atomic.
pub struct MemoryStore<E> {
    table: RwLock<Table<E>>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MemoryStore<E> {
    /// Creates a new empty memory store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<E: Entity> Store<E> for MemoryStore<E> {
    async fn save(&self, mut entity: E) -> StorageResult<E> {
        let mut table = self.table.write().await;

        match entity.id() {
            Some(id) => match table.rows.get_mut(&id) {
                Some(row) => *row = entity.clone(),
                None => return Err(StorageError::Missing(id)),
            },
            None => {
                let id = table.next_id;
                table.next_id = id.checked_add(1).ok_or(StorageError::IdsExhausted)?;
                entity.assign_id(id);
                table.rows.insert(id, entity.clone());
            }
        }

        tracing::debug!(id = ?entity.id(), "row saved");
        Ok(entity)
    }

    async fn find_by_id(&self, id: EntityId) -> StorageResult<Option<E>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> StorageResult<Vec<E>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn delete(&self, id: EntityId) -> StorageResult<bool> {
        let removed = self.table.write().await.rows.remove(&id).is_some();
        tracing::debug!(id, removed, "row deleted");
        Ok(removed)
    }

    async fn update_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
        edit: &(dyn for<'a> Fn(&'a mut E) + Send + Sync),
    ) -> StorageResult<usize> {
        let mut table = self.table.write().await;

        let mut edited = 0;
        for row in table.rows.values_mut() {
            if predicate(row) {
                edit(row);
                edited += 1;
            }
        }

        tracing::debug!(edited, "rows edited in place");
        Ok(edited)
    }
}
