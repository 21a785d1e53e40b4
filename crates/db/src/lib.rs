//! Storage collaborator for catalog entities.
//!
//! The catalog core needs five operations from persistence: save, find by id,
//! find all, delete and an in-place edit of matching rows. [`Store`] captures that contract and
//! [`MemoryStore`] provides the process-local implementation the service runs
//! on.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

/// Identifier assigned by the store on first save.
pub type EntityId = u64;

/// A persisted domain object with a store-assigned identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// `None` until the entity has been saved once.
    fn id(&self) -> Option<EntityId>;

    /// Called by the store exactly once, when the entity is first saved.
    fn assign_id(&mut self, id: EntityId);
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("identifier space exhausted")]
    IdsExhausted,

    /// A save carried an id whose row no longer exists.
    #[error("no row with id {0}")]
    Missing(EntityId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence contract consumed by the collection service.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    /// Insert an entity without an id (assigning one) or replace the stored
    /// entity with the same id. Returns the stored value.
    ///
    /// Never re-inserts a deleted row: an id with no stored entity is
    /// [`StorageError::Missing`].
    async fn save(&self, entity: E) -> StorageResult<E>;

    async fn find_by_id(&self, id: EntityId) -> StorageResult<Option<E>>;

    /// Every stored entity in ascending id order.
    async fn find_all(&self) -> StorageResult<Vec<E>>;

    /// Returns `false` when no entity had that id.
    async fn delete(&self, id: EntityId) -> StorageResult<bool>;

    /// Apply `edit` to every stored entity matching `predicate` as one atomic
    /// step. Returns the number of rows edited.
    async fn update_where(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
        edit: &(dyn for<'a> Fn(&'a mut E) + Send + Sync),
    ) -> StorageResult<usize>;
}
