//! Generic CRUD contract shared by every catalog resource.
//!
//! A [`CollectionService`] owns no data: it applies a payload to a
//! [`Resource`], gates the write on validation and the registered
//! [`Constraint`]s, and hands persistence to the storage collaborator.

pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use catalog_db::{Entity, EntityId, StorageError, StorageResult, Store};
use catalog_http::AppError;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

/// One failed field rule, reported to clients as `{"field", "error"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub error: &'static str,
}

impl Violation {
    pub const fn new(field: &'static str, error: &'static str) -> Self {
        Self { field, error }
    }

    pub const fn required(field: &'static str) -> Self {
        Self::new(field, "required")
    }

    pub const fn blank(field: &'static str) -> Self {
        Self::new(field, "blank")
    }
}

/// Check a required free-text field: present and not only whitespace.
pub fn require_text(field: &'static str, value: Option<&str>) -> Option<Violation> {
    match value {
        None => Some(Violation::required(field)),
        Some(text) if text.trim().is_empty() => Some(Violation::blank(field)),
        Some(_) => None,
    }
}

/// A domain entity exposed as a collection.
pub trait Resource: Entity + Default {
    /// Singular name used in messages and logs
    const NAME: &'static str;

    /// Client-supplied field values; every field optional so the same type
    /// serves create, replace and partial update
    type Payload: DeserializeOwned + Send + 'static;

    /// Wire representation returned to clients
    type Representation: Serialize + Send + 'static;

    /// Copy the supplied fields onto the entity. Returns violations for values
    /// that cannot be stored at all (e.g. an unparseable reference).
    fn apply(&mut self, payload: Self::Payload) -> Vec<Violation>;

    /// Field rules the entity must satisfy before it is written.
    fn validate(&self) -> Vec<Violation>;

    fn represent(&self) -> Self::Representation;
}

/// A rule that needs the storage collaborator, such as a reference check.
#[async_trait]
pub trait Constraint<R>: Send + Sync {
    async fn check(&self, entity: &R) -> StorageResult<Vec<Violation>>;
}

/// Follow-up work after an entity has been deleted.
#[async_trait]
pub trait DeleteHook: Send + Sync {
    async fn after_delete(&self, id: EntityId) -> StorageResult<()>;
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: EntityId },

    #[error("invalid {resource}")]
    Validation {
        resource: &'static str,
        violations: Vec<Violation>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<CollectionError> for AppError {
    fn from(error: CollectionError) -> Self {
        match error {
            CollectionError::NotFound { resource, id } => {
                AppError::not_found(format!("{resource} {id} not found"))
            }
            CollectionError::Validation {
                resource,
                violations,
            } => {
                let details = violations
                    .iter()
                    .map(|violation| serde_json::json!(violation))
                    .collect();
                AppError::validation(details, format!("invalid {resource} payload"))
            }
            CollectionError::Storage(err) => {
                AppError::Internal(anyhow::Error::new(err).context("storage collaborator failed"))
            }
        }
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Lock shared by services whose writes must not interleave, such as a
/// reference check and the delete of the referenced entity.
pub type WriteLock = Arc<Mutex<()>>;

/// CRUD operations for one resource type.
pub struct CollectionService<R: Resource> {
    store: Arc<dyn Store<R>>,
    constraints: Vec<Arc<dyn Constraint<R>>>,
    delete_hooks: Vec<Arc<dyn DeleteHook>>,
    write_lock: Option<WriteLock>,
}

impl<R: Resource> CollectionService<R> {
    pub fn new(store: Arc<dyn Store<R>>) -> Self {
        Self {
            store,
            constraints: Vec::new(),
            delete_hooks: Vec::new(),
            write_lock: None,
        }
    }

    /// Hold `lock` across every create, update and delete, from the
    /// constraint checks (or the delete hooks) through to the store write.
    pub fn with_write_lock(mut self, lock: WriteLock) -> Self {
        self.write_lock = Some(lock);
        self
    }

    pub fn with_constraint(mut self, constraint: Arc<dyn Constraint<R>>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_delete_hook(mut self, hook: Arc<dyn DeleteHook>) -> Self {
        self.delete_hooks.push(hook);
        self
    }

    pub async fn list(&self) -> CollectionResult<Vec<R>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: EntityId) -> CollectionResult<R> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CollectionError::NotFound {
                resource: R::NAME,
                id,
            })
    }

    pub async fn create(&self, payload: R::Payload) -> CollectionResult<R> {
        let _guard = self.lock_writes().await;
        let mut entity = R::default();
        let violations = entity.apply(payload);
        self.check(&entity, violations).await?;

        let saved = self.store.save(entity).await?;
        tracing::info!(resource = R::NAME, id = ?saved.id(), "created");
        Ok(saved)
    }

    /// Merge the supplied fields into the stored entity. The id is kept.
    pub async fn update(&self, id: EntityId, payload: R::Payload) -> CollectionResult<R> {
        let _guard = self.lock_writes().await;
        let mut entity = self.get(id).await?;
        let violations = entity.apply(payload);
        self.check(&entity, violations).await?;

        let saved = match self.store.save(entity).await {
            Ok(saved) => saved,
            // deleted while the write was being checked
            Err(StorageError::Missing(_)) => {
                return Err(CollectionError::NotFound {
                    resource: R::NAME,
                    id,
                })
            }
            Err(err) => return Err(err.into()),
        };
        tracing::info!(resource = R::NAME, id, "updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: EntityId) -> CollectionResult<()> {
        let _guard = self.lock_writes().await;
        if !self.store.delete(id).await? {
            return Err(CollectionError::NotFound {
                resource: R::NAME,
                id,
            });
        }

        for hook in &self.delete_hooks {
            hook.after_delete(id).await?;
        }

        tracing::info!(resource = R::NAME, id, "deleted");
        Ok(())
    }

    async fn lock_writes(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn check(&self, entity: &R, mut violations: Vec<Violation>) -> CollectionResult<()> {
        violations.extend(entity.validate());
        for constraint in &self.constraints {
            violations.extend(constraint.check(entity).await?);
        }

        if violations.is_empty() {
            return Ok(());
        }

        tracing::debug!(resource = R::NAME, ?violations, "rejected write");
        Err(CollectionError::Validation {
            resource: R::NAME,
            violations,
        })
    }
}
