//! `Repository` implementation over a locked ordered map.
//!
//! Every operation takes the store lock once and performs validation, audit
//! stamping and storage under it, so concurrent callers observe each write
//! as a single step. Rows stay in key order, which makes unsorted listings
//! deterministic.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::ports::{Repository, RepositoryError};
use crate::domain::{
    Auditor, Entity, EntityKey, KeyAssignment, PagedResult, QueryConfig, Sortable,
};
use crate::settings::{RepositorySettings, UntrackedDelete};

struct Store<E: Entity> {
    rows: BTreeMap<E::Key, E>,
    last_issued: Option<E::Key>,
}

enum Precondition {
    Unconditional,
    UnmodifiedSince(Option<DateTime<Utc>>),
}

/// Thread-safe in-memory implementation of the [`Repository`] port.
///
/// Soft-deleted rows stay in the map with their deletion record set and are
/// filtered from every default read.
///
/// # Examples
/// ```
/// # futures::executor::block_on(async {
/// use std::sync::Arc;
///
/// use crud_kit::domain::Creatable;
/// use crud_kit::domain::ports::Repository;
/// use crud_kit::outbound::memory::InMemoryRepository;
/// use crud_kit::test_support::{MutableClock, Widget, auditor, epoch};
/// use uuid::Uuid;
///
/// let clock = Arc::new(MutableClock::new(epoch()));
/// let repo = InMemoryRepository::new(auditor(Uuid::new_v4(), clock));
///
/// let widget = repo.add(Widget::new("Widget")).await?;
/// assert_eq!(widget.id, 1);
/// assert_eq!(widget.created_at(), Some(epoch()));
/// # Ok::<(), crud_kit::domain::ports::RepositoryError>(())
/// # }).expect("example runs");
/// ```
pub struct InMemoryRepository<E: Entity> {
    store: RwLock<Store<E>>,
    auditor: Auditor<E::Actor>,
    untracked_delete: UntrackedDelete,
}

impl<E: Entity> InMemoryRepository<E> {
    /// Empty repository that hard-deletes untracked entity types.
    pub fn new(auditor: Auditor<E::Actor>) -> Self {
        Self {
            store: RwLock::new(Store {
                rows: BTreeMap::new(),
                last_issued: None,
            }),
            auditor,
            untracked_delete: UntrackedDelete::default(),
        }
    }

    /// Empty repository following `settings`.
    pub fn with_settings(auditor: Auditor<E::Actor>, settings: &RepositorySettings) -> Self {
        Self {
            untracked_delete: settings.untracked_delete(),
            ..Self::new(auditor)
        }
    }

    /// Number of stored rows, soft-deleted ones included.
    pub fn stored_rows(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.rows.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store<E>>, RepositoryError> {
        self.store
            .read()
            .map_err(|_| RepositoryError::dependency("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store<E>>, RepositoryError> {
        self.store
            .write()
            .map_err(|_| RepositoryError::dependency("in-memory store lock poisoned"))
    }

    /// Key `entity` will be stored under, validated against the key type's
    /// assignment rule.
    fn next_key(store: &Store<E>, entity: &E) -> Result<E::Key, RepositoryError> {
        match E::Key::assignment() {
            KeyAssignment::Generated => {
                if !entity.is_transient() {
                    return Err(RepositoryError::invalid_argument(format!(
                        "key {:?} is already assigned; keys are issued on add",
                        entity.id()
                    )));
                }
                let highest = store.rows.keys().next_back().copied();
                let key = E::Key::generate(highest.max(store.last_issued))
                    .ok_or_else(|| RepositoryError::dependency("key space exhausted"))?;
                if store.rows.contains_key(&key) {
                    return Err(RepositoryError::dependency(format!(
                        "generated key {key:?} collides with a stored row"
                    )));
                }
                Ok(key)
            }
            KeyAssignment::CallerAssigned => {
                let key = entity.id();
                if key.is_unassigned() {
                    return Err(RepositoryError::invalid_argument(
                        "caller-assigned key must be set before add",
                    ));
                }
                if store.rows.contains_key(&key) {
                    return Err(RepositoryError::conflict(format!(
                        "key {key:?} is already in use"
                    )));
                }
                Ok(key)
            }
        }
    }

    fn replace(&self, entity: E, precondition: Precondition) -> Result<E, RepositoryError> {
        let capabilities = E::capabilities();
        let key = entity.id();
        let mut store = self.write()?;

        let stored = store
            .rows
            .get(&key)
            .filter(|row| !capabilities.is_deleted(row))
            .ok_or_else(|| RepositoryError::missing_key(&key))?;

        if let Precondition::UnmodifiedSince(expected) = precondition {
            let record = capabilities.modification(stored).ok_or_else(|| {
                RepositoryError::invalid_argument(
                    "entity type does not track modifications; conditional update unavailable",
                )
            })?;
            let actual = record.modified_at();
            if actual != expected {
                warn!(key = ?key, ?expected, ?actual, "conditional update rejected");
                return Err(RepositoryError::conflict(format!(
                    "entity {key:?} was modified at {actual:?}, expected {expected:?}"
                )));
            }
        }

        let mut entity = entity;
        self.auditor.prepare_update(stored, &mut entity)?;
        store.rows.insert(key, entity.clone());
        debug!(key = ?key, "entity updated");
        Ok(entity)
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Sortable,
{
    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError> {
        let capabilities = E::capabilities();
        let store = self.read()?;
        Ok(store
            .rows
            .get(&id)
            .filter(|row| !capabilities.is_deleted(row))
            .cloned())
    }

    async fn get_by_id_including_deleted(
        &self,
        id: E::Key,
    ) -> Result<Option<E>, RepositoryError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn get_all(
        &self,
        query: &QueryConfig<E::SortField>,
    ) -> Result<PagedResult<E>, RepositoryError> {
        let capabilities = E::capabilities();
        let active: Vec<E> = {
            let store = self.read()?;
            store
                .rows
                .values()
                .filter(|row| !capabilities.is_deleted(row))
                .cloned()
                .collect()
        };
        Ok(query.apply(active, |left, right, field| left.compare_by(right, *field)))
    }

    async fn add(&self, entity: E) -> Result<E, RepositoryError> {
        let mut store = self.write()?;
        let key = Self::next_key(&store, &entity)?;

        let mut entity = entity;
        self.auditor.prepare_insert(&mut entity)?;
        entity.set_id(key);

        if E::Key::assignment() == KeyAssignment::Generated {
            store.last_issued = Some(key);
        }
        store.rows.insert(key, entity.clone());
        debug!(key = ?key, "entity added");
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, RepositoryError> {
        self.replace(entity, Precondition::Unconditional)
    }

    async fn update_if_unmodified(
        &self,
        entity: E,
        expected_modified_at: Option<DateTime<Utc>>,
    ) -> Result<E, RepositoryError> {
        self.replace(entity, Precondition::UnmodifiedSince(expected_modified_at))
    }

    async fn delete(&self, id: E::Key) -> Result<bool, RepositoryError> {
        let capabilities = E::capabilities();
        let mut store = self.write()?;

        if capabilities.is_deletable() {
            let Some(row) = store.rows.get_mut(&id) else {
                return Ok(false);
            };
            let deleted = self.auditor.mark_deleted(row)?;
            if deleted {
                debug!(key = ?id, "entity soft-deleted");
            }
            return Ok(deleted);
        }

        if self.untracked_delete == UntrackedDelete::Reject {
            warn!(key = ?id, "delete rejected: entity type has no soft deletion");
            return Err(RepositoryError::invalid_argument(
                "entity type does not support soft deletion",
            ));
        }
        let removed = store.rows.remove(&id).is_some();
        if removed {
            debug!(key = ?id, "entity removed");
        }
        Ok(removed)
    }

    async fn restore(&self, id: E::Key) -> Result<bool, RepositoryError> {
        let mut store = self.write()?;
        let restored = store
            .rows
            .get_mut(&id)
            .is_some_and(|row| self.auditor.clear_deletion(row));
        if restored {
            debug!(key = ?id, "entity restored");
        }
        Ok(restored)
    }
}

#[cfg(test)]
#[path = "in_memory_repository_tests.rs"]
mod tests;
