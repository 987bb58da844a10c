//! Port for audited entity persistence.
//!
//! The [`Repository`] trait is the single generic contract every storage
//! backend implements. Behaviour that depends on audit tracking (stamping,
//! soft deletion, optimistic concurrency) is driven by the entity type's
//! [`crate::domain::Capabilities`], so one implementation serves every
//! entity shape.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{PagedResult, QueryConfig, QueryConfigError, Sortable};

use super::{PrincipalError, define_port_error};

/// Failure categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// The key does not identify an eligible entity.
    NotFound,
    /// The request violates a contract precondition.
    InvalidArgument,
    /// The write collides with existing state.
    Conflict,
    /// The backing store or a collaborator failed.
    DependencyFailure,
}

define_port_error! {
    /// Errors raised by repository backends.
    pub enum RepositoryError classified by RepositoryErrorKind {
        /// No active entity (or, for restore, no entity at all) matches the key.
        NotFound { key: String } => NotFound, "no entity matches key {key}",
        /// The request breaks a precondition such as key assignment rules.
        InvalidArgument { message: String } => InvalidArgument,
            "invalid repository request: {message}",
        /// A duplicate key or a stale concurrency token.
        Conflict { message: String } => Conflict, "repository conflict: {message}",
        /// Storage, key issuance or principal lookup failed.
        Dependency { message: String } => DependencyFailure,
            "repository dependency failed: {message}",
    }
}

impl RepositoryError {
    /// [`RepositoryError::NotFound`] rendered from a typed key.
    pub fn missing_key<K: Debug>(key: &K) -> Self {
        Self::not_found(format!("{key:?}"))
    }
}

impl From<QueryConfigError> for RepositoryError {
    fn from(error: QueryConfigError) -> Self {
        Self::invalid_argument(error.to_string())
    }
}

impl From<PrincipalError> for RepositoryError {
    fn from(error: PrincipalError) -> Self {
        Self::dependency(error.to_string())
    }
}

/// Generic persistence contract for audited entities.
///
/// # Visibility
///
/// Soft-deleted rows are invisible to [`Repository::get_by_id`],
/// [`Repository::get_all`], [`Repository::update`] and
/// [`Repository::delete`]. [`Repository::get_by_id_including_deleted`] and
/// [`Repository::restore`] are the only ways to reach them.
///
/// # Audit fields
///
/// Backends own every audit field. Values supplied by callers are ignored:
/// `add` stamps creation, `update` stamps modification and preserves the
/// stored creation record, `delete` stamps deletion and `restore` clears it.
///
/// # Atomicity
///
/// Each write is a single atomic step. On error nothing observable changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Sortable,
{
    /// Fetch an active entity by key.
    ///
    /// Returns `None` when no row matches or the row is soft-deleted.
    async fn get_by_id(&self, id: E::Key) -> Result<Option<E>, RepositoryError>;

    /// Fetch an entity by key, soft-deleted or not.
    async fn get_by_id_including_deleted(&self, id: E::Key)
    -> Result<Option<E>, RepositoryError>;

    /// List active entities, optionally sorted and paged.
    ///
    /// `total_count` on the result counts every active entity, not just the
    /// returned page.
    async fn get_all(
        &self,
        query: &QueryConfig<E::SortField>,
    ) -> Result<PagedResult<E>, RepositoryError>;

    /// Persist a transient entity and return it as stored.
    ///
    /// Generated keys must be left at the sentinel; caller-assigned keys must
    /// be set and unused.
    async fn add(&self, entity: E) -> Result<E, RepositoryError>;

    /// Replace an active entity and return it as stored.
    async fn update(&self, entity: E) -> Result<E, RepositoryError>;

    /// Replace an active entity only if its modification instant still
    /// equals `expected_modified_at`.
    ///
    /// `None` expects an entity that has never been updated. Entity types
    /// without modification tracking are rejected as invalid arguments.
    async fn update_if_unmodified(
        &self,
        entity: E,
        expected_modified_at: Option<DateTime<Utc>>,
    ) -> Result<E, RepositoryError>;

    /// Delete an active entity.
    ///
    /// Soft-deletes entity types that support it. Returns `false` when no
    /// active entity matches.
    async fn delete(&self, id: E::Key) -> Result<bool, RepositoryError>;

    /// Clear the deletion record of a soft-deleted entity.
    ///
    /// Returns `false` when the entity is missing, not deleted or its type
    /// has no soft deletion.
    async fn restore(&self, id: E::Key) -> Result<bool, RepositoryError>;

    /// Fetch an active entity, treating absence as [`RepositoryError::NotFound`].
    async fn require_by_id(&self, id: E::Key) -> Result<E, RepositoryError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::missing_key(&id))
    }
}

/// Fixture implementation for tests where persistence is not under test.
///
/// Lookups find nothing, listings are empty and `add` echoes its input
/// without storing it.
#[derive(Debug)]
pub struct FixtureRepository<E>(PhantomData<fn() -> E>);

impl<E> Default for FixtureRepository<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<E> Repository<E> for FixtureRepository<E>
where
    E: Sortable,
{
    async fn get_by_id(&self, _id: E::Key) -> Result<Option<E>, RepositoryError> {
        Ok(None)
    }

    async fn get_by_id_including_deleted(
        &self,
        _id: E::Key,
    ) -> Result<Option<E>, RepositoryError> {
        Ok(None)
    }

    async fn get_all(
        &self,
        query: &QueryConfig<E::SortField>,
    ) -> Result<PagedResult<E>, RepositoryError> {
        Ok(PagedResult::empty(query.page()))
    }

    async fn add(&self, entity: E) -> Result<E, RepositoryError> {
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, RepositoryError> {
        Err(RepositoryError::missing_key(&entity.id()))
    }

    async fn update_if_unmodified(
        &self,
        entity: E,
        _expected_modified_at: Option<DateTime<Utc>>,
    ) -> Result<E, RepositoryError> {
        Err(RepositoryError::missing_key(&entity.id()))
    }

    async fn delete(&self, _id: E::Key) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    async fn restore(&self, _id: E::Key) -> Result<bool, RepositoryError> {
        Ok(false)
    }
}
