//! Driving-side CRUD service.
//!
//! [`CrudService`] is the surface a controller layer calls. It turns raw list
//! parameters into a validated [`QueryConfig`], turns "nothing matched"
//! outcomes into [`ErrorCode::NotFound`](crate::domain::ErrorCode::NotFound)
//! errors and converts every [`RepositoryError`] into the transport-agnostic
//! [`Error`].

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{Repository, RepositoryError};
use crate::domain::{Error, PagedResult, QueryConfig, QueryConfigError, Sortable};
use crate::settings::RepositorySettings;

/// Raw listing parameters as a controller receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams<F> {
    /// Field to sort by; `None` keeps backend order.
    pub sort_by: Option<F>,
    /// Reverse the sort.
    pub sort_descending: bool,
    /// One-based page number.
    pub page_number: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
}

impl<F> Default for ListParams<F> {
    fn default() -> Self {
        Self {
            sort_by: None,
            sort_descending: false,
            page_number: None,
            page_size: None,
        }
    }
}

/// CRUD operations for one entity type over a [`Repository`].
pub struct CrudService<E, R> {
    repository: Arc<R>,
    max_page_size: Option<u32>,
    entity: PhantomData<fn() -> E>,
}

impl<E, R> Clone for CrudService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            max_page_size: self.max_page_size,
            entity: PhantomData,
        }
    }
}

impl<E, R> CrudService<E, R> {
    /// Service without a page size ceiling.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            max_page_size: None,
            entity: PhantomData,
        }
    }

    /// Service honouring the configured page size ceiling.
    pub fn with_settings(repository: Arc<R>, settings: &RepositorySettings) -> Self {
        Self {
            max_page_size: settings.max_page_size,
            ..Self::new(repository)
        }
    }

    /// Reject list requests whose page size exceeds `max`.
    #[must_use]
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = Some(max);
        self
    }
}

impl<E, R> CrudService<E, R>
where
    E: Sortable,
    R: Repository<E>,
{
    /// Fetch one active entity.
    pub async fn get(&self, id: E::Key) -> Result<E, Error> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| Self::missing(&id))
    }

    /// List active entities.
    ///
    /// # Examples
    /// ```
    /// # tokio_test_block_on(async {
    /// use std::sync::Arc;
    ///
    /// use crud_kit::domain::ports::FixtureRepository;
    /// use crud_kit::domain::{CrudService, ErrorCode, ListParams};
    /// use crud_kit::test_support::Widget;
    ///
    /// let service = CrudService::new(Arc::new(FixtureRepository::<Widget>::default()))
    ///     .with_max_page_size(50);
    /// let params = ListParams {
    ///     page_size: Some(500),
    ///     ..ListParams::default()
    /// };
    ///
    /// let error = service.list(params).await.expect_err("page too large");
    /// assert_eq!(error.code(), ErrorCode::InvalidRequest);
    /// # });
    /// # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
    /// #     futures::executor::block_on(future)
    /// # }
    /// ```
    pub async fn list(&self, params: ListParams<E::SortField>) -> Result<PagedResult<E>, Error> {
        let query = QueryConfig::build(
            params.sort_by,
            params.sort_descending,
            params.page_number,
            params.page_size,
        )
        .map_err(Self::invalid_query)?;
        if let Some(max) = self.max_page_size {
            query
                .ensure_page_size_at_most(max)
                .map_err(Self::invalid_query)?;
        }
        Ok(self.repository.get_all(&query).await?)
    }

    /// Persist a new entity.
    pub async fn create(&self, entity: E) -> Result<E, Error> {
        Ok(self.repository.add(entity).await?)
    }

    /// Replace the entity addressed by `id`.
    pub async fn update(&self, id: E::Key, entity: E) -> Result<E, Error> {
        Self::ensure_matching_key(id, &entity)?;
        Ok(self.repository.update(entity).await?)
    }

    /// Replace the entity addressed by `id` if nobody modified it since
    /// `expected_modified_at`.
    pub async fn update_if_unmodified(
        &self,
        id: E::Key,
        entity: E,
        expected_modified_at: Option<DateTime<Utc>>,
    ) -> Result<E, Error> {
        Self::ensure_matching_key(id, &entity)?;
        Ok(self
            .repository
            .update_if_unmodified(entity, expected_modified_at)
            .await?)
    }

    /// Delete the entity addressed by `id`.
    pub async fn delete(&self, id: E::Key) -> Result<(), Error> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(Self::missing(&id))
        }
    }

    /// Undo a soft delete.
    pub async fn restore(&self, id: E::Key) -> Result<(), Error> {
        if self.repository.restore(id).await? {
            Ok(())
        } else {
            Err(Self::missing(&id))
        }
    }

    fn ensure_matching_key(id: E::Key, entity: &E) -> Result<(), Error> {
        if entity.id() == id {
            return Ok(());
        }
        warn!(path_key = ?id, body_key = ?entity.id(), "update rejected: key mismatch");
        Err(Error::invalid_request("entity key does not match the addressed key")
            .with_details(json!({
                "addressedKey": format!("{id:?}"),
                "entityKey": format!("{:?}", entity.id()),
            })))
    }

    fn missing<K: Debug>(id: &K) -> Error {
        Error::from(RepositoryError::missing_key(id))
    }

    fn invalid_query(error: QueryConfigError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({ "code": "invalid_query" }))
    }
}

#[cfg(test)]
#[path = "crud_service_tests.rs"]
mod tests;
