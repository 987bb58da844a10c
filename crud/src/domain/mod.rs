//! Domain model: identity, audit capabilities, query contract and ports.
//!
//! Purpose: define the contract every repository backend and every caller
//! programs against, independent of storage and transport.
//!
//! Public surface:
//! - Identity: [`Entity`], [`EntityKey`], [`KeyAssignment`], [`NamedEntity`],
//!   [`ActorId`].
//! - Audit: [`CreationRecord`], [`ModificationRecord`], [`DeletionRecord`],
//!   [`AuditStamp`], the [`Creatable`]/[`Modifiable`]/[`Deletable`]
//!   capabilities, their composition [`Auditable`], the per-type
//!   [`Capabilities`] declaration and the [`Auditor`] that writes records.
//! - Query: [`Sortable`], [`Unsorted`] and the re-exported pagination
//!   contract.
//! - Errors: [`Error`] / [`ErrorCode`] for the controller boundary.
//! - Services: [`CrudService`], the surface controllers call.

pub mod audit;
pub mod auditor;
pub mod capability;
pub mod crud_service;
pub mod error;
pub mod identity;
pub mod ports;
pub mod query;

pub use self::audit::{
    AuditRecordError, AuditStamp, CreationRecord, DeletionRecord, ModificationRecord,
};
pub use self::auditor::Auditor;
pub use self::capability::{Auditable, Capabilities, Creatable, Deletable, Modifiable};
pub use self::crud_service::{CrudService, ListParams};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{ActorId, Entity, EntityKey, KeyAssignment, NamedEntity};
pub use self::query::{
    PageRequest, PagedResult, QueryConfig, QueryConfigError, SortDirection, Sortable, Unsorted,
};

/// Convenient result alias for the controller boundary.
///
/// # Examples
/// ```
/// use crud_kit::domain::{DomainResult, Error};
///
/// fn handler() -> DomainResult<()> {
///     Err(Error::not_found("no widget with key 7"))
/// }
///
/// assert!(handler().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
