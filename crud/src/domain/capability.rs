//! Audit capabilities and their composition.
//!
//! The three capabilities are independent traits; an entity type implements
//! any subset and then declares that subset once through
//! [`crate::domain::Entity::capabilities`]. Repository code reads the
//! declaration and branches on it, so one generic implementation serves
//! append-only logs, mutable catalogues and fully audited aggregates alike.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{CreationRecord, DeletionRecord, Entity, ModificationRecord};

/// Tracks who created the entity and when.
pub trait Creatable: Entity {
    /// Creation record; absent only while transient.
    fn creation(&self) -> &CreationRecord<Self::Actor>;

    /// Mutable access for repositories.
    fn creation_mut(&mut self) -> &mut CreationRecord<Self::Actor>;

    /// Creator, once persisted.
    fn created_by(&self) -> Option<&Self::Actor> {
        self.creation().created_by()
    }

    /// Creation instant, once persisted.
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation().created_at()
    }
}

/// Tracks who last modified the entity and when.
pub trait Modifiable: Entity {
    /// Modification record; absent until the first update.
    fn modification(&self) -> &ModificationRecord<Self::Actor>;

    /// Mutable access for repositories.
    fn modification_mut(&mut self) -> &mut ModificationRecord<Self::Actor>;

    /// Last modifier, if ever updated.
    fn modified_by(&self) -> Option<&Self::Actor> {
        self.modification().modified_by()
    }

    /// Last modification instant, if ever updated.
    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modification().modified_at()
    }
}

/// Supports soft deletion.
pub trait Deletable: Entity {
    /// Deletion record; present exactly while soft-deleted.
    fn deletion(&self) -> &DeletionRecord<Self::Actor>;

    /// Mutable access for repositories.
    fn deletion_mut(&mut self) -> &mut DeletionRecord<Self::Actor>;

    /// Deleter, while soft-deleted.
    fn deleted_by(&self) -> Option<&Self::Actor> {
        self.deletion().deleted_by()
    }

    /// Deletion instant, while soft-deleted.
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deletion().deleted_at()
    }

    /// Whether the entity is soft-deleted.
    fn is_deleted(&self) -> bool {
        self.deletion().is_present()
    }
}

/// Creation, modification and deletion tracking together.
pub trait Auditable: Creatable + Modifiable + Deletable {}

impl<T> Auditable for T where T: Creatable + Modifiable + Deletable {}

struct Access<E, R> {
    read: fn(&E) -> &R,
    write: fn(&mut E) -> &mut R,
}

impl<E, R> Clone for Access<E, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, R> Copy for Access<E, R> {}

/// The audit capabilities an entity type declares.
///
/// Each builder method is only available when the entity implements the
/// matching trait, so a declaration can never promise a record the entity
/// does not carry.
///
/// # Examples
/// ```
/// use crud_kit::domain::{Capabilities, Entity};
/// use crud_kit::test_support::{LedgerEntry, Tag, Widget};
///
/// let widget = Widget::capabilities();
/// assert!(widget.is_creatable() && widget.is_modifiable() && widget.is_deletable());
///
/// let ledger = LedgerEntry::capabilities();
/// assert!(ledger.is_creatable() && !ledger.is_modifiable() && !ledger.is_deletable());
///
/// assert!(Tag::capabilities().is_untracked());
/// # let _: Capabilities<Tag> = Capabilities::none();
/// ```
pub struct Capabilities<E: Entity> {
    creation: Option<Access<E, CreationRecord<E::Actor>>>,
    modification: Option<Access<E, ModificationRecord<E::Actor>>>,
    deletion: Option<Access<E, DeletionRecord<E::Actor>>>,
}

impl<E: Entity> Clone for Capabilities<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity> Copy for Capabilities<E> {}

impl<E: Entity> Default for Capabilities<E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<E: Entity> fmt::Debug for Capabilities<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("creatable", &self.is_creatable())
            .field("modifiable", &self.is_modifiable())
            .field("deletable", &self.is_deletable())
            .finish()
    }
}

impl<E: Entity> Capabilities<E> {
    /// No audit tracking.
    pub const fn none() -> Self {
        Self {
            creation: None,
            modification: None,
            deletion: None,
        }
    }

    /// Every capability of an [`Auditable`] entity.
    pub fn auditable() -> Self
    where
        E: Auditable,
    {
        Self::none()
            .with_creation()
            .with_modification()
            .with_deletion()
    }

    /// Declare creation tracking.
    #[must_use]
    pub fn with_creation(mut self) -> Self
    where
        E: Creatable,
    {
        self.creation = Some(Access {
            read: E::creation,
            write: E::creation_mut,
        });
        self
    }

    /// Declare modification tracking.
    #[must_use]
    pub fn with_modification(mut self) -> Self
    where
        E: Modifiable,
    {
        self.modification = Some(Access {
            read: E::modification,
            write: E::modification_mut,
        });
        self
    }

    /// Declare soft deletion.
    #[must_use]
    pub fn with_deletion(mut self) -> Self
    where
        E: Deletable,
    {
        self.deletion = Some(Access {
            read: E::deletion,
            write: E::deletion_mut,
        });
        self
    }

    /// Whether creation is tracked.
    pub const fn is_creatable(&self) -> bool {
        self.creation.is_some()
    }

    /// Whether modification is tracked.
    pub const fn is_modifiable(&self) -> bool {
        self.modification.is_some()
    }

    /// Whether deletes are soft.
    pub const fn is_deletable(&self) -> bool {
        self.deletion.is_some()
    }

    /// Whether no capability is declared.
    pub const fn is_untracked(&self) -> bool {
        !self.is_creatable() && !self.is_modifiable() && !self.is_deletable()
    }

    /// Creation record of `entity`, if tracked.
    pub fn creation<'a>(&self, entity: &'a E) -> Option<&'a CreationRecord<E::Actor>> {
        self.creation.map(|access| (access.read)(entity))
    }

    /// Modification record of `entity`, if tracked.
    pub fn modification<'a>(&self, entity: &'a E) -> Option<&'a ModificationRecord<E::Actor>> {
        self.modification.map(|access| (access.read)(entity))
    }

    /// Deletion record of `entity`, if tracked.
    pub fn deletion<'a>(&self, entity: &'a E) -> Option<&'a DeletionRecord<E::Actor>> {
        self.deletion.map(|access| (access.read)(entity))
    }

    /// Whether `entity` is soft-deleted. Always false without soft deletion.
    pub fn is_deleted(&self, entity: &E) -> bool {
        self.deletion(entity).is_some_and(DeletionRecord::is_present)
    }

    pub(crate) fn creation_mut<'a>(
        &self,
        entity: &'a mut E,
    ) -> Option<&'a mut CreationRecord<E::Actor>> {
        self.creation.map(|access| (access.write)(entity))
    }

    pub(crate) fn modification_mut<'a>(
        &self,
        entity: &'a mut E,
    ) -> Option<&'a mut ModificationRecord<E::Actor>> {
        self.modification.map(|access| (access.write)(entity))
    }

    pub(crate) fn deletion_mut<'a>(
        &self,
        entity: &'a mut E,
    ) -> Option<&'a mut DeletionRecord<E::Actor>> {
        self.deletion.map(|access| (access.write)(entity))
    }
}
