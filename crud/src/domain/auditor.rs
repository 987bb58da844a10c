//! Writes audit records on behalf of repository backends.
//!
//! Backends hand every write to the [`Auditor`] before committing it. The
//! auditor resolves the acting principal and the current instant once per
//! write, then fills exactly the records the entity type declares through
//! [`crate::domain::Entity::capabilities`]. Nothing else in the crate writes
//! audit records.
//!
//! Every method computes its stamp before touching the entity, so a failed
//! principal lookup leaves the entity unchanged.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use super::audit::StampSlot;
use super::ports::{ActingPrincipal, PrincipalError};
use super::{ActorId, AuditStamp, Entity, ModificationRecord};

/// Stamps audit records with the acting principal and the clock's instant.
#[derive(Clone)]
pub struct Auditor<A> {
    principal: Arc<dyn ActingPrincipal<A>>,
    clock: Arc<dyn Clock>,
}

impl<A> Auditor<A>
where
    A: ActorId,
{
    /// Build an auditor from its two collaborators.
    pub fn new(principal: Arc<dyn ActingPrincipal<A>>, clock: Arc<dyn Clock>) -> Self {
        Self { principal, clock }
    }

    /// Resolve a fresh stamp for the current write.
    pub fn stamp(&self) -> Result<AuditStamp<A>, PrincipalError> {
        let actor = self.principal.current()?;
        Ok(AuditStamp::new(actor, self.clock.utc()))
    }

    /// Prepare a transient entity for its first write.
    ///
    /// Stamps the creation record and clears any modification or deletion
    /// record the caller supplied.
    pub fn prepare_insert<E>(&self, entity: &mut E) -> Result<(), PrincipalError>
    where
        E: Entity<Actor = A>,
    {
        let capabilities = E::capabilities();
        let stamp = self.stamp_if(capabilities.is_creatable())?;

        if let Some(record) = capabilities.creation_mut(entity) {
            *record.slot_mut() = stamp;
        }
        if let Some(record) = capabilities.modification_mut(entity) {
            *record.slot_mut() = None;
        }
        if let Some(record) = capabilities.deletion_mut(entity) {
            *record.slot_mut() = None;
        }
        Ok(())
    }

    /// Prepare `incoming` to replace `stored`.
    ///
    /// Creation and deletion records are carried over from `stored`; the
    /// modification record is restamped strictly after the stored one, so
    /// two updates within one clock tick still yield distinct tokens.
    pub fn prepare_update<E>(&self, stored: &E, incoming: &mut E) -> Result<(), PrincipalError>
    where
        E: Entity<Actor = A>,
    {
        let capabilities = E::capabilities();
        let previous = capabilities
            .modification(stored)
            .and_then(ModificationRecord::modified_at);
        let stamp = self
            .stamp_if(capabilities.is_modifiable())?
            .map(|stamp| Self::after(stamp, previous));

        if let (Some(kept), Some(record)) = (
            capabilities.creation(stored),
            capabilities.creation_mut(incoming),
        ) {
            record.clone_from(kept);
        }
        if let (Some(kept), Some(record)) = (
            capabilities.deletion(stored),
            capabilities.deletion_mut(incoming),
        ) {
            record.clone_from(kept);
        }
        if let Some(record) = capabilities.modification_mut(incoming) {
            *record.slot_mut() = stamp;
        }
        Ok(())
    }

    /// Soft-delete `entity`.
    ///
    /// Returns `false`, without resolving a principal, when the type has no
    /// soft deletion or the entity is already deleted.
    pub fn mark_deleted<E>(&self, entity: &mut E) -> Result<bool, PrincipalError>
    where
        E: Entity<Actor = A>,
    {
        let capabilities = E::capabilities();
        if !capabilities.is_deletable() || capabilities.is_deleted(entity) {
            return Ok(false);
        }

        let stamp = self.stamp()?;
        Ok(capabilities
            .deletion_mut(entity)
            .map(|record| *record.slot_mut() = Some(stamp))
            .is_some())
    }

    /// Clear the deletion record of `entity`.
    ///
    /// Returns whether the entity was soft-deleted beforehand.
    pub fn clear_deletion<E>(&self, entity: &mut E) -> bool
    where
        E: Entity<Actor = A>,
    {
        E::capabilities()
            .deletion_mut(entity)
            .is_some_and(|record| record.slot_mut().take().is_some())
    }

    fn after(stamp: AuditStamp<A>, previous: Option<DateTime<Utc>>) -> AuditStamp<A> {
        match previous {
            Some(previous) if stamp.at() <= previous => {
                let next = previous
                    .checked_add_signed(TimeDelta::nanoseconds(1))
                    .unwrap_or(previous);
                AuditStamp::new(stamp.actor().clone(), next)
            }
            _ => stamp,
        }
    }

    fn stamp_if(&self, tracked: bool) -> Result<Option<AuditStamp<A>>, PrincipalError> {
        if tracked {
            self.stamp().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for audit stamping.

    use chrono::{DateTime, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::{FixedPrincipal, MockActingPrincipal};
    use crate::domain::{Creatable, Deletable, Modifiable};
    use crate::test_support::{LedgerEntry, MutableClock, Tag, Widget};

    struct Harness {
        actor: Uuid,
        clock: Arc<MutableClock>,
        auditor: Auditor<Uuid>,
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[fixture]
    fn harness() -> Harness {
        let actor = Uuid::new_v4();
        let clock = Arc::new(MutableClock::new(start()));
        let auditor = Auditor::new(Arc::new(FixedPrincipal::new(actor)), clock.clone());
        Harness {
            actor,
            clock,
            auditor,
        }
    }

    fn failing_auditor() -> Auditor<Uuid> {
        let mut principal = MockActingPrincipal::<Uuid>::new();
        principal
            .expect_current()
            .returning(|| Err(PrincipalError::unavailable("no session")));
        Auditor::new(Arc::new(principal), Arc::new(MutableClock::new(start())))
    }

    #[rstest]
    fn inserts_stamp_creation_and_clear_the_rest(harness: Harness) {
        let mut widget = Widget::new("Widget");
        widget.modification = crate::domain::ModificationRecord::from_parts(
            Some(Uuid::new_v4()),
            Some(start()),
        )
        .expect("pair");

        harness.auditor.prepare_insert(&mut widget).expect("stamped");

        assert_eq!(widget.created_by(), Some(&harness.actor));
        assert_eq!(widget.created_at(), Some(start()));
        assert_eq!(widget.modified_at(), None);
        assert!(!widget.is_deleted());
    }

    #[rstest]
    fn updates_keep_creation_and_restamp_modification(harness: Harness) {
        let mut stored = Widget::new("Widget");
        harness.auditor.prepare_insert(&mut stored).expect("stamped");
        harness.clock.advance_seconds(60);

        let mut incoming = Widget::new("Widget v2");
        harness
            .auditor
            .prepare_update(&stored, &mut incoming)
            .expect("stamped");

        assert_eq!(incoming.created_at(), Some(start()));
        assert_eq!(incoming.modified_by(), Some(&harness.actor));
        assert_eq!(
            incoming.modified_at(),
            Some(start() + chrono::TimeDelta::seconds(60))
        );
    }

    #[rstest]
    fn updates_within_one_tick_still_move_the_token_forward(harness: Harness) {
        let mut stored = Widget::new("Widget");
        harness.auditor.prepare_insert(&mut stored).expect("stamped");

        let mut first = stored.clone();
        harness
            .auditor
            .prepare_update(&stored, &mut first)
            .expect("stamped");
        let mut second = first.clone();
        harness
            .auditor
            .prepare_update(&first, &mut second)
            .expect("stamped");

        assert_eq!(first.modified_at(), Some(start()));
        assert_eq!(
            second.modified_at(),
            Some(start() + chrono::TimeDelta::nanoseconds(1))
        );
        assert_eq!(second.modified_by(), Some(&harness.actor));
    }

    #[rstest]
    fn deletion_is_stamped_once(harness: Harness) {
        let mut widget = Widget::new("Widget");

        assert_eq!(harness.auditor.mark_deleted(&mut widget), Ok(true));
        harness.clock.advance_seconds(5);
        assert_eq!(harness.auditor.mark_deleted(&mut widget), Ok(false));
        assert_eq!(widget.deleted_at(), Some(start()));

        assert!(harness.auditor.clear_deletion(&mut widget));
        assert!(!harness.auditor.clear_deletion(&mut widget));
        assert!(!widget.is_deleted());
    }

    #[rstest]
    fn untracked_types_never_resolve_a_principal() {
        let mut principal = MockActingPrincipal::<()>::new();
        principal.expect_current().never();
        let auditor = Auditor::new(Arc::new(principal), Arc::new(MutableClock::new(start())));
        let mut tag = Tag::new("urgent");

        auditor.prepare_insert(&mut tag).expect("nothing to stamp");
        auditor
            .prepare_update(&tag.clone(), &mut tag)
            .expect("nothing to stamp");
        assert_eq!(auditor.mark_deleted(&mut tag), Ok(false));
    }

    #[rstest]
    fn principal_failures_leave_the_entity_untouched() {
        let auditor = failing_auditor();
        let mut entry = LedgerEntry::new("opening balance", 10_000);
        let before = entry.clone();

        let error = auditor.prepare_insert(&mut entry).expect_err("no principal");

        assert_eq!(error, PrincipalError::unavailable("no session"));
        assert_eq!(entry, before);
    }

    #[rstest]
    fn ledger_entries_only_get_a_creation_stamp(harness: Harness) {
        let mut entry = LedgerEntry::new("opening balance", 10_000);
        harness.auditor.prepare_insert(&mut entry).expect("stamped");

        assert_eq!(entry.created_by(), Some(&harness.actor));
        assert_eq!(harness.auditor.mark_deleted(&mut entry), Ok(false));
    }
}
