//! Audit records stamped by repositories.
//!
//! Each record holds an optional [`AuditStamp`] (who and when), so the
//! actor and timestamp of a record are present together or absent together
//! by construction. Records serialise as a flat pair of camelCase fields
//! (`createdBy`/`createdAt`, `modifiedBy`/`modifiedAt`,
//! `deletedBy`/`deletedAt`) and are designed to be `#[serde(flatten)]`-ed
//! into entity payloads. Only the [`crate::domain::Auditor`] writes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Who performed an audited action and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp<A> {
    actor: A,
    at: DateTime<Utc>,
}

impl<A> AuditStamp<A> {
    /// Pair an actor with a UTC instant.
    pub const fn new(actor: A, at: DateTime<Utc>) -> Self {
        Self { actor, at }
    }

    /// Acting principal.
    pub const fn actor(&self) -> &A {
        &self.actor
    }

    /// UTC instant of the action.
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Raised when hydrating a record whose actor and timestamp disagree on
/// presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuditRecordError {
    /// Exactly one half of the pair was supplied.
    #[error("{record} must carry both its actor and its timestamp, or neither")]
    UnpairedFields { record: &'static str },
}

/// Access to the stamp slot shared by every record type.
pub(crate) trait StampSlot<A> {
    fn slot_mut(&mut self) -> &mut Option<AuditStamp<A>>;
}

macro_rules! audit_record {
    (
        $(#[$meta:meta])*
        $name:ident { $by:ident, $at:ident }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name<A> {
            stamp: Option<AuditStamp<A>>,
        }

        impl<A> Default for $name<A> {
            fn default() -> Self {
                Self::absent()
            }
        }

        impl<A> $name<A> {
            /// A record that has not been stamped.
            pub const fn absent() -> Self {
                Self { stamp: None }
            }

            /// Rebuild a record from its stored halves.
            ///
            /// Backends use this when hydrating rows; half-populated pairs
            /// are rejected.
            pub fn from_parts(
                $by: Option<A>,
                $at: Option<DateTime<Utc>>,
            ) -> Result<Self, AuditRecordError> {
                match ($by, $at) {
                    (Some(actor), Some(at)) => Ok(Self {
                        stamp: Some(AuditStamp::new(actor, at)),
                    }),
                    (None, None) => Ok(Self::absent()),
                    _ => Err(AuditRecordError::UnpairedFields {
                        record: stringify!($name),
                    }),
                }
            }

            /// Split the record into its stored halves.
            pub fn into_parts(self) -> (Option<A>, Option<DateTime<Utc>>) {
                match self.stamp {
                    Some(AuditStamp { actor, at }) => (Some(actor), Some(at)),
                    None => (None, None),
                }
            }

            /// The stamp, if the record has been written.
            pub const fn stamp(&self) -> Option<&AuditStamp<A>> {
                self.stamp.as_ref()
            }

            /// Whether the record has been written.
            pub const fn is_present(&self) -> bool {
                self.stamp.is_some()
            }

            /// Acting principal, if stamped.
            pub fn $by(&self) -> Option<&A> {
                self.stamp.as_ref().map(AuditStamp::actor)
            }

            /// UTC instant, if stamped.
            pub fn $at(&self) -> Option<DateTime<Utc>> {
                self.stamp.as_ref().map(AuditStamp::at)
            }
        }

        impl<A> StampSlot<A> for $name<A> {
            fn slot_mut(&mut self) -> &mut Option<AuditStamp<A>> {
                &mut self.stamp
            }
        }

        ::paste::paste! {
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct [<$name Ref>]<'a, A> {
                $by: Option<&'a A>,
                $at: Option<DateTime<Utc>>,
            }

            #[derive(Deserialize)]
            #[serde(rename_all = "camelCase")]
            struct [<$name Dto>]<A> {
                $by: Option<A>,
                $at: Option<DateTime<Utc>>,
            }

            impl<A: Serialize> Serialize for $name<A> {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    [<$name Ref>] {
                        $by: self.$by(),
                        $at: self.$at(),
                    }
                    .serialize(serializer)
                }
            }

            impl<'de, A: Deserialize<'de>> Deserialize<'de> for $name<A> {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let dto = [<$name Dto>]::<A>::deserialize(deserializer)?;
                    Self::from_parts(dto.$by, dto.$at).map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

audit_record! {
    /// Creator and creation instant.
    ///
    /// Absent only while the entity is transient; written once by `add` and
    /// never rewritten afterwards.
    CreationRecord { created_by, created_at }
}

audit_record! {
    /// Last modifier and modification instant.
    ///
    /// Absent until the first successful update; every update overwrites it.
    /// The timestamp doubles as the optimistic-concurrency token.
    ModificationRecord { modified_by, modified_at }
}

audit_record! {
    /// Deleter and deletion instant.
    ///
    /// Presence is the sole soft-delete signal; restore clears it.
    DeletionRecord { deleted_by, deleted_at }
}
