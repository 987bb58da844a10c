//! Entity identity: key types and the accessor pair every entity exposes.

use std::fmt::Debug;
use std::hash::Hash;

use uuid::Uuid;

use super::Capabilities;

/// How a key type obtains its value when an entity is first persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAssignment {
    /// The repository issues the key; callers leave it at the sentinel.
    Generated,
    /// Callers supply the key; the sentinel is rejected.
    CallerAssigned,
}

/// Scalar value that identifies exactly one entity.
///
/// Equality is full value equality. The type's [`Default`] value is the
/// sentinel meaning "not yet assigned", so a freshly constructed entity is
/// transient until a repository persists it.
///
/// Implemented for the fixed-width integers and [`Uuid`]. Custom composite
/// keys implement it directly, usually as [`KeyAssignment::CallerAssigned`].
///
/// # Examples
/// ```
/// use crud_kit::domain::EntityKey;
///
/// assert!(0_i32.is_unassigned());
/// assert_eq!(i32::generate(None), Some(1));
/// assert_eq!(i32::generate(Some(41)), Some(42));
/// assert_eq!(i32::generate(Some(i32::MAX)), None);
/// ```
pub trait EntityKey: Copy + Eq + Ord + Hash + Debug + Default + Send + Sync + 'static {
    /// Who supplies the key on creation.
    fn assignment() -> KeyAssignment {
        KeyAssignment::Generated
    }

    /// Produce the next key after `last_issued`.
    ///
    /// Returns `None` when the key space is exhausted or when the key type is
    /// caller-assigned.
    fn generate(last_issued: Option<Self>) -> Option<Self>;

    /// Whether the key still holds the "new entity" sentinel.
    fn is_unassigned(&self) -> bool {
        *self == Self::default()
    }
}

macro_rules! sequential_keys {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EntityKey for $ty {
                fn generate(last_issued: Option<Self>) -> Option<Self> {
                    match last_issued {
                        Some(last) if last > 0 => last.checked_add(1),
                        _ => Some(1),
                    }
                }
            }
        )*
    };
}

sequential_keys!(i16, i32, i64, u16, u32, u64);

impl EntityKey for Uuid {
    fn generate(_last_issued: Option<Self>) -> Option<Self> {
        // v4 identifiers carry version bits, so they are never nil.
        Some(Uuid::new_v4())
    }
}

/// Identifier type recorded as the acting principal in audit fields.
///
/// Blanket-implemented; entities without audit capabilities use `()`.
pub trait ActorId: Clone + Eq + Debug + Send + Sync + 'static {}

impl<T> ActorId for T where T: Clone + Eq + Debug + Send + Sync + 'static {}

/// A value with exactly one key of type [`Entity::Key`].
///
/// `set_id` exists for repositories; application code treats the key as
/// immutable once the entity has been persisted.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Key type identifying the entity.
    type Key: EntityKey;
    /// Principal identifier recorded by the audit capabilities.
    type Actor: ActorId;

    /// Current key, the sentinel while transient.
    fn id(&self) -> Self::Key;

    /// Replace the key.
    fn set_id(&mut self, id: Self::Key);

    /// Whether the entity has not been persisted yet.
    fn is_transient(&self) -> bool {
        self.id().is_unassigned()
    }

    /// Audit capabilities the entity type declares.
    ///
    /// Entity types that track creation, modification or deletion override
    /// this, e.g. with [`Capabilities::auditable`].
    fn capabilities() -> Capabilities<Self> {
        Capabilities::none()
    }
}

/// Entity exposing a single human-readable name.
///
/// No defaulting or uniqueness rules apply at this layer.
pub trait NamedEntity: Entity {
    /// Display name.
    fn name(&self) -> &str;

    /// Replace the display name.
    fn set_name(&mut self, name: String);
}
