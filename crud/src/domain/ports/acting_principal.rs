//! Port resolving the principal recorded in audit fields.

use thiserror::Error;

use crate::domain::ActorId;

/// Raised when no acting principal can be resolved for the current call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    /// The principal source had nothing to offer.
    #[error("acting principal unavailable: {message}")]
    Unavailable {
        /// Why resolution failed.
        message: String,
    },
}

impl PrincipalError {
    /// Build [`PrincipalError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Supplies the identifier of whoever is performing the current write.
///
/// Resolution is lazy: repositories only ask when a write actually stamps an
/// audit record, so untracked entity types never need a principal.
#[cfg_attr(test, mockall::automock)]
pub trait ActingPrincipal<A>: Send + Sync
where
    A: ActorId,
{
    /// Resolve the current principal.
    fn current(&self) -> Result<A, PrincipalError>;
}

/// Principal source that always answers with the same identifier.
///
/// Suits batch jobs and tests that act as a single service account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPrincipal<A>(A);

impl<A> FixedPrincipal<A> {
    /// Always resolve to `actor`.
    pub const fn new(actor: A) -> Self {
        Self(actor)
    }
}

impl<A> ActingPrincipal<A> for FixedPrincipal<A>
where
    A: ActorId,
{
    fn current(&self) -> Result<A, PrincipalError> {
        Ok(self.0.clone())
    }
}
