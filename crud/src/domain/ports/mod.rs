//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod acting_principal;
mod repository;

#[cfg(test)]
pub use acting_principal::MockActingPrincipal;
pub use acting_principal::{ActingPrincipal, FixedPrincipal, PrincipalError};
#[cfg(test)]
pub use repository::MockRepository;
pub use repository::{FixtureRepository, Repository, RepositoryError, RepositoryErrorKind};
