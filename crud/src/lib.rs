//! Audit-aware generic repository building blocks.
//!
//! The crate is organised as a small hexagon:
//!
//! - [`domain`] holds the identity model, the audit capability traits, the
//!   query contract and the ports ([`domain::ports::Repository`],
//!   [`domain::ports::ActingPrincipal`]) every backend and caller programs
//!   against.
//! - [`outbound`] holds the reference in-memory backend that implements the
//!   repository port and demonstrates its invariants.
//! - [`settings`] holds the OrthoConfig-backed tuning knobs.

pub mod domain;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use pagination;
