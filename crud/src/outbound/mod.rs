//! Outbound adapters implementing domain ports.
//!
//! - **memory**: the reference in-memory repository backend.
//!
//! Adapters translate between domain types and their storage representation.
//! Audit stamping is delegated to [`crate::domain::Auditor`]; adapters only
//! decide when a write happens and keep it atomic.

pub mod memory;
