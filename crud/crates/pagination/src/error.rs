//! Validation failures raised while building a query configuration.

use thiserror::Error;

/// Reasons a [`crate::QueryConfig`] or [`crate::PageRequest`] was rejected.
///
/// Invalid paging is always surfaced to the caller; values are never clamped
/// into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryConfigError {
    /// Page numbers are one-based; zero was supplied.
    #[error("page number must be at least 1")]
    InvalidPageNumber,
    /// Page sizes must be positive; zero was supplied.
    #[error("page size must be at least 1")]
    InvalidPageSize,
    /// A page number arrived without the page size needed to slice by it.
    #[error("page number {number} was supplied without a page size")]
    MissingPageSize {
        /// The page number the caller asked for.
        number: u32,
    },
    /// The requested page size is above the configured ceiling.
    #[error("page size {requested} exceeds the maximum of {max}")]
    PageSizeTooLarge {
        /// The page size the caller asked for.
        requested: u32,
        /// The largest page size the caller may request.
        max: u32,
    },
}
