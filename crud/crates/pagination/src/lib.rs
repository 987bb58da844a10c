//! Query configuration and paged result primitives for CRUD list endpoints.
//!
//! The crate describes what a list query asks for (an optional sort field
//! selector, a direction, an optional one-based page) and what comes back
//! (the page's items, the total number of matching rows before paging, and an
//! echo of the page that was applied). It knows nothing about entities or
//! storage: repositories filter their rows first and then feed them through
//! [`QueryConfig::apply`].
//!
//! # Examples
//! ```
//! use pagination::QueryConfig;
//!
//! let query = QueryConfig::build(Some("name"), false, Some(2), Some(2))?;
//! let result = query.apply(vec!["d", "a", "c", "b", "e"], |left, right, _field| left.cmp(right));
//!
//! assert_eq!(result.items, vec!["c", "d"]);
//! assert_eq!(result.total_count, 5);
//! assert_eq!(result.total_pages(), 3);
//! # Ok::<(), pagination::QueryConfigError>(())
//! ```

mod error;
mod page;
mod query;

pub use error::QueryConfigError;
pub use page::{PageRequest, PagedResult};
pub use query::{QueryConfig, SortDirection};
