//! Query configuration: sort selection plus optional paging.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{PageRequest, PagedResult, QueryConfigError};

/// Direction applied to the selected sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest values first.
    #[default]
    Ascending,
    /// Largest values first.
    Descending,
}

impl SortDirection {
    /// Map the conventional `sort_descending` flag onto a direction.
    pub const fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Whether the direction is [`SortDirection::Descending`].
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// Orient an ascending comparison result.
    pub const fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Everything a list query asks for.
///
/// `F` is the field selector type; repositories usually use a small enum per
/// entity. Without a sort field the backend's own deterministic order is
/// kept and the direction is ignored.
///
/// # Examples
/// ```
/// use pagination::{QueryConfig, QueryConfigError, SortDirection};
///
/// let query = QueryConfig::build(Some("created_at"), true, Some(1), Some(25))?;
/// assert_eq!(query.direction(), SortDirection::Descending);
/// assert_eq!(query.page().map(|page| page.size()), Some(25));
///
/// let invalid = QueryConfig::<&str>::build(None, false, Some(0), Some(25));
/// assert_eq!(invalid, Err(QueryConfigError::InvalidPageNumber));
/// # Ok::<(), QueryConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig<F> {
    sort_field: Option<F>,
    direction: SortDirection,
    page: Option<PageRequest>,
}

impl<F> Default for QueryConfig<F> {
    fn default() -> Self {
        Self::all()
    }
}

impl<F> QueryConfig<F> {
    /// Unsorted, unpaged: every matching row in backend order.
    pub const fn all() -> Self {
        Self {
            sort_field: None,
            direction: SortDirection::Ascending,
            page: None,
        }
    }

    /// Build a configuration from raw list parameters.
    ///
    /// - No page number and no page size: unpaged.
    /// - Both: the one-based page of that size.
    /// - A page size alone: the first page of that size.
    /// - A page number alone: rejected, there is nothing to slice by.
    ///
    /// Zero page numbers or sizes are rejected rather than clamped.
    pub fn build(
        sort_field: Option<F>,
        sort_descending: bool,
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Self, QueryConfigError> {
        let page = match (page_number, page_size) {
            (None, None) => None,
            (Some(number), Some(size)) => Some(PageRequest::new(number, size)?),
            (None, Some(size)) => Some(PageRequest::new(1, size)?),
            (Some(0), None) => return Err(QueryConfigError::InvalidPageNumber),
            (Some(number), None) => return Err(QueryConfigError::MissingPageSize { number }),
        };

        Ok(Self {
            sort_field,
            direction: SortDirection::from_descending(sort_descending),
            page,
        })
    }

    /// Sort by `field` in `direction`.
    #[must_use]
    pub fn sorted_by(mut self, field: F, direction: SortDirection) -> Self {
        self.sort_field = Some(field);
        self.direction = direction;
        self
    }

    /// Restrict the result to `page`.
    #[must_use]
    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    /// Selected sort field, if any.
    pub const fn sort_field(&self) -> Option<&F> {
        self.sort_field.as_ref()
    }

    /// Direction applied to the sort field.
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Requested page, if any.
    pub const fn page(&self) -> Option<PageRequest> {
        self.page
    }

    /// Reject page sizes above `max`.
    pub fn ensure_page_size_at_most(&self, max: u32) -> Result<(), QueryConfigError> {
        match self.page {
            Some(page) if page.size() > max => Err(QueryConfigError::PageSizeTooLarge {
                requested: page.size(),
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Translate the field selector, e.g. from a request string to a typed
    /// per-entity enum.
    pub fn try_map_field<G, E>(
        self,
        map: impl FnOnce(F) -> Result<G, E>,
    ) -> Result<QueryConfig<G>, E> {
        let sort_field = self.sort_field.map(map).transpose()?;
        Ok(QueryConfig {
            sort_field,
            direction: self.direction,
            page: self.page,
        })
    }

    /// Sort already filtered `items`, count them, then cut out the page.
    ///
    /// The sort is stable: items that compare equal keep the order they
    /// arrived in, in both directions.
    pub fn apply<T, C>(&self, mut items: Vec<T>, compare: C) -> PagedResult<T>
    where
        C: Fn(&T, &T, &F) -> Ordering,
    {
        if let Some(field) = self.sort_field.as_ref() {
            let direction = self.direction;
            items.sort_by(|left, right| direction.orient(compare(left, right, field)));
        }
        PagedResult::paginate(items, self.page)
    }
}
