//! Page selection and the paged result envelope.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::QueryConfigError;

/// A one-based page selection.
///
/// ## Invariants
/// - `number` and `size` are both at least 1.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(3, 10)?;
/// assert_eq!(page.offset(), 20);
/// # Ok::<(), pagination::QueryConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    number: NonZeroU32,
    size: NonZeroU32,
}

impl PageRequest {
    /// Validate and construct a page selection.
    pub fn new(number: u32, size: u32) -> Result<Self, QueryConfigError> {
        let number = NonZeroU32::new(number).ok_or(QueryConfigError::InvalidPageNumber)?;
        let size = NonZeroU32::new(size).ok_or(QueryConfigError::InvalidPageSize)?;
        Ok(Self { number, size })
    }

    /// One-based page number.
    pub const fn number(&self) -> u32 {
        self.number.get()
    }

    /// Maximum number of items on the page.
    pub const fn size(&self) -> u32 {
        self.size.get()
    }

    /// Index of the first item on this page, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        let skipped = u64::from(self.number.get() - 1) * u64::from(self.size.get());
        usize::try_from(skipped).unwrap_or(usize::MAX)
    }

    /// Page size as a `usize` item count.
    pub fn limit(&self) -> usize {
        usize::try_from(self.size.get()).unwrap_or(usize::MAX)
    }

    fn slice<T>(self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit())
            .collect()
    }
}

/// Items for one page plus the accounting needed to render paging controls.
///
/// `total_count` always describes the matching set before paging, so it is
/// identical on every page of the same query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Items on the requested page, or every matching item when unpaged.
    pub items: Vec<T>,
    /// Number of matching items before paging was applied.
    pub total_count: usize,
    /// The page that was applied, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRequest>,
}

impl<T> PagedResult<T> {
    /// Count `items`, then cut out the requested page.
    pub fn paginate(items: Vec<T>, page: Option<PageRequest>) -> Self {
        let total_count = items.len();
        let items = match page {
            Some(page) => page.slice(items),
            None => items,
        };
        Self {
            items,
            total_count,
            page,
        }
    }

    /// A result with no matching items.
    pub const fn empty(page: Option<PageRequest>) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
        }
    }

    /// Number of pages needed to cover `total_count`.
    ///
    /// Unpaged results count as a single page unless nothing matched.
    pub fn total_pages(&self) -> usize {
        match self.page {
            Some(page) => self.total_count.div_ceil(page.limit()),
            None if self.total_count == 0 => 0,
            None => 1,
        }
    }

    /// Whether a page after this one holds further items.
    pub fn has_next_page(&self) -> bool {
        self.page.is_some_and(|page| {
            usize::try_from(page.number()).is_ok_and(|number| number < self.total_pages())
        })
    }

    /// Whether a page before this one exists.
    pub fn has_previous_page(&self) -> bool {
        self.page.is_some_and(|page| page.number() > 1)
    }

    /// Convert the items while keeping the paging accounting intact.
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for page slicing and accounting.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn page(number: u32, size: u32) -> PageRequest {
        PageRequest::new(number, size).expect("valid page")
    }

    #[rstest]
    #[case(0, 10, QueryConfigError::InvalidPageNumber)]
    #[case(1, 0, QueryConfigError::InvalidPageSize)]
    #[case(0, 0, QueryConfigError::InvalidPageNumber)]
    fn zero_values_are_rejected(
        #[case] number: u32,
        #[case] size: u32,
        #[case] expected: QueryConfigError,
    ) {
        assert_eq!(PageRequest::new(number, size), Err(expected));
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 3, 12)]
    fn offset_skips_previous_pages(#[case] number: u32, #[case] size: u32, #[case] offset: usize) {
        assert_eq!(page(number, size).offset(), offset);
    }

    #[rstest]
    #[case(1, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9])]
    #[case(2, vec![10, 11, 12, 13, 14, 15, 16, 17, 18, 19])]
    #[case(3, vec![20, 21, 22, 23, 24])]
    #[case(4, vec![])]
    fn twenty_five_items_split_into_pages_of_ten(#[case] number: u32, #[case] expected: Vec<u32>) {
        let result = PagedResult::paginate((0..25).collect(), Some(page(number, 10)));

        assert_eq!(result.items, expected);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.total_pages(), 3);
    }

    #[rstest]
    #[case(0, 7)]
    #[case(1, 7)]
    #[case(23, 5)]
    #[case(100, 10)]
    #[case(101, 1)]
    fn every_item_appears_on_exactly_one_page(#[case] total: u32, #[case] size: u32) {
        let items: Vec<u32> = (0..total).collect();
        let probe = PagedResult::paginate(items.clone(), Some(page(1, size)));

        let mut seen = Vec::new();
        for number in 1..=probe.total_pages() {
            let number = u32::try_from(number).expect("page number fits");
            let result = PagedResult::paginate(items.clone(), Some(page(number, size)));
            assert_eq!(result.total_count, items.len());
            seen.extend(result.items);
        }

        assert_eq!(seen, items);
    }

    #[rstest]
    fn unpaged_results_keep_every_item() {
        let result = PagedResult::paginate(vec!["a", "b"], None);

        assert_eq!(result.items, vec!["a", "b"]);
        assert_eq!(result.total_count, 2);
        assert_eq!(result.total_pages(), 1);
        assert!(!result.has_next_page());
        assert!(!result.has_previous_page());
    }

    #[rstest]
    fn navigation_flags_follow_the_page_position() {
        let first = PagedResult::paginate((0..25).collect::<Vec<_>>(), Some(page(1, 10)));
        let last = PagedResult::paginate((0..25).collect::<Vec<_>>(), Some(page(3, 10)));

        assert!(first.has_next_page());
        assert!(!first.has_previous_page());
        assert!(!last.has_next_page());
        assert!(last.has_previous_page());
    }

    #[rstest]
    fn empty_result_has_no_pages() {
        let result: PagedResult<u8> = PagedResult::empty(Some(page(1, 5)));
        assert_eq!(result.total_pages(), 0);
        assert!(!result.has_next_page());
    }

    #[rstest]
    fn map_preserves_accounting() {
        let result = PagedResult::paginate(vec![1, 2, 3], Some(page(1, 2))).map(|n| n * 10);

        assert_eq!(result.items, vec![10, 20]);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.page, Some(page(1, 2)));
    }

    #[rstest]
    fn serialises_with_camel_case_fields() {
        let result = PagedResult::paginate(vec![1, 2, 3], Some(page(2, 2)));
        let value = serde_json::to_value(&result).expect("serialise paged result");

        assert_eq!(
            value,
            json!({
                "items": [3],
                "totalCount": 3,
                "page": { "number": 2, "size": 2 }
            })
        );
    }

    #[rstest]
    fn deserialising_rejects_a_zero_page_number() {
        let payload = json!({ "items": [], "totalCount": 0, "page": { "number": 0, "size": 2 } });
        let result: Result<PagedResult<u8>, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }
}
