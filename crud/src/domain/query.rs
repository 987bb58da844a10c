//! Sorting hooks that connect entities to the pagination contract.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

pub use pagination::{PageRequest, PagedResult, QueryConfig, QueryConfigError, SortDirection};

use super::Entity;

/// Entity with a closed set of sortable fields.
///
/// `SortField` is the field selector carried by [`QueryConfig`]. Entity
/// types without sortable fields use [`Unsorted`].
pub trait Sortable: Entity {
    /// Field selector, usually a small `Copy` enum.
    type SortField: Copy + Debug + Eq + Hash + Send + Sync + 'static;

    /// Ascending comparison of `self` and `other` on `field`.
    fn compare_by(&self, other: &Self, field: Self::SortField) -> Ordering;
}

/// Field selector for entity types that expose no sortable fields.
///
/// The enum has no variants, so a query over such a type can never carry a
/// sort field and rows keep the backend's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsorted {}

impl Unsorted {
    /// Comparator for [`Sortable::compare_by`] implementations.
    pub const fn compare(self) -> Ordering {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for entity sorting through the query contract.

    use rstest::rstest;

    use super::*;
    use crate::test_support::{Widget, WidgetField};

    fn widgets() -> Vec<Widget> {
        vec![
            Widget::new("sprocket").with_quantity(4),
            Widget::new("gear").with_quantity(9),
            Widget::new("axle").with_quantity(4),
        ]
    }

    fn names(result: &PagedResult<Widget>) -> Vec<String> {
        result.items.iter().map(|w| w.name.clone()).collect()
    }

    #[rstest]
    #[case(WidgetField::Name, false, &["axle", "gear", "sprocket"])]
    #[case(WidgetField::Name, true, &["sprocket", "gear", "axle"])]
    #[case(WidgetField::Quantity, false, &["sprocket", "axle", "gear"])]
    #[case(WidgetField::Quantity, true, &["gear", "sprocket", "axle"])]
    fn entities_sort_through_their_field_selector(
        #[case] field: WidgetField,
        #[case] descending: bool,
        #[case] expected: &[&str],
    ) {
        let query = QueryConfig::build(Some(field), descending, None, None).expect("valid query");
        let result = query.apply(widgets(), |left, right, field| left.compare_by(right, *field));
        assert_eq!(names(&result), expected);
    }
}
