//! Tests for the CRUD service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockRepository, RepositoryError};
use crate::domain::{ErrorCode, Modifiable};
use crate::outbound::memory::InMemoryRepository;
use crate::test_support::{MutableClock, Widget, WidgetField, auditor, epoch};

type MemoryService = CrudService<Widget, InMemoryRepository<Widget>>;

#[fixture]
fn service() -> MemoryService {
    let clock = Arc::new(MutableClock::new(epoch()));
    let repository = InMemoryRepository::new(auditor(Uuid::new_v4(), clock));
    CrudService::new(Arc::new(repository))
}

fn mock_service(repo: MockRepository<Widget>) -> CrudService<Widget, MockRepository<Widget>> {
    CrudService::new(Arc::new(repo))
}

#[rstest]
#[tokio::test]
async fn get_maps_absence_to_not_found(service: MemoryService) {
    let error = service.get(12).await.expect_err("absent");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn created_entities_can_be_fetched(service: MemoryService) {
    let created = service.create(Widget::new("Widget")).await.expect("create");

    let fetched = service.get(created.id).await.expect("get");

    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test]
async fn update_rejects_mismatched_keys(service: MemoryService) {
    let created = service.create(Widget::new("Widget")).await.expect("create");

    let error = service
        .update(created.id + 1, created)
        .await
        .expect_err("mismatch");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.details().is_some());
}

#[rstest]
#[tokio::test]
async fn stale_conditional_updates_conflict(service: MemoryService) {
    let created = service.create(Widget::new("Widget")).await.expect("create");
    let updated = service
        .update(created.id, created.clone())
        .await
        .expect("update");
    assert!(updated.modified_at().is_some());

    let error = service
        .update_if_unmodified(created.id, created, None)
        .await
        .expect_err("stale");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn delete_and_restore_report_misses(service: MemoryService) {
    let created = service.create(Widget::new("Widget")).await.expect("create");

    service.delete(created.id).await.expect("delete");
    let again = service.delete(created.id).await.expect_err("already deleted");
    assert_eq!(again.code(), ErrorCode::NotFound);

    service.restore(created.id).await.expect("restore");
    let again = service.restore(created.id).await.expect_err("already active");
    assert_eq!(again.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(ListParams { page_number: Some(0), page_size: Some(10), ..ListParams::default() })]
#[case(ListParams { page_number: Some(2), ..ListParams::default() })]
#[case(ListParams { page_size: Some(0), ..ListParams::default() })]
#[case(ListParams { page_size: Some(51), ..ListParams::default() })]
#[tokio::test]
async fn invalid_list_parameters_are_rejected(#[case] params: ListParams<WidgetField>) {
    let service = mock_service(MockRepository::new()).with_max_page_size(50);

    let error = service.list(params).await.expect_err("invalid");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn list_passes_the_built_query_through() {
    let mut repo = MockRepository::<Widget>::new();
    repo.expect_get_all()
        .withf(|query| {
            query.sort_field() == Some(&WidgetField::Quantity)
                && query.direction().is_descending()
                && query.page().map(|page| (page.number(), page.size())) == Some((1, 20))
        })
        .times(1)
        .returning(|query| Ok(PagedResult::empty(query.page())));
    let service = mock_service(repo);
    let params = ListParams {
        sort_by: Some(WidgetField::Quantity),
        sort_descending: true,
        page_number: None,
        page_size: Some(20),
    };

    let page = service.list(params).await.expect("listing");

    assert_eq!(page.total_count, 0);
}

#[rstest]
#[tokio::test]
async fn dependency_failures_become_internal_errors() {
    let mut repo = MockRepository::<Widget>::new();
    repo.expect_add()
        .times(1)
        .returning(|_| Err(RepositoryError::dependency("disk full")));
    let service = mock_service(repo);

    let error = service
        .create(Widget::new("Widget"))
        .await
        .expect_err("backend down");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.message().contains("disk full"));
}
