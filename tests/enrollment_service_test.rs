use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use timetable::config::AppConfig;
use timetable::db::{BlobStore, MemoryBlobStore};
use timetable::error::AppError;
use timetable::ids::IdGenerator;
use timetable::models::EnrollmentDraft;
use timetable::repository::ENROLLMENTS_KEY;
use timetable::services::{EnrollmentService, Field};
use timetable::state::AppState;

struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("e{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

async fn setup(blob: Arc<MemoryBlobStore>) -> EnrollmentService {
    let ids = Arc::new(SequentialIds(AtomicUsize::new(0)));
    let state = AppState::with_ids(blob, ids, &AppConfig::default()).await;
    EnrollmentService::new(state)
}

fn class(code: &str, day: &str, start: &str, end: &str) -> EnrollmentDraft {
    EnrollmentDraft {
        name: "Maya Chen".to_string(),
        email: "maya@university.edu".to_string(),
        major: "Biology".to_string(),
        year: "2".to_string(),
        course_code: code.to_string(),
        day: day.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        location: "Hall B".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_add_persists_and_reloads() {
    let blob = Arc::new(MemoryBlobStore::new());
    let service = setup(blob.clone()).await;

    let saved = service.add(&class("BIO110", "Mon", "09:00", "10:00")).await.expect("add");
    assert_eq!(saved.enrollment.id, "e1");
    assert!(saved.conflict_warning.is_none());

    let raw = blob.get(ENROLLMENTS_KEY).await.expect("get").expect("blob written");
    assert!(raw.contains("\"courseCode\":\"BIO110\""));

    let reopened = setup(blob).await;
    let records = reopened.list().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].course_code, "BIO110");
}

#[tokio::test]
async fn test_overlap_is_saved_with_warning() {
    let service = setup(Arc::new(MemoryBlobStore::new())).await;
    service.add(&class("BIO110", "Mon", "09:00", "10:00")).await.expect("first");

    let saved = service
        .add(&class("CHEM120", "Mon", "09:30", "10:30"))
        .await
        .expect("overlap still saves");
    assert!(saved.conflict_warning.is_some());
    assert_eq!(service.list().await.len(), 2);

    let adjoining = service
        .add(&class("MATH130", "Mon", "10:30", "11:30"))
        .await
        .expect("adjoining");
    assert!(adjoining.conflict_warning.is_none());

    let view = service.week_view().await;
    let flagged: Vec<&str> = view
        .blocks
        .iter()
        .filter(|b| b.conflicted)
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(flagged, vec!["e1", "e2"]);
    assert_eq!(view.hour_marks.first(), Some(&8));
    assert_eq!(view.hour_marks.last(), Some(&22));
    assert_eq!(view.grid_height, 840.0);
}

#[tokio::test]
async fn test_blocking_errors_prevent_commit() {
    let service = setup(Arc::new(MemoryBlobStore::new())).await;
    let draft = EnrollmentDraft {
        location: "Hall B".to_string(),
        ..class("", "", "", "")
    };

    let err = service.add(&draft).await.expect_err("should be rejected");
    match err {
        AppError::Invalid(report) => {
            assert!(report.field_errors.contains_key(&Field::Day));
            assert!(report.field_errors.contains_key(&Field::Start));
            assert!(report.field_errors.contains_key(&Field::End));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(service.list().await.is_empty());
}

#[tokio::test]
async fn test_replace_ignores_itself_and_keeps_created_at() {
    let service = setup(Arc::new(MemoryBlobStore::new())).await;
    let first = service.add(&class("BIO110", "Tue", "13:00", "14:00")).await.expect("add");

    let saved = service
        .replace("e1", &class("BIO110", "Tue", "13:30", "14:30"))
        .await
        .expect("replace");
    assert!(saved.conflict_warning.is_none());
    assert_eq!(saved.enrollment.created_at, first.enrollment.created_at);
    assert_eq!(saved.enrollment.start.map(|t| t.to_string()).as_deref(), Some("13:30"));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let service = setup(Arc::new(MemoryBlobStore::new())).await;
    assert!(matches!(service.remove("missing").await, Err(AppError::NotFound)));
    assert!(matches!(
        service.replace("missing", &class("X", "Mon", "09:00", "10:00")).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(service.get("missing").await, Err(AppError::NotFound)));
}

struct RepeatingIds;

impl IdGenerator for RepeatingIds {
    fn next_id(&self) -> String {
        "same-id".to_string()
    }
}

#[tokio::test]
async fn test_repeated_id_is_rejected_and_list_unchanged() {
    let blob = Arc::new(MemoryBlobStore::new());
    let state =
        AppState::with_ids(blob.clone(), Arc::new(RepeatingIds), &AppConfig::default()).await;
    let service = EnrollmentService::new(state);

    service.add(&class("A", "Wed", "09:00", "10:00")).await.expect("first add");
    let before = blob.get(ENROLLMENTS_KEY).await.expect("get");

    let err = service
        .add(&class("B", "Thu", "09:00", "10:00"))
        .await
        .expect_err("repeated id");
    assert!(matches!(err, AppError::Conflict(_)));

    let records = service.list().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].course_code, "A");
    assert_eq!(blob.get(ENROLLMENTS_KEY).await.expect("get"), before);
}

#[tokio::test]
async fn test_corrupted_blob_starts_empty_and_recovers() {
    let blob = Arc::new(MemoryBlobStore::with_entry(ENROLLMENTS_KEY, "{{not json"));
    let service = setup(blob.clone()).await;
    assert!(service.list().await.is_empty());

    service.add(&class("A", "Fri", "09:00", "10:00")).await.expect("add");
    let reopened = setup(blob).await;
    assert_eq!(reopened.list().await.len(), 1);
}

#[tokio::test]
async fn test_layout_and_conflict_queries() {
    let service = setup(Arc::new(MemoryBlobStore::new())).await;
    let saved = service.add(&class("A", "Wed", "09:30", "10:15")).await.expect("add");

    let placement = service.layout(&saved.enrollment).expect("drawable");
    assert_eq!(placement.top, 90.0);
    assert_eq!(placement.height, 45.0);

    let probe = class("B", "Wed", "10:00", "11:00");
    assert!(service.conflicts(&probe, None).await);
    assert!(!service.conflicts(&saved.enrollment, Some("e1")).await);
}
