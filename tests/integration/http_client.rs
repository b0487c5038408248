//! Integration tests for the HTTP collaborator client.
//!
//! These tests validate:
//! - `GET /api/tasks` decodes the task list in server order
//! - `POST /api/tasks` sends a pending task and returns the stored one
//! - `PATCH /api/tasks/{id}/status` sends the wire spelling of the status
//! - Non-2xx answers become `Rejected` with the generic "failed" message
//! - Undecodable bodies and unreachable servers map to their own errors
//! - A base URL with a path prefix is honored

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[path = "../support/fake_api.rs"]
mod fake_api;

use std::sync::Arc;

use axum::http::StatusCode;
use taskboard::api::http::HttpTaskApi;
use taskboard::api::{ApiError, TaskApi};
use taskboard_proto::api::NewTask;
use taskboard_proto::task::{Priority, ReportedStatus, TaskId, TaskStatus};

use fake_api::{FakeApi, start_fake_api, start_fake_api_at, task};

async fn client_for(fake: &Arc<FakeApi>) -> HttpTaskApi {
    let (url, _handle) = start_fake_api(Arc::clone(fake)).await;
    HttpTaskApi::new(&url).expect("valid url")
}

// =============================================================================
// Happy paths
// =============================================================================

#[tokio::test]
async fn list_returns_tasks_in_server_order() {
    let fake = FakeApi::new(vec![
        task(5, "Fifth", "completed"),
        task(2, "Second", "todo"),
        task(9, "Ninth", "in_progress"),
    ]);
    let api = client_for(&fake).await;

    let tasks = api.list_tasks().await.unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id.get()).collect();
    assert_eq!(ids, vec![5, 2, 9]);
    assert_eq!(tasks[0].status(), Some(TaskStatus::Done));
    assert_eq!(tasks[2].status(), Some(TaskStatus::InProgress));
    assert_eq!(fake.list_calls(), 1);
}

#[tokio::test]
async fn list_preserves_unknown_status_strings() {
    let fake = FakeApi::new(vec![task(1, "Odd", "blocked")]);
    let api = client_for(&fake).await;

    let tasks = api.list_tasks().await.unwrap();
    assert_eq!(tasks[0].status, ReportedStatus::Unknown("blocked".into()));
    assert_eq!(tasks[0].status(), None);
}

#[tokio::test]
async fn create_posts_pending_task() {
    let fake = FakeApi::new(vec![task(1, "Existing", "todo")]);
    let api = client_for(&fake).await;

    let body = NewTask::new(
        "Draft roadmap".to_string(),
        Some("Q3 items".to_string()),
        Priority::High,
    );
    let created = api.create_task(&body).await.unwrap();

    assert_eq!(created.id, TaskId::new(2));
    assert_eq!(created.title, "Draft roadmap");
    assert_eq!(created.description.as_deref(), Some("Q3 items"));
    assert_eq!(created.priority, Priority::High);
    assert_eq!(created.status(), Some(TaskStatus::Pending));
    assert_eq!(fake.tasks().len(), 2);
}

#[tokio::test]
async fn update_status_changes_server_state() {
    let fake = FakeApi::new(vec![task(7, "Review PR", "todo")]);
    let api = client_for(&fake).await;

    let updated = api
        .update_status(TaskId::new(7), TaskStatus::Done)
        .await
        .unwrap();

    assert_eq!(updated.status(), Some(TaskStatus::Done));
    assert_eq!(
        fake.status_of(7),
        Some(ReportedStatus::Known(TaskStatus::Done))
    );
    assert_eq!(fake.status_calls(), 1);
}

#[tokio::test]
async fn prefixed_base_url_reaches_nested_api() {
    let fake = FakeApi::new(vec![task(1, "Behind proxy", "todo")]);
    let (url, _handle) = start_fake_api_at(Arc::clone(&fake), "/backend").await;
    assert!(url.ends_with("/backend"));

    let api = HttpTaskApi::new(&url).unwrap();
    let tasks = api.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);

    api.update_status(TaskId::new(1), TaskStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(
        fake.status_of(1),
        Some(ReportedStatus::Known(TaskStatus::InProgress))
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn server_error_is_rejected_with_generic_message() {
    let fake = FakeApi::new(vec![task(7, "Review PR", "todo")]);
    fake.fail_status_updates(Some(StatusCode::INTERNAL_SERVER_ERROR));
    let api = client_for(&fake).await;

    let err = api
        .update_status(TaskId::new(7), TaskStatus::InProgress)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Rejected { status: 500 });
    assert_eq!(err.to_string(), "failed");
    assert_eq!(
        fake.status_of(7),
        Some(ReportedStatus::Known(TaskStatus::Pending))
    );
}

#[tokio::test]
async fn unknown_task_is_rejected_with_404() {
    let fake = FakeApi::new(Vec::new());
    let api = client_for(&fake).await;

    let err = api
        .update_status(TaskId::new(42), TaskStatus::Done)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected { status: 404 });
}

#[tokio::test]
async fn failed_list_is_rejected() {
    let fake = FakeApi::new(vec![task(1, "a", "todo")]);
    fake.fail_lists(Some(StatusCode::SERVICE_UNAVAILABLE));
    let api = client_for(&fake).await;

    let err = api.list_tasks().await.unwrap_err();
    assert_eq!(err, ApiError::Rejected { status: 503 });
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let fake = FakeApi::new(Vec::new());
    fake.serve_garbage_lists(true);
    let api = client_for(&fake).await;

    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTaskApi::new(&format!("http://{addr}")).unwrap();
    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}

#[test]
fn invalid_base_url_is_refused() {
    let err = HttpTaskApi::new("not a url").unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));

    let err = HttpTaskApi::new("mailto:ops@example.com").unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
}
