//! In-process stand-in for the task collaborator, served over real HTTP.
//!
//! Shared by the integration tests via `#[path]`. Implements the three
//! endpoints the board uses and records how often each one was hit.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::Json;
use chrono::NaiveDate;
use parking_lot::Mutex;
use taskboard_proto::api::{NewTask, StatusUpdate, TaskListResponse};
use taskboard_proto::task::{Priority, ReportedStatus, Task, TaskId, TaskStatus};
use tokio::net::TcpListener;

/// Builds a task whose status is given in wire spelling; unrecognized
/// strings stay unknown.
pub fn task(id: i64, title: &str, status: &str) -> Task {
    let created_at = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(id);
    Task {
        id: TaskId::new(id),
        title: title.to_string(),
        description: None,
        status: TaskStatus::from_wire(status)
            .map_or_else(|| ReportedStatus::Unknown(status.to_string()), ReportedStatus::Known),
        priority: Priority::Medium,
        category_id: None,
        due_date: None,
        created_at,
        updated_at: None,
    }
}

/// Shared state behind the fake collaborator.
#[derive(Debug, Default)]
pub struct FakeApi {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicI64,
    fail_lists: Mutex<Option<StatusCode>>,
    fail_status: Mutex<Option<StatusCode>>,
    garbage_lists: Mutex<bool>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new(tasks: Vec<Task>) -> Arc<Self> {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Arc::new(Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicI64::new(next_id),
            ..Self::default()
        })
    }

    /// Answers every `GET /api/tasks` with `code` until cleared.
    pub fn fail_lists(&self, code: Option<StatusCode>) {
        *self.fail_lists.lock() = code;
    }

    /// Answers every status update with `code` until cleared.
    pub fn fail_status_updates(&self, code: Option<StatusCode>) {
        *self.fail_status.lock() = code;
    }

    /// Answers `GET /api/tasks` with a 200 whose body is not JSON.
    pub fn serve_garbage_lists(&self, on: bool) {
        *self.garbage_lists.lock() = on;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Server-side task list.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    pub fn status_of(&self, id: i64) -> Option<ReportedStatus> {
        self.tasks
            .lock()
            .iter()
            .find(|t| t.id.get() == id)
            .map(|t| t.status.clone())
    }
}

fn error_body(code: StatusCode) -> Response {
    (code, r#"{"detail":"simulated failure"}"#).into_response()
}

async fn list_tasks(State(api): State<Arc<FakeApi>>) -> Response {
    api.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(code) = *api.fail_lists.lock() {
        return error_body(code);
    }
    if *api.garbage_lists.lock() {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    Json(TaskListResponse::new(api.tasks())).into_response()
}

async fn create_task(State(api): State<Arc<FakeApi>>, Json(body): Json<NewTask>) -> Response {
    api.create_calls.fetch_add(1, Ordering::SeqCst);
    let id = api.next_id.fetch_add(1, Ordering::SeqCst);
    let mut created = task(id, &body.title, body.status.as_wire());
    created.description = body.description;
    created.priority = body.priority;
    api.tasks.lock().push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_status(
    State(api): State<Arc<FakeApi>>,
    Path(id): Path<i64>,
    Json(body): Json<StatusUpdate>,
) -> Response {
    api.status_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(code) = *api.fail_status.lock() {
        return error_body(code);
    }
    let mut tasks = api.tasks.lock();
    match tasks.iter_mut().find(|t| t.id.get() == id) {
        Some(task) => {
            task.status = ReportedStatus::Known(body.status);
            Json(task.clone()).into_response()
        }
        None => error_body(StatusCode::NOT_FOUND),
    }
}

fn routes(api: Arc<FakeApi>) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}/status", patch(update_status))
        .with_state(api)
}

/// Serves `api` on an ephemeral port under `prefix` (empty for the root).
///
/// Returns the base URL to hand to the HTTP client.
pub async fn start_fake_api_at(
    api: Arc<FakeApi>,
    prefix: &str,
) -> (String, tokio::task::JoinHandle<()>) {
    let app = if prefix.is_empty() {
        routes(api)
    } else {
        Router::new().nest(prefix, routes(api))
    };

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake api");
    let addr: SocketAddr = listener.local_addr().expect("no local addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake api crashed");
    });

    (format!("http://{addr}{prefix}"), handle)
}

/// Serves `api` at the root of an ephemeral port.
pub async fn start_fake_api(api: Arc<FakeApi>) -> (String, tokio::task::JoinHandle<()>) {
    start_fake_api_at(api, "").await
}
