//! In-process collaborator for tests and offline demos.
//!
//! Holds the task list behind a mutex and behaves like the HTTP collaborator:
//! ids are assigned on create, status updates touch only the named task, and
//! failures can be injected per endpoint to exercise rollback paths.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use taskboard_proto::api::NewTask;
use taskboard_proto::task::{ReportedStatus, Task, TaskId, TaskStatus};

use super::{ApiError, TaskApi};

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<Task>,
    next_id: i64,
    list_failure: Option<ApiError>,
    status_failure: Option<ApiError>,
}

/// Task collaborator that lives entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryTaskApi {
    state: Mutex<MemoryState>,
    list_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl InMemoryTaskApi {
    /// Creates an empty collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collaborator seeded with `tasks`, in that order.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0);
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                next_id,
                ..MemoryState::default()
            }),
            ..Self::default()
        }
    }

    /// Makes every subsequent `list_tasks` call fail with `error` (`None` clears it).
    pub fn fail_lists(&self, error: Option<ApiError>) {
        self.state.lock().list_failure = error;
    }

    /// Makes every subsequent `update_status` call fail with `error` (`None` clears it).
    pub fn fail_status_updates(&self, error: Option<ApiError>) {
        self.state.lock().status_failure = error;
    }

    /// Number of `list_tasks` calls received so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `update_status` calls received so far.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Copy of the collaborator's current task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }
}

impl TaskApi for InMemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if let Some(err) = &state.list_failure {
            return Err(err.clone());
        }
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, body: &NewTask) -> Result<Task, ApiError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let now = Utc::now().naive_utc();
        let task = Task {
            id: TaskId::new(state.next_id),
            title: body.title.clone(),
            description: body.description.clone(),
            status: ReportedStatus::Known(body.status),
            priority: body.priority,
            category_id: None,
            due_date: None,
            created_at: now,
            updated_at: Some(now),
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if let Some(err) = &state.status_failure {
            return Err(err.clone());
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::Rejected { status: 404 })?;
        task.status = ReportedStatus::Known(status);
        task.updated_at = Some(Utc::now().naive_utc());
        Ok(task.clone())
    }
}

/// A medium-priority task titled `task {id}`, for unit tests.
#[cfg(test)]
pub(crate) fn sample_task(id: i64, status: impl Into<ReportedStatus>) -> Task {
    Task {
        id: TaskId::new(id),
        title: format!("task {id}"),
        description: None,
        status: status.into(),
        priority: taskboard_proto::task::Priority::Medium,
        category_id: None,
        due_date: None,
        created_at: chrono::NaiveDateTime::default(),
        updated_at: None,
    }
}
