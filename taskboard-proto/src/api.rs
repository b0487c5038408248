//! Request and response bodies for the task endpoints.
//!
//! | Method  | Path                       | Body            | Response              |
//! |---------|----------------------------|-----------------|-----------------------|
//! | `GET`   | `/api/tasks`               | (none)          | [`TaskListResponse`]  |
//! | `POST`  | `/api/tasks`               | [`NewTask`]     | [`Task`]              |
//! | `PATCH` | `/api/tasks/{id}/status`   | [`StatusUpdate`]| [`Task`]              |

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskId, TaskStatus};

/// Collection path for tasks, relative to the collaborator's base URL.
pub const TASKS_PATH: &str = "api/tasks";

/// Path of the status sub-resource for one task.
#[must_use]
pub fn task_status_path(id: TaskId) -> String {
    format!("{TASKS_PATH}/{id}/status")
}

/// Body of `GET /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Tasks in server order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Number of tasks matching the query.
    #[serde(default)]
    pub total: usize,
}

impl TaskListResponse {
    /// Builds a response whose `total` matches the task count.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        let total = tasks.len();
        Self { tasks, total }
    }
}

/// Body of `POST /api/tasks`. New tasks always start pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority level.
    pub priority: Priority,
    /// Initial status; always [`TaskStatus::Pending`] when built via [`NewTask::new`].
    pub status: TaskStatus,
}

impl NewTask {
    /// Creates a pending task body.
    #[must_use]
    pub const fn new(title: String, description: Option<String>, priority: Priority) -> Self {
        Self {
            title,
            description,
            priority,
            status: TaskStatus::Pending,
        }
    }
}

/// Body of `PATCH /api/tasks/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Target status.
    pub status: TaskStatus,
}
