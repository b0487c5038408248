//! Collaborator abstraction for the remote task API.
//!
//! Defines the [`TaskApi`] trait the store and the transition applier talk to.
//! Implementations:
//! - [`http::HttpTaskApi`]: the real HTTP collaborator (`reqwest`)
//! - [`memory::InMemoryTaskApi`]: in-process collaborator for tests and demos

pub mod http;
pub mod memory;

use taskboard_proto::api::NewTask;
use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// Errors that can occur while talking to the collaborator.
///
/// Collaborator-side error bodies are never parsed; a rejected request only
/// carries its HTTP status code, and its message is the generic "failed".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the server or never returned.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("failed")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
    },

    /// The server answered 2xx but the body was not understood.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Async interface to the task collaborator.
///
/// All methods are single round trips with no retry; callers decide what a
/// failure means for the board.
pub trait TaskApi: Send + Sync {
    /// `GET /api/tasks`: every task, in server order.
    fn list_tasks(&self) -> impl std::future::Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// `POST /api/tasks`: creates a task and returns it as stored.
    fn create_task(
        &self,
        body: &NewTask,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// `PATCH /api/tasks/{id}/status`: changes one task's status.
    fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;
}
