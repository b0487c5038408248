//! JSON encode/decode for collaborator bodies.

use serde::Serialize;

use crate::api::TaskListResponse;
use crate::task::Task;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Encodes any request body as JSON bytes.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value cannot be serialized.
pub fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(body)?)
}

/// Decodes the body of `GET /api/tasks` into the task sequence, in server order.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the bytes are not a task list.
pub fn decode_task_list(bytes: &[u8]) -> Result<Vec<Task>, CodecError> {
    let list: TaskListResponse = serde_json::from_slice(bytes)?;
    Ok(list.tasks)
}

/// Decodes a single task (the body of a create or status update).
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the bytes are not a task.
pub fn decode_task(bytes: &[u8]) -> Result<Task, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
