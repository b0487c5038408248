//! Transition applier: the only path by which a drag changes persisted state.
//!
//! A transition is validated against the store, persisted with one
//! `PATCH /api/tasks/{id}/status`, and on success the store is invalidated and
//! refetched wholesale. On failure the store is not touched.

use std::sync::Arc;

use taskboard_proto::task::{Task, TaskId};

use super::drag::IntendedTransition;
use crate::api::{ApiError, TaskApi};
use crate::store::TaskStore;

/// Errors from applying a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The task is not in the store's current snapshot.
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),

    /// The collaborator did not accept the status change.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What a successful apply did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task was already in the target column; nothing was sent.
    Unchanged,
    /// The collaborator confirmed the change; carries the task it returned.
    Applied(Task),
}

/// Result of one apply, as reported back to the UI.
pub type TransitionResult = Result<TransitionOutcome, TransitionError>;

/// Reduces a transition result to the boolean success signal.
#[must_use]
pub const fn succeeded(result: &TransitionResult) -> bool {
    result.is_ok()
}

/// Executes intended transitions against a collaborator and a store.
#[derive(Debug)]
pub struct TransitionApplier<A> {
    api: Arc<A>,
    store: TaskStore,
}

impl<A> Clone for TransitionApplier<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            store: self.store.clone(),
        }
    }
}

impl<A: TaskApi> TransitionApplier<A> {
    /// Creates an applier writing through `api` and refreshing `store`.
    #[must_use]
    pub const fn new(api: Arc<A>, store: TaskStore) -> Self {
        Self { api, store }
    }

    /// The collaborator this applier writes through.
    #[must_use]
    pub fn api(&self) -> &A {
        self.api.as_ref()
    }

    /// The store this applier refreshes.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Applies `transition`.
    ///
    /// Dropping a task on the column it started in succeeds with
    /// [`TransitionOutcome::Unchanged`] and issues no request. A refresh that
    /// fails after a confirmed update is logged but does not fail the apply;
    /// the store stays stale, and [`App`](crate::app::App) asks for another
    /// refresh when the settle event reaches it.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::UnknownTask`] if the task is not in the store.
    /// - [`TransitionError::Api`] if the status update fails; the store is
    ///   left exactly as it was.
    pub async fn apply(&self, transition: IntendedTransition) -> TransitionResult {
        let IntendedTransition { task_id, from, to } = transition;
        if self.store.find(task_id).is_none() {
            tracing::warn!(task_id = %task_id, "transition for task not in store");
            return Err(TransitionError::UnknownTask(task_id));
        }
        if transition.is_noop() {
            tracing::debug!(task_id = %task_id, status = %to, "drop on origin column; nothing to do");
            return Ok(TransitionOutcome::Unchanged);
        }

        let confirmed = match self.api.update_status(task_id, to).await {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(
                    task_id = %task_id,
                    from = %from,
                    to = %to,
                    error = %e,
                    "status update failed"
                );
                return Err(e.into());
            }
        };
        tracing::info!(task_id = %task_id, from = %from, to = %to, "status updated");

        self.store.invalidate();
        if let Err(e) = self.store.refresh(self.api.as_ref()).await {
            tracing::warn!(task_id = %task_id, error = %e, "refresh after status update failed");
        }
        Ok(TransitionOutcome::Applied(confirmed))
    }
}
