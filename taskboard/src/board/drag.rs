//! Drag session controller.
//!
//! Owns the lifecycle of a single drag gesture: `Idle → Dragging → Idle`.
//! While dragging, every hover asks the injected [`CollisionStrategy`] which
//! column the pointer is over. Releasing over a column yields exactly one
//! [`IntendedTransition`]; the controller never touches the task store.

use taskboard_proto::task::{TaskId, TaskStatus};

use super::collision::{ClosestCorners, CollisionStrategy, DropTarget, Point};

/// Errors from the drag controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    /// A drag is already in progress; only one may be active at a time.
    #[error("already dragging task {0}")]
    SessionActive(TaskId),
}

/// The ephemeral state of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// Task being dragged.
    pub task_id: TaskId,
    /// Column the task was in when the drag started.
    pub origin: TaskStatus,
    /// Column the task would land in if released now.
    pub candidate: Option<TaskStatus>,
}

/// Controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A task is being dragged.
    Dragging(DragSession),
}

/// The status change a completed drop asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntendedTransition {
    /// Task to move.
    pub task_id: TaskId,
    /// Column the drag started from.
    pub from: TaskStatus,
    /// Column the task was dropped on.
    pub to: TaskStatus,
}

impl IntendedTransition {
    /// Whether the drop landed on the column the task started in.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Drives drag sessions using a pluggable collision strategy.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
    strategy: Box<dyn CollisionStrategy>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(Box::new(ClosestCorners))
    }
}

impl DragController {
    /// Creates an idle controller using `strategy` for hover detection.
    #[must_use]
    pub fn new(strategy: Box<dyn CollisionStrategy>) -> Self {
        Self {
            state: DragState::Idle,
            strategy,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// The active session, if dragging.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Starts dragging `task_id` out of `origin`.
    ///
    /// The candidate starts empty; it is only set by a hover.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::SessionActive`] if another drag is in progress.
    pub fn start(&mut self, task_id: TaskId, origin: TaskStatus) -> Result<(), DragError> {
        if let DragState::Dragging(active) = self.state {
            return Err(DragError::SessionActive(active.task_id));
        }
        tracing::trace!(task_id = %task_id, origin = %origin, "drag started");
        self.state = DragState::Dragging(DragSession {
            task_id,
            origin,
            candidate: None,
        });
        Ok(())
    }

    /// Updates the candidate from the pointer position. Ignored when idle.
    ///
    /// Returns the new candidate.
    pub fn hover(&mut self, pointer: Point, targets: &[DropTarget]) -> Option<TaskStatus> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.candidate = self.strategy.detect(pointer, targets);
        session.candidate
    }

    /// Sets the candidate column directly (keyboard drags). Ignored when idle.
    pub fn hover_column(&mut self, status: TaskStatus) {
        if let DragState::Dragging(session) = &mut self.state {
            session.candidate = Some(status);
        }
    }

    /// Clears the candidate, as when the pointer leaves every drop target.
    pub fn leave(&mut self) {
        if let DragState::Dragging(session) = &mut self.state {
            session.candidate = None;
        }
    }

    /// Ends the gesture and returns to `Idle`.
    ///
    /// Yields an intended transition only if a candidate column was recorded.
    pub fn release(&mut self) -> Option<IntendedTransition> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let Some(to) = session.candidate else {
            tracing::trace!(task_id = %session.task_id, "drag released outside any column");
            return None;
        };
        Some(IntendedTransition {
            task_id: session.task_id,
            from: session.origin,
            to,
        })
    }

    /// Discards the session without producing a transition.
    pub fn cancel(&mut self) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            tracing::trace!(task_id = %session.task_id, "drag cancelled");
        }
    }
}
