//! Optimistic overlay of in-flight status moves.
//!
//! The store only ever holds confirmed state. While a transition request is in
//! flight the board shows the task in its target column by consulting this
//! overlay. Settling a move (success or failure) removes the entry; on failure
//! that alone restores the task's prior column.

use std::collections::HashMap;

use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// Identifies one optimistic move so a late settle cannot clear a newer one.
pub type MoveTicket = u64;

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    to: TaskStatus,
    ticket: MoveTicket,
}

/// In-flight moves keyed by task.
#[derive(Debug, Default)]
pub struct PendingMoves {
    moves: HashMap<TaskId, PendingMove>,
    next_ticket: MoveTicket,
}

impl PendingMoves {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `id` is moving to `to`, replacing any earlier move.
    pub fn insert(&mut self, id: TaskId, to: TaskStatus) -> MoveTicket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.moves.insert(id, PendingMove { to, ticket });
        ticket
    }

    /// Drops the move for `id` if it is still the one `ticket` names.
    ///
    /// Returns whether an entry was removed.
    pub fn settle(&mut self, id: TaskId, ticket: MoveTicket) -> bool {
        match self.moves.get(&id) {
            Some(m) if m.ticket == ticket => {
                self.moves.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Status the board should show for `task`: the pending target if any,
    /// else the server-reported status.
    #[must_use]
    pub fn effective_status(&self, task: &Task) -> Option<TaskStatus> {
        self.moves
            .get(&task.id)
            .map(|m| m.to)
            .or_else(|| task.status())
    }

    /// Whether `id` has a move in flight.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.moves.contains_key(&id)
    }

    /// Number of moves in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
