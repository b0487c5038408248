//! Dashboard summary over the same task snapshot the board uses.

use taskboard_proto::task::{Task, TaskStatus};

/// Task counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Every task in the snapshot, including ones with unknown statuses.
    pub total: usize,
    /// Tasks not started.
    pub todo: usize,
    /// Tasks being worked on.
    pub in_progress: usize,
    /// Finished tasks.
    pub completed: usize,
    /// Tasks with a status the board has no column for.
    pub hidden: usize,
}

impl DashboardStats {
    /// Counts `tasks` by their server-reported status.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Self {
                total: tasks.len(),
                ..Self::default()
            },
            |mut stats, task| {
                match task.status() {
                    Some(TaskStatus::Pending) => stats.todo += 1,
                    Some(TaskStatus::InProgress) => stats.in_progress += 1,
                    Some(TaskStatus::Done) => stats.completed += 1,
                    None => stats.hidden += 1,
                }
                stats
            },
        )
    }
}

/// The first `limit` tasks in server order.
#[must_use]
pub fn recent(tasks: &[Task], limit: usize) -> &[Task] {
    &tasks[..tasks.len().min(limit)]
}
