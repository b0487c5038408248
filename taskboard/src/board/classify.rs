//! Column classification: partitioning tasks by status.
//!
//! Pure and infallible. Tasks whose status is not one of the three board
//! statuses are left out of every column and reported on the result.

use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// One board column: a status and its tasks in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    /// The status this column represents (also its drop-target identity).
    pub status: TaskStatus,
    /// Tasks in this column, in the order the server returned them.
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    /// Whether the column has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Result of classifying a task list into the three board columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Columns in board order: pending, in progress, done.
    pub columns: [Column<'a>; 3],
    /// Tasks excluded because their status is not a board status.
    pub rejected: Vec<TaskId>,
}

impl<'a> Classification<'a> {
    /// The column for `status`.
    #[must_use]
    pub const fn column(&self, status: TaskStatus) -> &Column<'a> {
        &self.columns[status.column_index()]
    }

    /// Which column currently shows task `id`, if any.
    #[must_use]
    pub fn column_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.columns
            .iter()
            .find(|col| col.tasks.iter().any(|t| t.id == id))
            .map(|col| col.status)
    }

    /// Total number of tasks placed in a column.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }
}

/// Classifies tasks by the status the server reported.
#[must_use]
pub fn classify(tasks: &[Task]) -> Classification<'_> {
    classify_by(tasks, Task::status)
}

/// Classifies tasks using `status_of` to decide each task's column.
///
/// `status_of` returning `None` drops the task from every column and lists it
/// in [`Classification::rejected`]. Runs on every frame, so it does not log;
/// the store warns about such tasks once per fetched snapshot.
pub fn classify_by<F>(tasks: &[Task], status_of: F) -> Classification<'_>
where
    F: Fn(&Task) -> Option<TaskStatus>,
{
    let mut columns = TaskStatus::ALL.map(|status| Column {
        status,
        tasks: Vec::new(),
    });
    let mut rejected = Vec::new();

    for task in tasks {
        if let Some(status) = status_of(task) {
            columns[status.column_index()].tasks.push(task);
        } else {
            rejected.push(task.id);
        }
    }

    Classification { columns, rejected }
}
