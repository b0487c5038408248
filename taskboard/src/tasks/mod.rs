//! Local validation for new tasks.
//!
//! The create form builds a [`TaskDraft`] as the user types; only a draft that
//! passes [`TaskDraft::validate`] is turned into a request body.

use taskboard_proto::api::NewTask;
use taskboard_proto::task::{MAX_TASK_TITLE_LENGTH, Priority};
use thiserror::Error;

/// Errors that can occur while validating a new task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task title is empty or only whitespace.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the maximum length.
    #[error("task title too long (max 200 characters)")]
    TitleTooLong,
}

/// The create-form field receiving keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DraftField {
    /// Task title.
    #[default]
    Title,
    /// Optional description.
    Description,
    /// Priority selector.
    Priority,
}

impl DraftField {
    const ORDER: [Self; 3] = [Self::Title, Self::Description, Self::Priority];

    const fn position(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Description => 1,
            Self::Priority => 2,
        }
    }
}

/// A task being composed in the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title as typed.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Chosen priority.
    pub priority: Priority,
    /// Field that typed characters go to.
    pub field: DraftField,
}

impl TaskDraft {
    /// Creates an empty draft with medium priority.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the priority: low → medium → high → low.
    pub const fn cycle_priority(&mut self) {
        self.priority = self.priority.cycle();
    }

    /// Moves to the next field, wrapping from priority back to title.
    pub const fn focus_next(&mut self) {
        self.field = DraftField::ORDER[(self.field.position() + 1) % DraftField::ORDER.len()];
    }

    /// Moves to the previous field.
    pub const fn focus_prev(&mut self) {
        let len = DraftField::ORDER.len();
        self.field = DraftField::ORDER[(self.field.position() + len - 1) % len];
    }

    /// Types `c` into the focused field. On the priority field a space
    /// cycles the priority and other characters are ignored.
    pub fn push(&mut self, c: char) {
        match self.field {
            DraftField::Title => self.title.push(c),
            DraftField::Description => self.description.get_or_insert_with(String::new).push(c),
            DraftField::Priority if c == ' ' => self.cycle_priority(),
            DraftField::Priority => {}
        }
    }

    /// Deletes the last character of the focused text field.
    pub fn pop(&mut self) {
        match self.field {
            DraftField::Title => {
                self.title.pop();
            }
            DraftField::Description => {
                if let Some(description) = &mut self.description {
                    description.pop();
                }
            }
            DraftField::Priority => {}
        }
    }

    /// Checks the title and returns it trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TitleEmpty`] if the trimmed title is empty, or
    /// [`TaskError::TitleTooLong`] if it exceeds 200 characters.
    pub fn validate(&self) -> Result<&str, TaskError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskError::TitleEmpty);
        }
        if title.chars().count() > MAX_TASK_TITLE_LENGTH {
            return Err(TaskError::TitleTooLong);
        }
        Ok(title)
    }

    /// Builds the `POST /api/tasks` body. New tasks always start pending.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the draft is not submittable.
    pub fn to_new_task(&self) -> Result<NewTask, TaskError> {
        let title = self.validate()?.to_string();
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(NewTask::new(title, description, self.priority))
    }
}
