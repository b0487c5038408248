//! Task model as carried by the taskboard HTTP collaborator.
//!
//! The collaborator spells statuses `todo` / `in_progress` / `completed`.
//! Decoding also accepts `pending` and `done`. A status string outside that
//! set is kept verbatim in [`ReportedStatus::Unknown`] instead of failing the
//! whole list, so one bad row never hides the rest of the board.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum task title length accepted by the collaborator, in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 200;

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw identifier returned by the server.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a task, which is also its board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    #[serde(rename = "todo", alias = "pending")]
    Pending,
    /// Actively being worked on.
    #[serde(rename = "in_progress")]
    InProgress,
    /// Finished.
    #[serde(rename = "completed", alias = "done")]
    Done,
}

impl TaskStatus {
    /// All statuses in board order (left to right).
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Done];

    /// The collaborator's spelling of this status.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "completed",
        }
    }

    /// Human-readable column title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Position of this status' column on the board.
    #[must_use]
    pub const fn column_index(self) -> usize {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Parses a wire string, accepting the aliases `pending` and `done`.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "todo" | "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Status of the column to the left, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::Pending => None,
            Self::InProgress => Some(Self::Pending),
            Self::Done => Some(Self::InProgress),
        }
    }

    /// Status of the column to the right, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Done),
            Self::Done => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A status as the server reported it.
///
/// Known statuses serialize with their canonical spelling, so the aliases
/// `pending` and `done` are written back as `todo` and `completed`. Unknown
/// strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedStatus {
    /// One of the three board statuses.
    Known(TaskStatus),
    /// Anything else; a data-integrity anomaly on the server side.
    Unknown(String),
}

impl ReportedStatus {
    /// Returns the board status, or `None` for an unknown string.
    #[must_use]
    pub const fn known(&self) -> Option<TaskStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unknown(_) => None,
        }
    }
}

impl From<TaskStatus> for ReportedStatus {
    fn from(status: TaskStatus) -> Self {
        Self::Known(status)
    }
}

impl fmt::Display for ReportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(status) => status.fmt(f),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Task priority. Changed by editing, never by dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (server default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Cycles low → medium → high → low.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// One unit of work as returned by `GET /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Column membership key.
    pub status: ReportedStatus,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Category, if the task is categorized. Not interpreted by the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Optional deadline.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_timestamp")]
    pub due_date: Option<NaiveDateTime>,
    /// Creation time.
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    /// Last server-side modification time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Task {
    /// The task's board status, or `None` if the server sent an unknown one.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status.known()
    }
}

/// Timestamp format written back to the wire.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses either a naive ISO-8601 timestamp or an RFC 3339 one (normalized to UTC).
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| raw.parse::<NaiveDateTime>())
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(super::TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

mod opt_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => s.collect_str(&ts.format(super::TIMESTAMP_FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| super::parse_timestamp(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
