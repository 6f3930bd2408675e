//! Task data model

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::error::{Result, TaskError};

/// Description used when a task is created without one.
pub const DEFAULT_DESCRIPTION: &str = "Task to be done";

/// Task ID, a positive integer unique within one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn first() -> Self {
        Self(1)
    }

    /// The ID after this one, or `None` once the ID space is used up
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(0) => Err("task ID must be a positive integer".to_string()),
            Ok(n) => Ok(Self(n)),
            Err(_) => Err(format!("invalid task ID '{}'", s)),
        }
    }
}

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    /// Glyph shown in rendered task lines
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::Done => "✓",
        }
    }

    /// Get the text label, as stored in the task file
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown status '{}' (expected pending or done)", other)),
        }
    }
}

/// Task priority, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self> {
        Self::try_from(i64::from(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One star per priority point
    pub fn stars(self) -> String {
        "★".repeat(usize::from(self.0))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<i64> for Priority {
    type Error = TaskError;

    fn try_from(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TaskError::InvalidPriority(value))
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: TaskStatus,

    /// When the task was created, local time
    #[serde(default = "now")]
    pub created_at: NaiveDateTime,

    /// When the task was completed; only present while the task is done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(TaskError::InvalidTitle);
    }
    Ok(())
}

impl Task {
    /// Create a new pending task.
    ///
    /// Missing description and priority fall back to [`DEFAULT_DESCRIPTION`]
    /// and 5. Fails on a blank title or a priority outside 1..=10.
    pub fn create(
        id: TaskId,
        title: &str,
        description: Option<&str>,
        priority: Option<u8>,
    ) -> Result<Self> {
        validate_title(title)?;
        let priority = priority.map(Priority::new).transpose()?.unwrap_or_default();

        Ok(Self {
            id,
            title: title.to_string(),
            description: description.map_or_else(default_description, str::to_string),
            priority,
            status: TaskStatus::Pending,
            created_at: now(),
            completed_at: None,
        })
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Mark task as done, stamping the completion time
    pub fn complete(&mut self) {
        self.status = TaskStatus::Done;
        self.completed_at = Some(now());
    }

    /// Move task back to pending
    pub fn reopen(&mut self) {
        self.status = TaskStatus::Pending;
        self.completed_at = None;
    }

    /// Key-value form written to the task file
    pub fn to_record(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a task from its key-value form.
    ///
    /// Optional fields take their defaults. A record without `id` or `title`,
    /// or one whose fields break the task invariants, is rejected.
    pub fn from_record(record: Value) -> Result<Self> {
        let task: Task = serde_json::from_value(record)
            .map_err(|e| TaskError::MalformedRecord(e.to_string()))?;
        task.check_invariants()?;
        Ok(task)
    }

    fn check_invariants(&self) -> Result<()> {
        if self.id.value() == 0 {
            return Err(TaskError::MalformedRecord(
                "id must be a positive integer".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(TaskError::MalformedRecord(format!(
                "task {} has an empty title",
                self.id
            )));
        }
        match (self.status, self.completed_at) {
            (TaskStatus::Done, None) => Err(TaskError::MalformedRecord(format!(
                "task {} is done but has no completed_at",
                self.id
            ))),
            (TaskStatus::Pending, Some(_)) => Err(TaskError::MalformedRecord(format!(
                "task {} is pending but has completed_at",
                self.id
            ))),
            _ => Ok(()),
        }
    }

    /// Single display line: `[3] ○ Buy milk (★★★★★) - Task to be done`
    pub fn render(&self) -> String {
        format!(
            "[{}] {} {} ({}) - {}",
            self.id,
            self.status.glyph(),
            self.title,
            self.priority.stars(),
            self.description
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
