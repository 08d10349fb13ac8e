use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::util::dates;

/// Task and subtask identifiers are creation-time derived (epoch millis).
pub type TaskId = u64;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: High sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(format!(
                "unknown priority '{}' (expected: high, medium, low)",
                s
            )),
        }
    }
}

/// A nested unit of work owned by exactly one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A task as persisted in the store.
///
/// Field names follow the stored layout (`dueDate`, `createdAt`, ...). Optional
/// collections default to empty so blobs written by older iterations still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub description: Option<String>,
    #[serde(default, with = "dates::due_date")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: IndexSet<String>,
    #[serde(default)]
    pub collaborators: IndexSet<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Absent until the first update
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(id: TaskId, text: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            text,
            description: None,
            due_date: None,
            priority: Priority::default(),
            tags: IndexSet::new(),
            collaborators: IndexSet::new(),
            completed: false,
            created_at,
            updated_at: None,
            subtasks: Vec::new(),
        }
    }

    pub fn find_subtask(&self, subtask_id: TaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

/// Next free id: the current epoch-millis timestamp, bumped past every id
/// already in use so two creations in the same millisecond never collide.
pub fn next_id(existing: impl IntoIterator<Item = TaskId>, now: DateTime<Utc>) -> TaskId {
    let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    match existing.into_iter().max() {
        Some(max) if max >= stamp => max + 1,
        _ => stamp,
    }
}

/// Normalize a list of labels into an ordered set: trimmed, blanks dropped,
/// first occurrence wins.
pub fn label_set<I, S>(labels: I) -> IndexSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|l| l.as_ref().trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
