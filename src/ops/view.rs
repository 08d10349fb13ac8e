use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Completion filter for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "pending" => Ok(Filter::Pending),
            "completed" | "done" => Ok(Filter::Completed),
            _ => Err(format!(
                "unknown filter '{}' (expected: all, pending, completed)",
                s
            )),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Pending => write!(f, "pending"),
            Filter::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DueDate,
    Priority,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dueDate" | "due-date" | "due" => Ok(SortKey::DueDate),
            "priority" => Ok(SortKey::Priority),
            _ => Err(format!(
                "unknown sort key '{}' (expected: due-date, priority)",
                s
            )),
        }
    }
}

/// Everything that shapes the visible task list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub search: String,
}

/// Filter, search and sort `tasks` without touching the input.
///
/// Search is a case-insensitive substring match over text and description and
/// is skipped when the term is blank. Sorting is stable: due dates ascending
/// with undated tasks first, or priority High, Medium, Low.
pub fn derive_view<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let needle = if query.search.trim().is_empty() {
        None
    } else {
        Some(query.search.to_lowercase())
    };

    let mut view: Vec<&Task> = tasks
        .iter()
        .filter(|t| query.filter.matches(t))
        .filter(|t| needle.as_deref().is_none_or(|n| matches_search(t, n)))
        .collect();

    match query.sort {
        Some(SortKey::DueDate) => view.sort_by_key(|t| t.due_date),
        Some(SortKey::Priority) => view.sort_by_key(|t| t.priority.rank()),
        None => {}
    }
    view
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.text.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Completion percentage: subtask ratio when there are subtasks, otherwise
/// 0 or 100 from the task's own flag.
pub fn progress(task: &Task) -> u8 {
    let total = task.subtasks.len();
    if total == 0 {
        return if task.completed { 100 } else { 0 };
    }
    let done = task.completed_subtasks();
    ((done as f64 / total as f64) * 100.0).round() as u8
}
