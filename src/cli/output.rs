use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::theme::{Palette, Role};
use crate::model::activity::ActivityEntry;
use crate::model::task::Task;
use crate::ops::reminder::{Countdown, countdown};
use crate::ops::stats::Stats;
use crate::ops::view::{ViewQuery, progress};
use crate::util::dates::format_local;
use crate::util::text::fit_to_width;

/// Width of the text column in task listings
const TEXT_WIDTH: usize = 36;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub progress: u8,
}

#[derive(Serialize)]
pub struct TaskDetailJson<'a> {
    #[serde(flatten)]
    pub task: TaskJson<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
}

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub query: &'a ViewQuery,
    pub tasks: Vec<TaskJson<'a>>,
}

#[derive(Serialize)]
pub struct ReminderJson<'a> {
    pub task: Option<TaskJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
}

#[derive(Serialize)]
pub struct DispatchJson<'a> {
    pub action: &'a str,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<&'a ActivityEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskJson<'a>>,
    /// Active reminder after the change, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<ReminderJson<'a>>,
}

pub fn task_to_json(task: &Task) -> TaskJson<'_> {
    TaskJson {
        task,
        progress: progress(task),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn labels(task: &Task) -> String {
    task.tags
        .iter()
        .map(|t| format!("#{}", t))
        .chain(task.collaborators.iter().map(|c| format!("@{}", c)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary: checkbox, id, text, priority, due date, progress, labels
pub fn format_task_line(task: &Task, now: DateTime<Utc>, palette: &Palette) -> String {
    let check = if task.completed {
        palette.paint(checkbox(true), Role::Done)
    } else {
        checkbox(false).to_string()
    };
    let priority = palette.paint(
        &format!("{:<6}", task.priority.to_string()),
        Role::Priority(task.priority),
    );
    let due = match task.due_date {
        Some(due) => {
            let text = format!("{:<16}", format_local(due));
            if !task.completed && due < now {
                palette.paint(&text, Role::Overdue)
            } else {
                text
            }
        }
        None => palette.paint(&format!("{:<16}", "-"), Role::Dim),
    };
    let mut line = format!(
        "{} {}  {}  {}  {}  {:>3}%",
        check,
        task.id,
        fit_to_width(&task.text, TEXT_WIDTH),
        priority,
        due,
        progress(task)
    );
    let labels = labels(task);
    if !labels.is_empty() {
        line.push_str("  ");
        line.push_str(&palette.paint(&labels, Role::Label));
    }
    line
}

/// Task list with a header describing the active query
pub fn format_task_list(
    tasks: &[&Task],
    query: &ViewQuery,
    now: DateTime<Utc>,
    palette: &Palette,
) -> Vec<String> {
    let mut header = format!("== Tasks ({}) ==", query.filter);
    if let Some(sort) = query.sort {
        header.push_str(&format!(" sorted by {:?}", sort).to_lowercase());
    }
    if !query.search.trim().is_empty() {
        header.push_str(&format!(" matching \"{}\"", query.search));
    }
    let mut lines = vec![palette.paint(&header, Role::Heading)];
    if tasks.is_empty() {
        lines.push(palette.paint("(no tasks)", Role::Dim));
    }
    for task in tasks {
        lines.push(format_task_line(task, now, palette));
    }
    lines
}

/// Detailed task view, with time remaining when there is a due date
pub fn format_task_detail(task: &Task, now: DateTime<Utc>, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.paint(
        &format!("{} {}", checkbox(task.completed), task.text),
        Role::Heading,
    )];
    lines.push(format!("id: {}", task.id));
    lines.push(format!("priority: {}", task.priority));
    if let Some(description) = &task.description {
        lines.push("description:".to_string());
        for line in description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    if let Some(due) = task.due_date {
        lines.push(format!("due: {}", format_local(due)));
        lines.push(format!("time remaining: {}", countdown(due, now)));
    }
    if !task.tags.is_empty() {
        let tags: Vec<_> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(format!("tags: {}", tags.join(" ")));
    }
    if !task.collaborators.is_empty() {
        let names: Vec<_> = task.collaborators.iter().map(|c| format!("@{}", c)).collect();
        lines.push(format!("collaborators: {}", names.join(" ")));
    }
    lines.push(format!("created: {}", format_local(task.created_at)));
    if let Some(updated) = task.updated_at {
        lines.push(format!("updated: {}", format_local(updated)));
    }
    if task.subtasks.is_empty() {
        lines.push(format!("progress: {}%", progress(task)));
    } else {
        lines.push(format!(
            "progress: {}% ({}/{} subtasks)",
            progress(task),
            task.completed_subtasks(),
            task.subtasks.len()
        ));
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        for sub in &task.subtasks {
            lines.push(format!("  {} {} {}", checkbox(sub.completed), sub.id, sub.text));
        }
    }
    lines
}

pub fn format_dashboard(stats: &Stats, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.paint("== Dashboard ==", Role::Heading)];
    lines.push(format!(
        "tasks: {} total, {} completed, {} pending ({}% done)",
        stats.total, stats.completed, stats.pending, stats.completion_rate
    ));
    lines.push(format!(
        "due: {} overdue, {} due today",
        stats.overdue, stats.due_today
    ));
    lines.push(format!(
        "priority: {} high, {} medium, {} low",
        stats.high, stats.medium, stats.low
    ));
    lines.push(format!(
        "subtasks: {}/{} completed, average progress {}%",
        stats.subtasks_completed, stats.subtasks, stats.average_progress
    ));
    if !stats.top_tags.is_empty() {
        let tags: Vec<_> = stats
            .top_tags
            .iter()
            .map(|(tag, n)| format!("#{} ({})", tag, n))
            .collect();
        lines.push(format!("top tags: {}", tags.join(", ")));
    }
    lines
}

pub fn format_activity(entries: &[ActivityEntry], palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.paint("== Activity ==", Role::Heading)];
    if entries.is_empty() {
        lines.push(palette.paint("(no activity yet)", Role::Dim));
    }
    for entry in entries {
        lines.push(format!(
            "{}  {}",
            palette.paint(&format_local(entry.timestamp), Role::Dim),
            entry.message
        ));
    }
    lines
}

/// Reminder banner for the active reminder task
pub fn format_reminder(task: &Task, now: DateTime<Utc>, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.paint("== Reminder ==", Role::Heading)];
    lines.push(format!("\"{}\" is due soon ({})", task.text, task.id));
    if let Some(due) = task.due_date {
        lines.push(format!("due: {}", format_local(due)));
        lines.push(format!("time remaining: {}", countdown(due, now)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, Subtask, label_set};
    use crate::ops::view::{Filter, SortKey};
    use chrono::TimeZone;
    use insta::assert_snapshot;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()
    }

    fn plan_trip() -> Task {
        let mut t = Task::new(7, "Plan trip".into(), now());
        t.priority = Priority::High;
        t.tags = label_set(["travel"]);
        t.collaborators = label_set(["ana"]);
        t.subtasks = vec![
            Subtask {
                id: 8,
                text: "Book flight".into(),
                completed: true,
            },
            Subtask {
                id: 9,
                text: "Book hotel".into(),
                completed: false,
            },
        ];
        t
    }

    #[test]
    fn task_line_without_due_date() {
        let line = format_task_line(&plan_trip(), now(), &Palette::plain());
        assert_eq!(
            line,
            format!(
                "[ ] 7  {}  High    {}   50%  #travel @ana",
                fit_to_width("Plan trip", TEXT_WIDTH),
                fit_to_width("-", 16)
            )
        );
    }

    #[test]
    fn list_header_describes_query() {
        let query = ViewQuery {
            filter: Filter::Pending,
            sort: Some(SortKey::Priority),
            search: "trip".into(),
        };
        let lines = format_task_list(&[], &query, now(), &Palette::plain());
        assert_eq!(
            lines,
            vec![
                "== Tasks (pending) == sorted by priority matching \"trip\"".to_string(),
                "(no tasks)".to_string(),
            ]
        );
    }

    #[test]
    fn dashboard_snapshot() {
        let stats = Stats {
            total: 4,
            completed: 1,
            pending: 3,
            overdue: 1,
            due_today: 2,
            completion_rate: 25,
            high: 2,
            medium: 1,
            low: 1,
            subtasks: 3,
            subtasks_completed: 1,
            average_progress: 36,
            top_tags: vec![("work".into(), 3), ("home".into(), 1)],
        };
        let output = format_dashboard(&stats, &Palette::plain()).join("\n");
        assert_snapshot!(output, @r"
        == Dashboard ==
        tasks: 4 total, 1 completed, 3 pending (25% done)
        due: 1 overdue, 2 due today
        priority: 2 high, 1 medium, 1 low
        subtasks: 1/3 completed, average progress 36%
        top tags: #work (3), #home (1)
        ");
    }

    #[test]
    fn detail_lists_subtasks() {
        let lines = format_task_detail(&plan_trip(), now(), &Palette::plain());
        assert_eq!(lines[0], "[ ] Plan trip");
        assert!(lines.contains(&"priority: High".to_string()));
        assert!(lines.contains(&"tags: #travel".to_string()));
        assert!(lines.contains(&"collaborators: @ana".to_string()));
        assert!(lines.contains(&"progress: 50% (1/2 subtasks)".to_string()));
        assert!(lines.contains(&"  [x] 8 Book flight".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("due:")));
    }

    #[test]
    fn task_json_flattens_progress() {
        let task = plan_trip();
        let value = serde_json::to_value(task_to_json(&task)).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["text"], "Plan trip");
        assert_eq!(value["progress"], 50);
    }
}
