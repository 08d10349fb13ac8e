use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::view::progress;

/// How many tags the dashboard lists
const TOP_TAGS: usize = 5;

/// Aggregate numbers for the dashboard view
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Incomplete and past due
    pub overdue: usize,
    /// Incomplete, due later today (local calendar day)
    pub due_today: usize,
    /// Completed share of all tasks, rounded percent
    pub completion_rate: u8,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub subtasks: usize,
    pub subtasks_completed: usize,
    /// Mean of per-task progress, rounded percent
    pub average_progress: u8,
    /// Most used tags, most frequent first
    pub top_tags: Vec<(String, usize)>,
}

pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Stats {
    let mut stats = Stats {
        total: tasks.len(),
        ..Default::default()
    };
    let today = now.with_timezone(&Local).date_naive();
    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    let mut progress_sum = 0usize;

    for task in tasks {
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
            if let Some(due) = task.due_date {
                if due < now {
                    stats.overdue += 1;
                } else if due.with_timezone(&Local).date_naive() == today {
                    stats.due_today += 1;
                }
            }
        }
        match task.priority {
            Priority::High => stats.high += 1,
            Priority::Medium => stats.medium += 1,
            Priority::Low => stats.low += 1,
        }
        stats.subtasks += task.subtasks.len();
        stats.subtasks_completed += task.completed_subtasks();
        progress_sum += progress(task) as usize;
        for tag in &task.tags {
            *tag_counts.entry(tag.as_str()).or_default() += 1;
        }
    }

    stats.completion_rate = percent(stats.completed, stats.total);
    if stats.total > 0 {
        stats.average_progress = (progress_sum as f64 / stats.total as f64).round() as u8;
    }

    let mut tags: Vec<(String, usize)> = tag_counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), n))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags.truncate(TOP_TAGS);
    stats.top_tags = tags;

    stats
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}
