use chrono::{DateTime, Utc};

use crate::model::action::{Action, TaskDraft, TaskUpdates};
use crate::model::task::{Subtask, Task, TaskId, label_set, next_id};

/// Compute the next task list from the current one and an action.
///
/// Total and non-mutating: the input slice is never touched, every action
/// (including unknown ones and ones that reference missing ids) yields a list.
pub fn reduce(tasks: &[Task], action: &Action, now: DateTime<Utc>) -> Vec<Task> {
    match action {
        Action::AddTask(draft) => add_task(tasks, draft, now),
        Action::UpdateTask { id, updates } => {
            map_task(tasks, *id, |task| apply_updates(task, updates, now))
        }
        Action::DeleteTask(id) => tasks.iter().filter(|t| t.id != *id).cloned().collect(),
        Action::ToggleTask(id) => map_task(tasks, *id, |task| task.completed = !task.completed),
        Action::AddSubtask { task_id, text } => {
            let text = text.trim();
            if text.is_empty() {
                return tasks.to_vec();
            }
            map_task(tasks, *task_id, |task| {
                let id = next_id(task.subtasks.iter().map(|s| s.id), now);
                task.subtasks.push(Subtask {
                    id,
                    text: text.to_string(),
                    completed: false,
                });
            })
        }
        Action::ToggleSubtask {
            task_id,
            subtask_id,
        } => map_task(tasks, *task_id, |task| {
            if let Some(sub) = task.subtasks.iter_mut().find(|s| s.id == *subtask_id) {
                sub.completed = !sub.completed;
            }
        }),
        Action::DeleteSubtask {
            task_id,
            subtask_id,
        } => map_task(tasks, *task_id, |task| {
            task.subtasks.retain(|s| s.id != *subtask_id)
        }),
        Action::Unknown(_) => tasks.to_vec(),
    }
}

fn add_task(tasks: &[Task], draft: &TaskDraft, now: DateTime<Utc>) -> Vec<Task> {
    let text = draft.text.trim();
    if text.is_empty() {
        return tasks.to_vec();
    }
    let id = next_id(tasks.iter().map(|t| t.id), now);
    let mut task = Task::new(id, text.to_string(), now);
    task.description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    task.due_date = draft.due_date;
    task.priority = draft.priority;
    task.tags = label_set(&draft.tags);
    task.collaborators = label_set(&draft.collaborators);

    let mut next = tasks.to_vec();
    next.push(task);
    next
}

fn apply_updates(task: &mut Task, updates: &TaskUpdates, now: DateTime<Utc>) {
    if let Some(text) = &updates.text {
        let text = text.trim();
        // Text stays required; a blank replacement leaves the old one.
        if !text.is_empty() {
            task.text = text.to_string();
        }
    }
    if let Some(description) = &updates.description {
        task.description = description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
    }
    if let Some(due) = updates.due_date {
        task.due_date = due;
    }
    if let Some(priority) = updates.priority {
        task.priority = priority;
    }
    if let Some(tags) = &updates.tags {
        task.tags = label_set(tags);
    }
    if let Some(collaborators) = &updates.collaborators {
        task.collaborators = label_set(collaborators);
    }
    task.updated_at = Some(now.max(task.created_at));
}

/// Copy the list, applying `f` to the task with `id` (if any).
fn map_task(tasks: &[Task], id: TaskId, f: impl FnOnce(&mut Task)) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(task) = next.iter_mut().find(|t| t.id == id) {
        f(task);
    }
    next
}
