use crate::model::action::Action;
use crate::model::task::{Task, TaskId};

/// Describe what `action` does to `tasks` as a log message.
///
/// Computed against the state *before* the action so deleted tasks can still
/// be named. Returns `None` when the action would change nothing.
pub fn describe(tasks: &[Task], action: &Action) -> Option<String> {
    let find = |id: TaskId| tasks.iter().find(|t| t.id == id);

    match action {
        Action::AddTask(draft) => {
            let text = draft.text.trim();
            (!text.is_empty()).then(|| format!("Added task: \"{}\"", text))
        }
        Action::UpdateTask { id, updates } => find(*id).map(|task| {
            let text = updates
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(task.text.as_str());
            format!("Updated task: \"{}\"", text)
        }),
        Action::DeleteTask(id) => find(*id).map(|task| format!("Deleted task: \"{}\"", task.text)),
        Action::ToggleTask(id) => find(*id).map(|task| {
            if task.completed {
                format!("Reopened task: \"{}\"", task.text)
            } else {
                format!("Completed task: \"{}\"", task.text)
            }
        }),
        Action::AddSubtask { task_id, text } => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            find(*task_id).map(|task| format!("Added subtask to \"{}\": \"{}\"", task.text, text))
        }
        Action::ToggleSubtask {
            task_id,
            subtask_id,
        } => find(*task_id)
            .filter(|task| task.find_subtask(*subtask_id).is_some())
            .map(|task| format!("Toggled subtask for \"{}\"", task.text)),
        Action::DeleteSubtask {
            task_id,
            subtask_id,
        } => find(*task_id)
            .filter(|task| task.find_subtask(*subtask_id).is_some())
            .map(|task| format!("Deleted a subtask from \"{}\"", task.text)),
        Action::Unknown(_) => None,
    }
}
