use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::task::{Priority, TaskId};
use crate::util::dates;

/// Fields supplied when creating a task. The reducer assigns the id and
/// timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub text: String,
    #[serde(default, deserialize_with = "dates::empty_string_as_none")]
    pub description: Option<String>,
    #[serde(default, with = "dates::due_date")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub collaborators: Vec<String>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        TaskDraft {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Partial update merged into an existing task. `None` leaves a field as is;
/// for the optional fields `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdates {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "patch_description")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "dates::due_date::deserialize_patch")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub collaborators: Option<Vec<String>>,
}

impl TaskUpdates {
    pub fn is_empty(&self) -> bool {
        *self == TaskUpdates::default()
    }
}

fn patch_description<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    dates::empty_string_as_none(deserializer).map(Some)
}

/// A state transition request for the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddTask(TaskDraft),
    UpdateTask { id: TaskId, updates: TaskUpdates },
    DeleteTask(TaskId),
    ToggleTask(TaskId),
    AddSubtask { task_id: TaskId, text: String },
    ToggleSubtask { task_id: TaskId, subtask_id: TaskId },
    DeleteSubtask { task_id: TaskId, subtask_id: TaskId },
    /// Any action type the store does not recognize
    Unknown(String),
}

impl Action {
    /// The wire name of this action (`ADD_TASK`, ...)
    pub fn kind(&self) -> &str {
        match self {
            Action::AddTask(_) => "ADD_TASK",
            Action::UpdateTask { .. } => "UPDATE_TASK",
            Action::DeleteTask(_) => "DELETE_TASK",
            Action::ToggleTask(_) => "TOGGLE_TASK",
            Action::AddSubtask { .. } => "ADD_SUBTASK",
            Action::ToggleSubtask { .. } => "TOGGLE_SUBTASK",
            Action::DeleteSubtask { .. } => "DELETE_SUBTASK",
            Action::Unknown(kind) => kind,
        }
    }

    /// Parse an action from its JSON wire form: `{"type": "...", "payload": ...}`.
    ///
    /// Unrecognized types become [`Action::Unknown`]; a recognized type with a
    /// malformed payload is an error.
    pub fn from_json(input: &str) -> Result<Action, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(input)?;
        envelope.into_action()
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct UpdatePayload {
    id: TaskId,
    #[serde(default)]
    updates: TaskUpdates,
}

#[derive(Deserialize)]
struct SubtaskDraft {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddSubtaskPayload {
    task_id: TaskId,
    subtask: SubtaskDraft,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubtaskRef {
    task_id: TaskId,
    subtask_id: TaskId,
}

impl Envelope {
    fn into_action(self) -> Result<Action, serde_json::Error> {
        let payload = self.payload;
        let action = match self.kind.as_str() {
            "ADD_TASK" => Action::AddTask(serde_json::from_value(payload)?),
            "UPDATE_TASK" => {
                let p: UpdatePayload = serde_json::from_value(payload)?;
                Action::UpdateTask {
                    id: p.id,
                    updates: p.updates,
                }
            }
            "DELETE_TASK" => Action::DeleteTask(serde_json::from_value(payload)?),
            "TOGGLE_TASK" => Action::ToggleTask(serde_json::from_value(payload)?),
            "ADD_SUBTASK" => {
                let p: AddSubtaskPayload = serde_json::from_value(payload)?;
                Action::AddSubtask {
                    task_id: p.task_id,
                    text: p.subtask.text,
                }
            }
            "TOGGLE_SUBTASK" => {
                let p: SubtaskRef = serde_json::from_value(payload)?;
                Action::ToggleSubtask {
                    task_id: p.task_id,
                    subtask_id: p.subtask_id,
                }
            }
            "DELETE_SUBTASK" => {
                let p: SubtaskRef = serde_json::from_value(payload)?;
                Action::DeleteSubtask {
                    task_id: p.task_id,
                    subtask_id: p.subtask_id,
                }
            }
            other => Action::Unknown(other.to_string()),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_task_ignores_client_fields() {
        let action = Action::from_json(
            r#"{"type":"ADD_TASK","payload":{"id":1,"text":"Buy milk","priority":"High","completed":true,"editing":false}}"#,
        )
        .unwrap();
        match action {
            Action::AddTask(draft) => {
                assert_eq!(draft.text, "Buy milk");
                assert_eq!(draft.priority, Priority::High);
                assert!(draft.due_date.is_none());
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn parse_id_payloads() {
        assert_eq!(
            Action::from_json(r#"{"type":"TOGGLE_TASK","payload":17}"#).unwrap(),
            Action::ToggleTask(17)
        );
        assert_eq!(
            Action::from_json(r#"{"type":"DELETE_TASK","payload":17}"#).unwrap(),
            Action::DeleteTask(17)
        );
    }

    #[test]
    fn parse_subtask_payloads() {
        assert_eq!(
            Action::from_json(
                r#"{"type":"ADD_SUBTASK","payload":{"taskId":5,"subtask":{"text":"Book flight"}}}"#
            )
            .unwrap(),
            Action::AddSubtask {
                task_id: 5,
                text: "Book flight".into()
            }
        );
        assert_eq!(
            Action::from_json(r#"{"type":"DELETE_SUBTASK","payload":{"taskId":5,"subtaskId":6}}"#)
                .unwrap(),
            Action::DeleteSubtask {
                task_id: 5,
                subtask_id: 6
            }
        );
    }

    #[test]
    fn parse_update_distinguishes_missing_and_cleared() {
        let action = Action::from_json(
            r#"{"type":"UPDATE_TASK","payload":{"id":3,"updates":{"text":"New","dueDate":""}}}"#,
        )
        .unwrap();
        let Action::UpdateTask { id, updates } = action else {
            panic!("expected UPDATE_TASK");
        };
        assert_eq!(id, 3);
        assert_eq!(updates.text.as_deref(), Some("New"));
        assert_eq!(updates.due_date, Some(None));
        assert_eq!(updates.description, None);
        assert_eq!(updates.priority, None);
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let action = Action::from_json(r#"{"type":"EDIT_TASK","payload":3}"#).unwrap();
        assert_eq!(action, Action::Unknown("EDIT_TASK".into()));
        assert_eq!(action.kind(), "EDIT_TASK");
    }

    #[test]
    fn malformed_known_payload_is_an_error() {
        assert!(Action::from_json(r#"{"type":"TOGGLE_TASK","payload":"abc"}"#).is_err());
        assert!(Action::from_json("not json").is_err());
    }
}
