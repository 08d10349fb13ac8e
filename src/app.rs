use crate::io::storage::{self, KeyValueStore, StorageError};
use crate::model::action::Action;
use crate::model::activity::{ActivityEntry, ActivityLog};
use crate::model::config::Config;
use crate::model::task::{Task, TaskId};
use crate::ops::{activity, reducer, reminder};
use crate::util::clock::Clock;

/// What a dispatch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Whether the task list changed (and was persisted)
    pub changed: bool,
    /// The activity entry appended for this action, if any
    pub entry: Option<ActivityEntry>,
}

/// The application state container.
///
/// Owns the task list and activity log, and mutates them only through
/// [`App::dispatch`]. Every change is written back to the store in full.
pub struct App<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    config: Config,
    tasks: Vec<Task>,
    activity: ActivityLog,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    /// Load state from `store`. Missing or unreadable blobs start empty.
    pub fn load(store: S, clock: C, config: Config) -> Self {
        let tasks = storage::load_tasks(&store, &config.storage.tasks_key);
        let activity = storage::load_activity(&store, &config.storage.activity_key);
        tracing::debug!(
            tasks = tasks.len(),
            activity = activity.len(),
            "loaded state"
        );
        App {
            store,
            clock,
            config,
            tasks,
            activity,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Apply `action`: log it, reduce, and persist if anything changed.
    pub fn dispatch(&mut self, action: Action) -> Result<Dispatched, StorageError> {
        let now = self.clock.now();
        let message = activity::describe(&self.tasks, &action);
        let next = reducer::reduce(&self.tasks, &action, now);
        let changed = next != self.tasks;
        tracing::debug!(action = action.kind(), changed, "dispatched");

        if !changed {
            return Ok(Dispatched {
                changed,
                entry: None,
            });
        }

        // The task list is written first and is authoritative. Memory is only
        // updated once it is stored; a failed log write after that still
        // leaves the stored change in place and is reported as an error.
        storage::save_tasks(&self.store, &self.config.storage.tasks_key, &next)?;
        self.tasks = next;

        let Some(message) = message else {
            return Ok(Dispatched {
                changed,
                entry: None,
            });
        };
        let mut activity = self.activity.clone();
        let entry = activity.append(message, now).clone();
        storage::save_activity(&self.store, &self.config.storage.activity_key, &activity)?;
        self.activity = activity;
        Ok(Dispatched {
            changed,
            entry: Some(entry),
        })
    }

    /// The task to remind about right now, if any.
    pub fn reminder(&self) -> Option<&Task> {
        reminder::find_reminder(&self.tasks, self.clock.now(), self.config.reminders.window())
    }
}
