use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::task::Task;

/// Message shown once a countdown has run out
pub const DUE_MESSAGE: &str = "Time is up!";

/// The incomplete task due strictly within `(now, now + window)`.
/// When several qualify, the last one in list order wins.
pub fn find_reminder(tasks: &[Task], now: DateTime<Utc>, window: Duration) -> Option<&Task> {
    let horizon = now + window;
    tasks
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| t.due_date.is_some_and(|due| due > now && due < horizon))
        .last()
}

/// Time left until a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Due,
}

impl Countdown {
    pub fn is_due(&self) -> bool {
        matches!(self, Countdown::Due)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{}d {}h {}m {}s", days, hours, minutes, seconds),
            Countdown::Due => write!(f, "{}", DUE_MESSAGE),
        }
    }
}

/// Break the time until `due` into days/hours/minutes/seconds, or `Due` once
/// it has passed.
pub fn countdown(due: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let left = due - now;
    if left <= Duration::zero() {
        return Countdown::Due;
    }
    let total = left.num_seconds();
    Countdown::Remaining {
        days: total / 86_400,
        hours: (total / 3_600) % 24,
        minutes: (total / 60) % 60,
        seconds: total % 60,
    }
}
