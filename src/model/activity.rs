use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{TaskId, next_id};

/// One human-readable record of a user action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: TaskId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only activity log. Entries are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with `now` and return it.
    pub fn append(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> &ActivityEntry {
        let id = next_id(self.entries.iter().map(|e| e.id), now);
        self.entries.push(ActivityEntry {
            id,
            message: message.into(),
            timestamp: now,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> &[ActivityEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn append_keeps_order_and_unique_ids() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let mut log = ActivityLog::new();
        log.append("first", now);
        log.append("second", now);
        log.append("third", now);

        let messages: Vec<_> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
        assert_ne!(log.entries()[1].id, log.entries()[2].id);
    }

    #[test]
    fn recent_returns_tail() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let mut log = ActivityLog::new();
        for i in 0..5 {
            log.append(format!("entry {}", i), now);
        }
        let tail: Vec<_> = log.recent(2).iter().map(|e| e.message.clone()).collect();
        assert_eq!(tail, vec!["entry 3", "entry 4"]);
        assert_eq!(log.recent(50).len(), 5);
    }

    #[test]
    fn serializes_as_plain_array() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let mut log = ActivityLog::new();
        log.append("hello", now);
        let value = serde_json::to_value(&log).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["message"], "hello");
    }
}
