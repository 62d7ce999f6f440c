//! Task identifiers
//!
//! Ids are milliseconds since the Unix epoch at creation time, bumped past
//! the previously issued id so that two tasks created within the same
//! millisecond still get distinct ids. They serialize as bare JSON integers
//! and are never reused within a session.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw id value (used when loading persisted tasks)
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// Issues fresh, strictly increasing task ids
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that will never re-issue an id already present
    /// in a loaded task list
    pub fn seeded(ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            last: ids.into_iter().map(|id| id.0).max().unwrap_or(0),
        }
    }

    /// Returns a fresh id, unique for the lifetime of this generator
    pub fn next_id(&mut self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        TaskId(self.last)
    }
}
