//! Domain identifiers.
//!
//! Task ids are assigned by the store (SQLite `AUTOINCREMENT` or the in-memory
//! counter), so the domain only wraps the integer to keep it from being mixed
//! up with other integers (row counts, day differences, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a Task, unique and stable for the task's lifetime.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "#12" is accepted as well as "12"
        let digits = s.trim().trim_start_matches('#');
        digits.parse::<i64>().map(Self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
