//! Derived view: filter, sort and annotate the task set.
//!
//! `derive_view` is pure. It is re-run from the full task set after every
//! mutation and every selection change; nothing is cached between runs.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::due::{self, Countdown};
use crate::domain::{ParseModeError, Task};

/// Which tasks survive by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Pending,
}

impl FilterMode {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Completed => task.completed,
            FilterMode::Pending => !task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Completed => "completed",
            FilterMode::Pending => "pending",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "completed" => Ok(FilterMode::Completed),
            "pending" => Ok(FilterMode::Pending),
            _ => Err(ParseModeError {
                what: "filter",
                value: s.to_string(),
                expected: "all, completed, pending",
            }),
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Keep the order the store returned.
    #[default]
    None,
    /// Earliest due date first; missing or unreadable dates last.
    DueDate,
    /// High, then Medium, then Low.
    Priority,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::None => "none",
            SortMode::DueDate => "due-date",
            SortMode::Priority => "priority",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SortMode::None),
            "due-date" | "duedate" | "due_date" | "due" => Ok(SortMode::DueDate),
            "priority" => Ok(SortMode::Priority),
            _ => Err(ParseModeError {
                what: "sort",
                value: s.to_string(),
                expected: "none, due-date, priority",
            }),
        }
    }
}

/// Current search/filter/sort selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub filter: FilterMode,
    pub sort: SortMode,
}

impl ViewQuery {
    /// Case-insensitive substring match on `text` plus the filter mode.
    pub fn matches(&self, task: &Task) -> bool {
        self.filter.matches(task) && contains_ignore_case(&task.text, &self.search)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A task as presented: the record plus what was computed against `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTask {
    pub task: Task,
    pub countdown: Countdown,
    pub is_overdue: bool,
}

impl AnnotatedTask {
    pub fn annotate(task: Task, now: DateTime<Utc>) -> Self {
        let due_at = task.due_at();
        Self {
            countdown: Countdown::compute(due_at, now),
            is_overdue: due::is_overdue(due_at, task.completed, now),
            task,
        }
    }

    /// Empty when there is no usable due date.
    pub fn countdown_label(&self) -> String {
        self.countdown.to_string()
    }
}

/// Filter, then stable-sort, then annotate.
pub fn derive_view(tasks: &[Task], query: &ViewQuery, now: DateTime<Utc>) -> Vec<AnnotatedTask> {
    let mut kept: Vec<&Task> = tasks.iter().filter(|t| query.matches(t)).collect();

    // stable: ties keep store order
    match query.sort {
        SortMode::None => {}
        SortMode::DueDate => kept.sort_by_key(|t| t.due_at().unwrap_or_else(due::far_future)),
        SortMode::Priority => kept.sort_by_key(|t| Reverse(t.priority.rank())),
    }

    kept.into_iter()
        .map(|t| AnnotatedTask::annotate(t.clone(), now))
        .collect()
}
