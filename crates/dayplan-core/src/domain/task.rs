use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::TaskId;
use super::due;
use super::errors::ParsePriorityError;

/// Task priority. Only used for ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl Priority {
    /// Sort rank: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single to-do item as stored.
///
/// Closed record: the six fields below and nothing else. Unknown fields in
/// incoming JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub category: String,
    /// ISO 8601 date or timestamp, kept exactly as entered.
    #[serde(default)]
    pub due_date: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Parsed due date, or `None` when absent or malformed.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(due::parse_due)
    }
}

/// Creation payload. The store assigns `id` and sets `completed = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub priority: Priority,
}

impl NewTask {
    /// Builds a payload with trimmed text; a blank due date counts as absent.
    pub fn new(
        text: impl Into<String>,
        category: impl Into<String>,
        due_date: Option<String>,
        priority: Priority,
    ) -> Self {
        Self {
            text: text.into().trim().to_string(),
            category: category.into(),
            due_date: due::normalize_due(due_date),
            priority,
        }
    }

    /// Materialize the stored record once the store has picked an id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            text: self.text,
            category: self.category,
            due_date: self.due_date,
            priority: self.priority,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower("low", Priority::Low)]
    #[case::title("Medium", Priority::Medium)]
    #[case::upper_padded(" HIGH ", Priority::High)]
    fn priority_parses_case_insensitively(#[case] input: &str, #[case] expected: Priority) {
        assert_eq!(input.parse::<Priority>().unwrap(), expected);
    }

    #[test]
    fn priority_rejects_unknown_names() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn priority_rank_orders_high_above_low() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn new_task_trims_text_and_drops_blank_due_date() {
        let new = NewTask::new("  Buy milk ", "Errands", Some("  ".to_string()), Priority::High);
        assert_eq!(new.text, "Buy milk");
        assert_eq!(new.due_date, None);

        let task = new.into_task(TaskId::new(3));
        assert_eq!(task.id, TaskId::new(3));
        assert!(!task.completed);
    }

    #[test]
    fn task_json_uses_original_field_names_and_ignores_extras() {
        let json = serde_json::json!({
            "id": 1,
            "text": "Buy milk",
            "category": "Errands",
            "dueDate": "2025-01-01",
            "priority": "High",
            "completed": false,
            "color": "blue"
        });
        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2025-01-01"));
        assert_eq!(task.priority, Priority::High);

        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["dueDate"], "2025-01-01");
        assert!(out.get("color").is_none());
    }
}
