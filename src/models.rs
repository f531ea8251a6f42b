// Data models for the task list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One to-do item
///
/// The serialized shape is pinned to the slot format: `id`, `text`,
/// `completed`, `createdAt` (ISO-8601 string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    /// Creation time, immutable after construction
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// New active task stamped with the current time. Callers validate and
    /// trim `text` before constructing.
    pub fn new(id: u64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// View predicate applied for display; never mutates the stored collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Whether a task is visible under this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Active => write!(f, "active"),
            TaskFilter::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = Error;

    /// The closed set is the enum; anything else is rejected at the boundary
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(Error::InvalidFilter(other.to_string())),
        }
    }
}

/// Per-filter task totals, computed from the full collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serialization_keys() {
        let task = Task::new(1, "buy milk".to_string());
        let json = serde_json::to_string(&task).unwrap();

        // Wire names must match the slot format exactly
        assert!(json.contains("\"createdAt\":"));
        assert!(!json.contains("created_at"));
        assert!(json.contains("\"completed\":false"));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_task_parses_legacy_slot_record() {
        // Legacy slot shape: timestamp-derived id, millisecond-precision
        // ISO string
        let json = r#"{"id":1754550000000,"text":"walk dog","completed":true,"createdAt":"2026-08-07T06:20:00.000Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 1754550000000);
        assert_eq!(task.text, "walk dog");
        assert!(task.completed);
    }

    #[test]
    fn test_filter_serialization() {
        let json = serde_json::to_string(&TaskFilter::Active).unwrap();
        assert_eq!(json, "\"active\"");

        let json = serde_json::to_string(&TaskFilter::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert_eq!("active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert_eq!("completed".parse::<TaskFilter>().unwrap(), TaskFilter::Completed);

        let err = "done".parse::<TaskFilter>().unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(ref s) if s == "done"));
    }

    #[test]
    fn test_filter_matches() {
        let mut task = Task::new(1, "buy milk".to_string());

        assert!(TaskFilter::All.matches(&task));
        assert!(TaskFilter::Active.matches(&task));
        assert!(!TaskFilter::Completed.matches(&task));

        task.completed = true;
        assert!(TaskFilter::All.matches(&task));
        assert!(!TaskFilter::Active.matches(&task));
        assert!(TaskFilter::Completed.matches(&task));
    }
}
