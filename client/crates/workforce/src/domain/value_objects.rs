//! Value Objects
//!
//! Immutable types with domain validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Task Status
// ============================================================================

/// Task workflow status
///
/// Decoding accepts the backend's `snake_case` codes as well as display
/// labels (`"In Progress"`), case-insensitively. Unknown values are kept
/// verbatim so a newer backend does not break task listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
    Other(String),
}

impl TaskStatus {
    pub fn code(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// Parse leniently; never fails
    pub fn from_code(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "pending" | "todo" | "to_do" => TaskStatus::Pending,
            "in_progress" | "inprogress" => TaskStatus::InProgress,
            "completed" | "done" => TaskStatus::Completed,
            "blocked" => TaskStatus::Blocked,
            _ => TaskStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Strict parse for user input (CLI); only the known statuses
impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TaskStatus::from_code(s) {
            TaskStatus::Other(raw) => Err(format!(
                "unknown task status '{raw}' (expected pending, in_progress, completed or blocked)"
            )),
            status => Ok(status),
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskStatus::from_code(&raw))
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// Pass-through query parameters (`?manager_id=3`, report filters)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_lenient_decode() {
        assert_eq!(TaskStatus::from_code("In Progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_code("in-progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_code("COMPLETED"), TaskStatus::Completed);
        assert_eq!(
            TaskStatus::from_code("Review"),
            TaskStatus::Other("Review".to_string())
        );
    }

    #[test]
    fn test_task_status_strict_parse() {
        assert_eq!("blocked".parse::<TaskStatus>(), Ok(TaskStatus::Blocked));
        assert!("review".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_serde() {
        let status: TaskStatus = serde_json::from_str("\"Pending\"").unwrap();
        assert_eq!(status, TaskStatus::Pending);
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Other("Review".to_string())).unwrap(),
            "\"Review\""
        );
    }

    #[test]
    fn test_query_params() {
        let query = QueryParams::new().with("manager_id", "3");
        assert_eq!(query.pairs(), &[("manager_id".to_string(), "3".to_string())]);

        let collected: QueryParams = [("from", "2024-01-01")].into_iter().collect();
        assert!(!collected.is_empty());
    }
}
