//! Row types for the `todos` table.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single row of the `todos` table.
///
/// `created_at` is `None` only on a client-side placeholder that has not been
/// confirmed by the server yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub task: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Unconfirmed local row shown while its insert is in flight.
    pub fn placeholder(temp_id: i64, task: impl Into<String>) -> Self {
        Self {
            id: temp_id,
            task: task.into(),
            is_complete: false,
            created_at: None,
        }
    }
}

/// Insert payload. The store fills in `id`, `is_complete` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub task: String,
}

/// Partial update payload. Only the fields present in the JSON are applied;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl TodoPatch {
    pub fn task(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            is_complete: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_without_created_at_deserializes_as_placeholder_shape() {
        let todo: Todo = serde_json::from_str(r#"{"id":7,"task":"Walk dog"}"#).unwrap();
        assert_eq!(todo, Todo::placeholder(7, "Walk dog"));
    }

    #[test]
    fn row_with_timestamp_deserializes() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"task":"A","is_complete":true,"created_at":"2024-05-01T10:00:00+00:00"}"#,
        )
        .unwrap();
        assert!(todo.is_complete);
        assert_eq!(
            todo.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn patch_skips_absent_fields() {
        let json = serde_json::to_value(TodoPatch::task("Renamed")).unwrap();
        assert_eq!(json, serde_json::json!({ "task": "Renamed" }));
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let json = serde_json::to_string(&TodoPatch::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
