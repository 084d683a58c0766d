//! Wire Types for the Hivecrew Tasks API
//!
//! All server-facing types use camelCase field names, mirroring the JSON the
//! service speaks.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Task status as reported by the server.
///
/// The server owns all transitions; the client only ever inspects
/// terminal-ness. `Unrecognized` absorbs statuses introduced by servers newer
/// than this SDK so deserialization never hard-fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Queued,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
    MaxIterations,
    #[serde(untagged)]
    Unrecognized(String),
}

impl TaskStatus {
    /// True once the server will make no further transitions for this task.
    ///
    /// Unrecognized statuses are treated as non-terminal: the tracker keeps
    /// polling rather than guessing what an unknown status means.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed
                | TaskStatus::Failed
                | TaskStatus::Cancelled
                | TaskStatus::TimedOut
                | TaskStatus::MaxIterations
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::Paused => "paused",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::TimedOut => "timedOut",
            TaskStatus::MaxIterations => "maxIterations",
            TaskStatus::Unrecognized(s) => s,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control verb sent to mutate a task; an intent, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskAction {
    Cancel,
    Pause,
    Resume,
}

impl TaskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskAction::Cancel => "cancel",
            TaskAction::Pause => "pause",
            TaskAction::Resume => "resume",
        }
    }
}

/// A point-in-time snapshot of a remote task.
///
/// Each SDK call returns a fresh snapshot; nothing is cached client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned, immutable identifier.
    pub id: String,
    pub status: TaskStatus,
    /// Human-readable summary, populated only in terminal states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One page of task snapshots plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// A file attached to or produced by a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFile {
    pub name: String,
    pub size: u64,
}

/// Input and output file listings for a task; query-only, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilesResponse {
    #[serde(default)]
    pub input_files: Vec<TaskFile>,
    #[serde(default)]
    pub output_files: Vec<TaskFile>,
}

/// Which side of a task's file store to download from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Input,
    Output,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Input => "input",
            FileKind::Output => "output",
        }
    }
}

/// Parameters for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    /// Instructions for the agent. Must be non-empty.
    pub description: String,
    /// AI provider name (e.g., "OpenRouter").
    pub provider_name: String,
    /// Model ID (e.g., "anthropic/claude-sonnet-4.5").
    pub model_id: String,
    /// Local files to upload with the task.
    pub files: Vec<PathBuf>,
}

impl CreateTaskRequest {
    pub fn new(
        description: impl Into<String>,
        provider_name: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            provider_name: provider_name.into(),
            model_id: model_id.into(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }
}

/// Sort field for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    StartedAt,
    CompletedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::StartedAt => "startedAt",
            SortField::CompletedAt => "completedAt",
        }
    }
}

/// Sort order for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filter and pagination parameters for listing tasks.
#[derive(Debug, Clone)]
pub struct ListTasksQuery {
    /// Status filter; `None` omits the filter entirely.
    pub status: Option<Vec<TaskStatus>>,
    /// Page size, 1-200.
    pub limit: u32,
    pub offset: u32,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for ListTasksQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: 50,
            offset: 0,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListTasksQuery {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(1..=200).contains(&self.limit) {
            return Err(Error::Validation(format!(
                "limit out of range (1-200): {}",
                self.limit
            )));
        }
        Ok(())
    }

    /// Serialize into query parameters. Statuses join into a single
    /// comma-separated value; an absent filter produces no parameter at all.
    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
            ("sort".to_string(), self.sort.as_str().to_string()),
            ("order".to_string(), self.order.as_str().to_string()),
        ];

        if let Some(statuses) = &self.status {
            if !statuses.is_empty() {
                let joined = statuses
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                params.push(("status".to_string(), joined));
            }
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserializes_wire_names() {
        let status: TaskStatus = serde_json::from_str("\"timedOut\"").unwrap();
        assert_eq!(status, TaskStatus::TimedOut);

        let status: TaskStatus = serde_json::from_str("\"maxIterations\"").unwrap();
        assert_eq!(status, TaskStatus::MaxIterations);
    }

    #[test]
    fn test_status_unknown_variant_is_unrecognized() {
        let status: TaskStatus = serde_json::from_str("\"someFutureStatus\"").unwrap();
        assert_eq!(status, TaskStatus::Unrecognized("someFutureStatus".into()));
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_terminal_set() {
        for status in [
            TaskStatus::Completed,
            TaskStatus::Failed,
            TaskStatus::Cancelled,
            TaskStatus::TimedOut,
            TaskStatus::MaxIterations,
        ] {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
        for status in [TaskStatus::Queued, TaskStatus::Running, TaskStatus::Paused] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
    }

    #[test]
    fn test_task_deserializes_camel_case() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": "T1",
                "status": "completed",
                "resultSummary": "done",
                "createdAt": "2026-08-27T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(task.id, "T1");
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.result_summary.as_deref(), Some("done"));
        assert!(task.created_at.is_some());
        assert!(task.started_at.is_none());
    }

    #[test]
    fn test_query_params_omit_absent_status() {
        let params = ListTasksQuery::default().to_params();
        assert!(params.iter().all(|(k, _)| k != "status"));
        assert!(params.contains(&("limit".to_string(), "50".to_string())));
        assert!(params.contains(&("sort".to_string(), "createdAt".to_string())));
        assert!(params.contains(&("order".to_string(), "desc".to_string())));
    }

    #[test]
    fn test_query_params_join_statuses() {
        let query = ListTasksQuery {
            status: Some(vec![TaskStatus::Running, TaskStatus::Queued]),
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("status".to_string(), "running,queued".to_string())));
    }

    #[test]
    fn test_query_limit_out_of_range() {
        for limit in [0, 201] {
            let query = ListTasksQuery {
                limit,
                ..Default::default()
            };
            let err = query.validate().unwrap_err();
            assert!(err.to_string().contains("out of range"));
        }
        let query = ListTasksQuery {
            limit: 200,
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }
}
