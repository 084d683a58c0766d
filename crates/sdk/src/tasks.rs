//! Tasks Resource
//!
//! Thin wrappers translating method calls into API requests and response
//! bodies into typed snapshots. Tasks are computer-use agent jobs that can be
//! created, monitored, and controlled.

use crate::error::{Error, Result};
use crate::tracker::{TaskSource, TaskTracker, TrackerConfig};
use crate::transport::{ApiRequest, FilePart, Method, Transport};
use crate::types::{
    CreateTaskRequest, FileKind, ListTasksQuery, Task, TaskAction, TaskFilesResponse, TaskList,
};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Resource handle for managing tasks.
#[derive(Clone)]
pub struct TasksResource {
    transport: Arc<dyn Transport>,
}

impl TasksResource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a new task.
    ///
    /// Without attachments this is a plain JSON request; with attachments it
    /// becomes a multipart upload carrying one part per file. Every file is
    /// read before the request is sent, so an unreadable path fails the whole
    /// submission without a single network call.
    ///
    /// Returns the initial snapshot; it does not wait for progress.
    pub async fn create(&self, request: CreateTaskRequest) -> Result<Task> {
        if request.description.trim().is_empty() {
            return Err(Error::Validation(
                "task description must not be empty".into(),
            ));
        }

        let api_request = if request.files.is_empty() {
            ApiRequest::new(Method::Post, "/tasks").with_json(json!({
                "description": request.description,
                "providerName": request.provider_name,
                "modelId": request.model_id,
            }))
        } else {
            let fields = vec![
                ("description".to_string(), request.description),
                ("providerName".to_string(), request.provider_name),
                ("modelId".to_string(), request.model_id),
            ];
            let mut files = Vec::with_capacity(request.files.len());
            for path in &request.files {
                files.push(read_file_part(path).await?);
            }
            ApiRequest::new(Method::Post, "/tasks").with_multipart(fields, files)
        };

        let response = self.transport.send(api_request).await?;
        let task: Task = response.parse()?;
        info!(task_id = %task.id, status = %task.status, "Task created");

        Ok(task)
    }

    /// Create a task and wait for it to reach a terminal status.
    ///
    /// Composition of [`create`](Self::create) and [`TaskTracker`]; callers
    /// needing a custom polling strategy can use those pieces directly.
    ///
    /// Fails with [`Error::TaskTimeout`] once the configured local deadline
    /// passes. The remote task keeps running in that case.
    pub async fn run(&self, request: CreateTaskRequest, config: TrackerConfig) -> Result<Task> {
        let task = self.create(request).await?;
        let tracker = TaskTracker::new(Arc::new(self.clone()), config);
        tracker.wait_until_terminal(task).await
    }

    /// List tasks with optional status filtering and pagination.
    pub async fn list(&self, query: ListTasksQuery) -> Result<TaskList> {
        query.validate()?;
        let api_request = ApiRequest::new(Method::Get, "/tasks").with_query(query.to_params());
        self.transport.send(api_request).await?.parse()
    }

    /// Get a fresh snapshot of a task.
    pub async fn get(&self, task_id: &str) -> Result<Task> {
        let api_request = ApiRequest::new(Method::Get, format!("/tasks/{task_id}"));
        self.transport.send(api_request).await?.parse()
    }

    /// Cancel a running or queued task.
    pub async fn cancel(&self, task_id: &str) -> Result<Task> {
        self.update(task_id, TaskAction::Cancel, None).await
    }

    /// Pause a running task.
    pub async fn pause(&self, task_id: &str) -> Result<Task> {
        self.update(task_id, TaskAction::Pause, None).await
    }

    /// Resume a paused task, optionally with replacement instructions.
    pub async fn resume(&self, task_id: &str, instructions: Option<&str>) -> Result<Task> {
        self.update(task_id, TaskAction::Resume, instructions).await
    }

    /// Send a control action. The server alone decides whether the action is
    /// legal for the task's current status; its verdict is surfaced as-is.
    async fn update(
        &self,
        task_id: &str,
        action: TaskAction,
        instructions: Option<&str>,
    ) -> Result<Task> {
        let mut body = json!({ "action": action.as_str() });
        if let Some(instructions) = instructions {
            body["instructions"] = json!(instructions);
        }

        debug!(task_id = %task_id, action = action.as_str(), "Sending control action");
        let api_request = ApiRequest::new(Method::Patch, format!("/tasks/{task_id}")).with_json(body);
        self.transport.send(api_request).await?.parse()
    }

    /// Delete a task record.
    pub async fn delete(&self, task_id: &str) -> Result<()> {
        let api_request = ApiRequest::new(Method::Delete, format!("/tasks/{task_id}"));
        self.transport.send(api_request).await?;
        Ok(())
    }

    /// List input and output files associated with a task.
    pub async fn list_files(&self, task_id: &str) -> Result<TaskFilesResponse> {
        let api_request = ApiRequest::new(Method::Get, format!("/tasks/{task_id}/files"));
        self.transport.send(api_request).await?.parse()
    }

    /// Download a task file, streaming it to disk chunk by chunk.
    ///
    /// If `destination` is an existing directory the original filename is
    /// appended; otherwise the path is used verbatim. The parent directory is
    /// created if absent and the file is truncate-created, so a retried
    /// download never double-writes. Returns the resolved destination.
    pub async fn download_file(
        &self,
        task_id: &str,
        filename: &str,
        destination: impl AsRef<Path>,
        kind: FileKind,
    ) -> Result<PathBuf> {
        let mut dest = destination.as_ref().to_path_buf();
        if dest.is_dir() {
            dest.push(filename);
        }

        let api_request = ApiRequest::new(Method::Get, format!("/tasks/{task_id}/files/{filename}"))
            .with_query(vec![("type".to_string(), kind.as_str().to_string())]);
        let mut stream = self.transport.stream(api_request).await?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::File::create(&dest).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(
            task_id = %task_id,
            path = %dest.display(),
            bytes = written,
            "Downloaded task file"
        );

        Ok(dest)
    }
}

#[async_trait]
impl TaskSource for TasksResource {
    async fn fetch(&self, task_id: &str) -> Result<Task> {
        self.get(task_id).await
    }
}

/// Read one local file into a multipart part, carrying its base name.
///
/// The handle is scoped to the read and released on every exit path.
async fn read_file_part(path: &Path) -> Result<FilePart> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Validation(format!("invalid file path: {}", path.display())))?
        .to_string();

    let content = tokio::fs::read(path).await.map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FilePart { file_name, content })
}
