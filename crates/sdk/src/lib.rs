//! Hivecrew SDK - Rust Client Library
//!
//! Client for the Hivecrew computer-use agent API: create, poll, control,
//! and retrieve artifacts from asynchronous remote tasks.
//!
//! # Example
//!
//! ```no_run
//! use hivecrew_sdk::{CreateTaskRequest, HivecrewClient, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HivecrewClient::builder("https://api.hivecrew.dev/v1")
//!         .api_key(std::env::var("HIVECREW_API_KEY")?)
//!         .build()?;
//!
//!     // Create a task and wait for it to finish
//!     let task = client
//!         .tasks()
//!         .run(
//!             CreateTaskRequest::new(
//!                 "Take a screenshot of the desktop",
//!                 "OpenRouter",
//!                 "anthropic/claude-sonnet-4.5",
//!             ),
//!             TrackerConfig::default(),
//!         )
//!         .await?;
//!
//!     println!("{}: {:?}", task.status, task.result_summary);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod tasks;
mod tracker;
mod transport;
mod types;

pub use client::{HivecrewClient, HivecrewClientBuilder};
pub use error::{Error, Result};
pub use tasks::TasksResource;
pub use tracker::{
    MonotonicClock, PollWait, SleepWait, SystemClock, TaskSource, TaskTracker, TrackerConfig,
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
};
pub use transport::{
    ApiRequest, ApiResponse, ByteStream, FilePart, HttpTransport, Method, RequestBody, Transport,
};
pub use types::{
    CreateTaskRequest, FileKind, ListTasksQuery, SortField, SortOrder, Task, TaskAction, TaskFile,
    TaskFilesResponse, TaskList, TaskStatus,
};
