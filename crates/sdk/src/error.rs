//! SDK Error Types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, Error>;

/// SDK Error
///
/// Every failure mode is a distinct variant so callers can branch on
/// "timed out waiting" vs "server rejected" vs "could not read local file".
#[derive(Debug, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot read local file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse server response: {0}")]
    ResponseParse(String),

    #[error("task {task_id} did not reach a terminal status within {timeout:?}")]
    TaskTimeout { task_id: String, timeout: Duration },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
