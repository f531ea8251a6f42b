// Error types for the task store
//
// Two kinds of rejection, kept distinct: malformed *input* is rejected and
// reported (validation), stale *references* are tolerated as silent no-ops
// everywhere except `begin_edit`, whose caller needs the miss.

use thiserror::Error;

/// Severity of the `(message, severity)` pair handed to the notification
/// layer after each operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Main error type for task store operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation: input rejected, state unchanged
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Unknown filter: {0} (expected all, active or completed)")]
    InvalidFilter(String),

    // Stale reference
    #[error("No task with id {0}")]
    TaskNotFound(u64),

    // Storage failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Severity this rejection should be reported with
    pub fn severity(&self) -> Severity {
        match self {
            Error::EmptyText | Error::InvalidFilter(_) => Severity::Warning,
            Error::TaskNotFound(_) => Severity::Info,
            Error::Io(_) | Error::Json(_) => Severity::Error,
        }
    }
}

/// Result type alias for task store operations
pub type Result<T> = std::result::Result<T, Error>;
