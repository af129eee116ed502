//! Error types for the task poller

use std::time::Duration;

use smartsupport_core::domain::task::JobId;
use thiserror::Error;

/// Message used when the backend reports `FAILURE` without one
pub const DEFAULT_FAILURE_MESSAGE: &str = "Task failed with unknown error";

/// Result type alias for poller operations
pub type Result<T> = std::result::Result<T, PollError>;

/// Errors produced while polling a task
///
/// Every terminal failure of a poll maps to exactly one variant, so callers
/// can tell a backend failure from a timeout from a dead transport.
/// Underlying causes are rendered to strings when they are classified, which
/// keeps the type `Clone` and lets a finished poller replay its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Backend reported `SUCCESS` but sent no result payload
    #[error("Task {job_id} completed but no result data available (attempt {attempts})")]
    NoResultOnSuccess { job_id: JobId, attempts: u32 },

    /// Backend reported `FAILURE`
    #[error("Task {job_id} failed: {message}")]
    RemoteFailure { job_id: JobId, message: String },

    /// Backend reported a status outside the recognized set
    #[error("Unknown task status for {job_id}: {status}")]
    UnknownStatus { job_id: JobId, status: String },

    /// Attempt budget exhausted while the task was still in progress
    #[error(
        "Task {job_id} polling timeout after {attempts} attempts ({:.1}s)",
        .elapsed.as_secs_f64()
    )]
    Timeout {
        job_id: JobId,
        attempts: u32,
        elapsed: Duration,
    },

    /// The status fetch kept failing and the budget ran out
    #[error("Error polling task {job_id} status after {attempts} attempts: {cause}")]
    TransportError {
        job_id: JobId,
        cause: String,
        attempts: u32,
    },

    /// The poll was cancelled before an outcome was reached
    #[error("Polling of task {job_id} was cancelled")]
    Cancelled { job_id: JobId },

    /// Job id is empty
    #[error("Job id must not be empty")]
    InvalidJobId,

    /// Poll options failed validation
    #[error("Invalid poll options: {0}")]
    InvalidOptions(String),
}

impl PollError {
    /// Check if the poll ran out of attempts
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if the poll was cancelled rather than finished
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Check if the backend itself decided the task's fate
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NoResultOnSuccess { .. } | Self::RemoteFailure { .. } | Self::UnknownStatus { .. }
        )
    }

    /// Number of counted attempts the error reports, if any
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::NoResultOnSuccess { attempts, .. }
            | Self::Timeout { attempts, .. }
            | Self::TransportError { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
