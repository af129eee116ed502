//! Classification task domain types

use serde::{Deserialize, Serialize};

/// Identifier of a submitted classification task
///
/// Assigned by the API when a ticket is created. It is opaque to every
/// consumer: nothing in this workspace parses or generates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Status reported by the backend for a task
///
/// The backend speaks upper-case strings. Anything outside the known set is
/// kept verbatim in `Other` so callers can report it instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemoteStatus {
    /// Queued, not picked up by a worker yet
    Pending,

    /// A worker is processing the task
    Started,

    /// The backend is retrying the task internally
    Retry,

    /// Finished, result payload attached
    Success,

    /// Finished with an error
    Failure,

    /// Any value this crate does not recognize (e.g. `REVOKED`)
    Other(String),
}

impl RemoteStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            RemoteStatus::Pending => "PENDING",
            RemoteStatus::Started => "STARTED",
            RemoteStatus::Retry => "RETRY",
            RemoteStatus::Success => "SUCCESS",
            RemoteStatus::Failure => "FAILURE",
            RemoteStatus::Other(value) => value,
        }
    }

    /// True for `PENDING`, `STARTED` and `RETRY`
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            RemoteStatus::Pending | RemoteStatus::Started | RemoteStatus::Retry
        )
    }

    /// True for `SUCCESS` and `FAILURE`
    pub fn is_terminal(&self) -> bool {
        matches!(self, RemoteStatus::Success | RemoteStatus::Failure)
    }
}

impl From<&str> for RemoteStatus {
    fn from(value: &str) -> Self {
        match value {
            "PENDING" => RemoteStatus::Pending,
            "STARTED" => RemoteStatus::Started,
            "RETRY" => RemoteStatus::Retry,
            "SUCCESS" => RemoteStatus::Success,
            "FAILURE" => RemoteStatus::Failure,
            other => RemoteStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RemoteStatus {
    fn from(value: String) -> Self {
        match RemoteStatus::from(value.as_str()) {
            RemoteStatus::Other(_) => RemoteStatus::Other(value),
            known => known,
        }
    }
}

impl From<RemoteStatus> for String {
    fn from(status: RemoteStatus) -> Self {
        match status {
            RemoteStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the task status endpoint
///
/// `result` is only meaningful with `Success`, `error` only with `Failure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse<T> {
    pub task_id: JobId,
    pub status: RemoteStatus,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> TaskStatusResponse<T> {
    /// An in-progress or otherwise payload-less response
    pub fn with_status(task_id: impl Into<JobId>, status: RemoteStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            result: None,
            error: None,
        }
    }

    /// A `SUCCESS` response carrying `result`
    pub fn success(task_id: impl Into<JobId>, result: T) -> Self {
        Self {
            task_id: task_id.into(),
            status: RemoteStatus::Success,
            result: Some(result),
            error: None,
        }
    }

    /// A `FAILURE` response with an optional backend message
    pub fn failure(task_id: impl Into<JobId>, error: Option<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: RemoteStatus::Failure,
            result: None,
            error,
        }
    }
}
