//! Poll states and outcomes

use std::time::Duration;

use smartsupport_core::domain::task::JobId;

use crate::error::{PollError, Result};

/// Lifecycle of a task poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Created, never polled
    Idle,

    /// A poll is running
    Polling,

    /// Backend returned a result
    Completed,

    /// Poll ended with a failure other than a timeout
    Failed,

    /// Attempt budget ran out while the task was in progress
    TimedOut,

    /// Cancelled before an outcome was reached
    Cancelled,
}

impl PollState {
    /// True once no further fetch can happen
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Idle | PollState::Polling)
    }
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollState::Idle => write!(f, "Idle"),
            PollState::Polling => write!(f, "Polling"),
            PollState::Completed => write!(f, "Completed"),
            PollState::Failed => write!(f, "Failed"),
            PollState::TimedOut => write!(f, "TimedOut"),
            PollState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Terminal outcome of a poll
///
/// Recorded once per poller and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Completed(T),
    Failed(PollError),
    TimedOut { attempts: u32, elapsed: Duration },
}

impl<T> PollOutcome<T> {
    /// State the poller is in once this outcome is recorded
    pub fn state(&self) -> PollState {
        match self {
            PollOutcome::Completed(_) => PollState::Completed,
            PollOutcome::Failed(_) => PollState::Failed,
            PollOutcome::TimedOut { .. } => PollState::TimedOut,
        }
    }

    /// Converts the outcome into what `poll` returns for `job_id`
    pub fn into_result(self, job_id: &JobId) -> Result<T> {
        match self {
            PollOutcome::Completed(payload) => Ok(payload),
            PollOutcome::Failed(error) => Err(error),
            PollOutcome::TimedOut { attempts, elapsed } => Err(PollError::Timeout {
                job_id: job_id.clone(),
                attempts,
                elapsed,
            }),
        }
    }
}
