//! SmartSupport task poller
//!
//! Turns the job id returned by an asynchronous classification request into
//! the final classification result, or a definitive error.
//!
//! The backend is slow to warm up and may answer with gateway errors for a
//! while; the poller retries those silently within a bounded allowance,
//! retries other fetch failures against the attempt budget, and stops as
//! soon as the backend reports a terminal status.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use smartsupport_core::StatusSource;
//! use smartsupport_poller::{PollOptions, TaskPoller};
//!
//! async fn wait_for<S: StatusSource>(source: S, task_id: &str) -> smartsupport_poller::Result<S::Payload> {
//!     let options = PollOptions::default().with_interval(Duration::from_secs(1));
//!     let poller = TaskPoller::new(task_id, source, options)?;
//!     poller.poll().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::PollOptions;
pub use error::{PollError, Result};
pub use scheduler::{PollHandle, PollOutcome, PollState, TaskPoller};

use smartsupport_core::StatusSource;
use smartsupport_core::domain::task::JobId;

/// Polls `job_id` on `source` once, to completion
///
/// Shorthand for building a [`TaskPoller`] and calling [`TaskPoller::poll`].
pub async fn poll<S: StatusSource>(
    job_id: impl Into<JobId>,
    source: S,
    options: PollOptions,
) -> Result<S::Payload> {
    TaskPoller::new(job_id, source, options)?.poll().await
}
