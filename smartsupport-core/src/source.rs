//! Status source abstraction
//!
//! The poller never talks to the network itself. It drives whatever
//! implements `StatusSource`: the HTTP client in production, scripted fakes
//! in tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::task::{JobId, TaskStatusResponse};

/// Something that can report the current status of a task
///
/// `fetch_status` must be idempotent and safe to call repeatedly with the
/// same id. `is_transient` decides whether a fetch error is worth retrying
/// unchanged (gateway errors while the backend warms up, dropped
/// connections) or should count against the caller's attempt budget.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Result payload carried by a `SUCCESS` status
    type Payload: Clone + Send + Sync + 'static;

    /// Error raised when the status could not be fetched at all
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the current status of `job_id`
    async fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> Result<TaskStatusResponse<Self::Payload>, Self::Error>;

    /// Classifies a fetch error as transient
    fn is_transient(&self, error: &Self::Error) -> bool;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    type Payload = S::Payload;
    type Error = S::Error;

    async fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> Result<TaskStatusResponse<Self::Payload>, Self::Error> {
        (**self).fetch_status(job_id).await
    }

    fn is_transient(&self, error: &Self::Error) -> bool {
        (**self).is_transient(error)
    }
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for &S {
    type Payload = S::Payload;
    type Error = S::Error;

    async fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> Result<TaskStatusResponse<Self::Payload>, Self::Error> {
        (**self).fetch_status(job_id).await
    }

    fn is_transient(&self, error: &Self::Error) -> bool {
        (**self).is_transient(error)
    }
}
