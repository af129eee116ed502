//! Background polls
//!
//! Runs a poller on its own tokio task and hands the outcome to a callback.
//! A cancelled poll never calls back, so a caller that went away is never
//! invoked with a late result.

use smartsupport_core::StatusSource;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Result;
use crate::scheduler::poller::TaskPoller;

/// Handle to a poll running in the background
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Cancels the poll; the callback will not be invoked
    ///
    /// Safe to call multiple times and after completion.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the background task has returned
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the background task to return
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Poll task panicked: {}", e);
        }
    }
}

impl<S> TaskPoller<S>
where
    S: StatusSource + 'static,
{
    /// Runs the poll on a new tokio task
    ///
    /// `on_outcome` is invoked exactly once with the poll result, unless the
    /// poll is cancelled through the returned handle (or the poller's own
    /// token) before the result is delivered.
    pub fn spawn<F>(self, on_outcome: F) -> PollHandle
    where
        F: FnOnce(Result<S::Payload>) + Send + 'static,
    {
        let token = self.shared_token().clone();

        let task = tokio::spawn(async move {
            let result = self.poll().await;

            // A cancel that lands after the result still suppresses delivery
            if self.shared_token().is_cancelled() {
                debug!("Poll of task {} cancelled, dropping result", self.job_id());
                return;
            }

            on_outcome(result);
        });

        PollHandle { token, task }
    }
}
