//! Task poller
//!
//! Drives the status of one submitted task to a terminal outcome.
//! Fetches are strictly sequential and spaced by the configured interval;
//! every wait and every fetch races the poller's cancellation token.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use smartsupport_core::StatusSource;
use smartsupport_core::domain::task::{JobId, RemoteStatus, TaskStatusResponse};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::PollOptions;
use crate::error::{DEFAULT_FAILURE_MESSAGE, PollError, Result};
use crate::scheduler::state::{PollOutcome, PollState};

/// What a single status response means for the poll
enum Verdict<T> {
    /// The task is still running
    InProgress,
    /// The poll is over
    Finished(PollOutcome<T>),
}

/// Poller for a single classification task
///
/// One instance tracks exactly one job. The first call to [`poll`] runs the
/// state machine; the outcome it reaches is recorded and every later call
/// returns a clone of it without touching the backend again.
///
/// [`poll`]: TaskPoller::poll
pub struct TaskPoller<S: StatusSource> {
    job_id: JobId,
    source: S,
    options: PollOptions,
    token: CancellationToken,
    /// Serializes runs so two callers never fetch concurrently
    run_lock: Mutex<()>,
    running: AtomicBool,
    outcome: OnceLock<PollOutcome<S::Payload>>,
}

impl<S: StatusSource> TaskPoller<S> {
    /// Creates a poller for `job_id`
    ///
    /// Fails if the id is blank or the options don't validate.
    pub fn new(job_id: impl Into<JobId>, source: S, options: PollOptions) -> Result<Self> {
        let job_id = job_id.into();
        if job_id.is_blank() {
            return Err(PollError::InvalidJobId);
        }
        options.validate()?;

        Ok(Self {
            job_id,
            source,
            options,
            token: CancellationToken::new(),
            run_lock: Mutex::new(()),
            running: AtomicBool::new(false),
            outcome: OnceLock::new(),
        })
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Current lifecycle state
    pub fn state(&self) -> PollState {
        if let Some(outcome) = self.outcome.get() {
            outcome.state()
        } else if self.token.is_cancelled() {
            PollState::Cancelled
        } else if self.running.load(Ordering::SeqCst) {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    /// Recorded outcome, if the poll already finished
    pub fn outcome(&self) -> Option<&PollOutcome<S::Payload>> {
        self.outcome.get()
    }

    /// Token that fires when this poller is cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub(crate) fn shared_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Stops a poll in progress
    ///
    /// The pending wait or in-flight fetch is abandoned and no further fetch
    /// is made. Safe to call repeatedly; a no-op once an outcome exists.
    pub fn cancel(&self) {
        if self.outcome.get().is_some() || self.token.is_cancelled() {
            return;
        }

        info!("Cancelling poll of task {}", self.job_id);
        self.token.cancel();
    }

    /// Polls the task until it reaches a terminal outcome
    ///
    /// Returns the result payload when the backend reports `SUCCESS`, or the
    /// [`PollError`] describing why the poll ended. Returns
    /// [`PollError::Cancelled`] when the poll was cancelled; cancellation is
    /// not an outcome and nothing is recorded for it.
    pub async fn poll(&self) -> Result<S::Payload> {
        if let Some(outcome) = self.outcome.get() {
            debug!("Task {} already finished, returning recorded outcome", self.job_id);
            return outcome.clone().into_result(&self.job_id);
        }

        let _run = self.run_lock.lock().await;

        // Another caller may have finished while we waited for the lock
        if let Some(outcome) = self.outcome.get() {
            return outcome.clone().into_result(&self.job_id);
        }

        if self.token.is_cancelled() {
            return Err(self.cancelled());
        }

        let span = info_span!("poll", job_id = %self.job_id);
        let reached = {
            let _running = RunningGuard::enter(&self.running);
            self.run().instrument(span).await
        };

        match reached {
            Some(outcome) => {
                let outcome = self.outcome.get_or_init(|| outcome);
                outcome.clone().into_result(&self.job_id)
            }
            None => Err(self.cancelled()),
        }
    }

    /// Runs the state machine; `None` means it was cancelled
    async fn run(&self) -> Option<PollOutcome<S::Payload>> {
        let started = Instant::now();
        let max_attempts = self.options.max_attempts;
        let mut attempts: u32 = 0;
        let mut transient_faults: u32 = 0;

        info!(
            "Polling task {} (interval: {:?}, max attempts: {})",
            self.job_id, self.options.interval, max_attempts
        );

        loop {
            // Ceiling is checked before fetching so no call goes past the budget
            if attempts >= max_attempts {
                return Some(self.timed_out(attempts, started));
            }

            let fetched = tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    debug!("Fetch for task {} abandoned after cancellation", self.job_id);
                    return None;
                }
                fetched = self.source.fetch_status(&self.job_id) => fetched,
            };

            match fetched {
                Ok(response) => {
                    attempts += 1;
                    match self.interpret(response, attempts) {
                        Verdict::Finished(outcome) => return Some(outcome),
                        Verdict::InProgress if attempts >= max_attempts => {
                            return Some(self.timed_out(attempts, started));
                        }
                        Verdict::InProgress => {}
                    }
                }
                Err(error) if self.source.is_transient(&error) => {
                    transient_faults += 1;
                    if transient_faults > self.options.max_transient_retries {
                        warn!(
                            "Task {}: giving up after {} transient faults: {}",
                            self.job_id, transient_faults, error
                        );
                        return Some(PollOutcome::Failed(PollError::TransportError {
                            job_id: self.job_id.clone(),
                            cause: error.to_string(),
                            attempts,
                        }));
                    }

                    warn!(
                        "Task {}: transient fault {}/{}, retrying in {:?}: {}",
                        self.job_id,
                        transient_faults,
                        self.options.max_transient_retries,
                        self.options.interval,
                        error
                    );
                }
                Err(error) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        warn!(
                            "Task {}: status fetch failed on final attempt {}: {}",
                            self.job_id, attempts, error
                        );
                        return Some(PollOutcome::Failed(PollError::TransportError {
                            job_id: self.job_id.clone(),
                            cause: error.to_string(),
                            attempts,
                        }));
                    }

                    warn!(
                        "Task {}: status fetch failed (attempt {}/{}): {}",
                        self.job_id, attempts, max_attempts, error
                    );
                }
            }

            let waited = tokio::select! {
                biased;
                _ = self.token.cancelled() => false,
                _ = tokio::time::sleep(self.options.interval) => true,
            };

            if !waited {
                debug!("Poll of task {} cancelled while waiting", self.job_id);
                return None;
            }
        }
    }

    /// Maps one status response onto the state machine
    fn interpret(
        &self,
        response: TaskStatusResponse<S::Payload>,
        attempts: u32,
    ) -> Verdict<S::Payload> {
        match response.status {
            RemoteStatus::Success => match response.result {
                Some(payload) => {
                    info!("Task {} completed after {} attempt(s)", self.job_id, attempts);
                    Verdict::Finished(PollOutcome::Completed(payload))
                }
                None => {
                    warn!("Task {} reported SUCCESS without a result", self.job_id);
                    Verdict::Finished(PollOutcome::Failed(PollError::NoResultOnSuccess {
                        job_id: self.job_id.clone(),
                        attempts,
                    }))
                }
            },
            RemoteStatus::Failure => {
                let message = response
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

                info!("Task {} failed: {}", self.job_id, message);
                Verdict::Finished(PollOutcome::Failed(PollError::RemoteFailure {
                    job_id: self.job_id.clone(),
                    message,
                }))
            }
            RemoteStatus::Pending | RemoteStatus::Started | RemoteStatus::Retry => {
                debug!(
                    "Task {} is {} (attempt {}/{})",
                    self.job_id, response.status, attempts, self.options.max_attempts
                );
                Verdict::InProgress
            }
            RemoteStatus::Other(status) => {
                warn!("Task {} reported unknown status {}", self.job_id, status);
                Verdict::Finished(PollOutcome::Failed(PollError::UnknownStatus {
                    job_id: self.job_id.clone(),
                    status,
                }))
            }
        }
    }

    fn timed_out(&self, attempts: u32, started: Instant) -> PollOutcome<S::Payload> {
        let elapsed = started.elapsed();
        warn!(
            "Task {} still in progress after {} attempts ({:?})",
            self.job_id, attempts, elapsed
        );
        PollOutcome::TimedOut { attempts, elapsed }
    }

    fn cancelled(&self) -> PollError {
        PollError::Cancelled {
            job_id: self.job_id.clone(),
        }
    }
}

/// Marks the poller as running for as long as it lives
///
/// Dropping a `poll` future mid-run must not leave the flag set.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn options(interval_ms: u64, max_attempts: u32) -> PollOptions {
        PollOptions::new(Duration::from_millis(interval_ms), max_attempts)
    }

    fn poller(script: Vec<Reply>, options: PollOptions) -> TaskPoller<Arc<ScriptedSource>> {
        TaskPoller::new("task-1", Arc::new(ScriptedSource::new(script)), options).unwrap()
    }

    /// Waits until the source has seen `calls` fetches
    async fn wait_for_calls(source: &ScriptedSource, calls: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while source.calls() < calls {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("source never reached the expected call count");
    }

    #[tokio::test]
    async fn test_resolves_after_in_progress_statuses() {
        let source = Arc::new(ScriptedSource::new(vec![
            pending(),
            started(),
            success(refund()),
        ]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(10, 3)).unwrap();

        let started_at = std::time::Instant::now();
        let result = poller.poll().await.unwrap();

        assert_eq!(result, refund());
        assert_eq!(source.calls(), 3);
        assert!(started_at.elapsed() >= Duration::from_millis(20));
        assert_eq!(poller.state(), PollState::Completed);
    }

    #[tokio::test]
    async fn test_fetch_count_matches_position_of_success() {
        for position in 1..=5 {
            let mut script: Vec<Reply> = (1..position).map(|_| retrying()).collect();
            script.push(success(refund()));

            let source = Arc::new(ScriptedSource::new(script));
            let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 10)).unwrap();

            assert_eq!(poller.poll().await.unwrap(), refund());
            assert_eq!(source.calls(), position);
        }
    }

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let source = Arc::new(ScriptedSource::new(vec![pending(), pending()]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(10, 2)).unwrap();

        let err = poller.poll().await.unwrap_err();

        match err {
            PollError::Timeout {
                attempts, elapsed, ..
            } => {
                assert_eq!(attempts, 2);
                assert!(elapsed >= Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(source.calls(), 2);
        assert_eq!(poller.state(), PollState::TimedOut);
    }

    #[tokio::test]
    async fn test_success_without_result_is_terminal() {
        let source = Arc::new(ScriptedSource::new(vec![
            pending(),
            success_without_result(),
        ]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 10)).unwrap();

        let err = poller.poll().await.unwrap_err();

        assert_eq!(
            err,
            PollError::NoResultOnSuccess {
                job_id: JobId::new("task-1"),
                attempts: 2,
            }
        );
        assert_eq!(source.calls(), 2);
        assert_eq!(poller.state(), PollState::Failed);
    }

    #[tokio::test]
    async fn test_failure_carries_backend_message() {
        let poller = poller(vec![started(), failure(Some("model crashed"))], options(1, 10));

        let err = poller.poll().await.unwrap_err();

        assert_eq!(
            err,
            PollError::RemoteFailure {
                job_id: JobId::new("task-1"),
                message: "model crashed".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_default() {
        let poller = poller(vec![failure(None)], options(1, 10));

        match poller.poll().await.unwrap_err() {
            PollError::RemoteFailure { message, .. } => {
                assert_eq!(message, DEFAULT_FAILURE_MESSAGE);
            }
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_with_empty_message_uses_default() {
        let poller = poller(vec![failure(Some(""))], options(1, 10));

        match poller.poll().await.unwrap_err() {
            PollError::RemoteFailure { message, .. } => {
                assert_eq!(message, DEFAULT_FAILURE_MESSAGE);
            }
            other => panic!("expected remote failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_status_fails_immediately() {
        let source = Arc::new(ScriptedSource::new(vec![pending(), unknown_status("REVOKED")]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 50)).unwrap();

        let err = poller.poll().await.unwrap_err();

        assert_eq!(
            err,
            PollError::UnknownStatus {
                job_id: JobId::new("task-1"),
                status: "REVOKED".to_string(),
            }
        );
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_status_on_final_attempt_is_not_a_timeout() {
        let poller = poller(vec![pending(), unknown_status("LOST")], options(1, 2));

        let err = poller.poll().await.unwrap_err();
        assert!(matches!(err, PollError::UnknownStatus { .. }));
    }

    #[tokio::test]
    async fn test_transient_fault_then_success() {
        let source = Arc::new(ScriptedSource::new(vec![unavailable(), success(refund())]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 1)).unwrap();

        // A single counted attempt is enough: the 503 does not consume it
        assert_eq!(poller.poll().await.unwrap(), refund());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_transient_faults_do_not_cause_spurious_timeout() {
        let script = vec![
            unavailable(),
            unavailable(),
            unavailable(),
            pending(),
            unavailable(),
            pending(),
            success(refund()),
        ];
        let source = Arc::new(ScriptedSource::new(script));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 3)).unwrap();

        assert_eq!(poller.poll().await.unwrap(), refund());
        assert_eq!(source.calls(), 7);
    }

    #[tokio::test]
    async fn test_transient_allowance_is_bounded() {
        let script = (0..10).map(|_| unavailable()).collect();
        let source = Arc::new(ScriptedSource::new(script));
        let options = options(1, 5).with_max_transient_retries(3);
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options).unwrap();

        let err = poller.poll().await.unwrap_err();

        match err {
            PollError::TransportError { cause, attempts, .. } => {
                assert!(cause.contains("503"));
                assert_eq!(attempts, 0);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        // Three tolerated faults plus the one that exceeded the allowance
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_retried_while_budget_remains() {
        let source = Arc::new(ScriptedSource::new(vec![
            broken("connection reset"),
            success(refund()),
        ]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 3)).unwrap();

        assert_eq!(poller.poll().await.unwrap(), refund());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_on_last_attempt_is_transport_error() {
        let source = Arc::new(ScriptedSource::new(vec![
            pending(),
            broken("bad gateway config"),
        ]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 2)).unwrap();

        let err = poller.poll().await.unwrap_err();

        assert_eq!(
            err,
            PollError::TransportError {
                job_id: JobId::new("task-1"),
                cause: "bad gateway config".to_string(),
                attempts: 2,
            }
        );
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_repoll_returns_recorded_outcome_without_fetching() {
        let source = Arc::new(ScriptedSource::new(vec![success(refund())]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 3)).unwrap();

        assert_eq!(poller.poll().await.unwrap(), refund());
        assert_eq!(poller.poll().await.unwrap(), refund());
        assert_eq!(source.calls(), 1);
        assert!(matches!(poller.outcome(), Some(PollOutcome::Completed(_))));
    }

    #[tokio::test]
    async fn test_repoll_after_timeout_replays_timeout() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(1, 2)).unwrap();

        let first = poller.poll().await.unwrap_err();
        let second = poller.poll().await.unwrap_err();

        assert!(first.is_timeout());
        assert_eq!(first, second);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_polls_share_one_run() {
        let source = Arc::new(
            ScriptedSource::new(vec![pending(), success(refund())])
                .with_delay(Duration::from_millis(5)),
        );
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(5, 5)).unwrap();

        let (first, second) = tokio::join!(poller.poll(), poller.poll());

        assert_eq!(first.unwrap(), refund());
        assert_eq!(second.unwrap(), refund());
        assert_eq!(source.calls(), 2);
        assert_eq!(source.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_stops_fetching() {
        let source = Arc::new(ScriptedSource::new(vec![pending()]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(60_000, 5)).unwrap();

        let (result, _) = tokio::join!(poller.poll(), async {
            wait_for_calls(&source, 1).await;
            poller.cancel();
        });

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(source.calls(), 1);
        assert!(poller.outcome().is_none());
        assert_eq!(poller.state(), PollState::Cancelled);

        // Polling a cancelled poller never reaches the backend again
        assert!(poller.poll().await.unwrap_err().is_cancelled());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_fetch() {
        let source = Arc::new(
            ScriptedSource::new(vec![success(refund())]).with_delay(Duration::from_secs(60)),
        );
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(10, 5)).unwrap();

        let (result, _) = tokio::join!(poller.poll(), async {
            wait_for_calls(&source, 1).await;
            poller.cancel();
        });

        assert!(result.unwrap_err().is_cancelled());
        assert!(poller.outcome().is_none());

        // The abandoned fetch was dropped, not left running
        assert_eq!(source.calls(), 1);
        assert_eq!(source.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_noop() {
        let poller = poller(vec![success(refund())], options(1, 3));

        assert_eq!(poller.poll().await.unwrap(), refund());
        poller.cancel();
        poller.cancel();

        assert_eq!(poller.state(), PollState::Completed);
        assert!(!poller.cancellation_token().is_cancelled());
        assert_eq!(poller.poll().await.unwrap(), refund());
    }

    #[tokio::test]
    async fn test_state_reports_polling_while_running() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let poller = TaskPoller::new("task-1", Arc::clone(&source), options(60_000, 5)).unwrap();
        assert_eq!(poller.state(), PollState::Idle);

        let (_, observed) = tokio::join!(poller.poll(), async {
            wait_for_calls(&source, 1).await;
            let observed = poller.state();
            poller.cancel();
            observed
        });

        assert_eq!(observed, PollState::Polling);
    }

    #[test]
    fn test_blank_job_id_is_rejected() {
        let result = TaskPoller::new(
            "  ",
            ScriptedSource::new(vec![]),
            PollOptions::default(),
        );
        assert!(matches!(result, Err(PollError::InvalidJobId)));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let result = TaskPoller::new(
            "task-1",
            ScriptedSource::new(vec![]),
            PollOptions::default().with_interval(Duration::ZERO),
        );
        assert!(matches!(result, Err(PollError::InvalidOptions(_))));
    }
}
