//! Scripted status source used by the poller tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use smartsupport_core::StatusSource;
use smartsupport_core::domain::analysis::Prediction;
use smartsupport_core::domain::task::{JobId, RemoteStatus, TaskStatusResponse};

pub(crate) type Reply = Result<TaskStatusResponse<Prediction>, FakeError>;

#[derive(Debug, Clone)]
pub(crate) struct FakeError {
    pub transient: bool,
    pub message: String,
}

impl std::fmt::Display for FakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FakeError {}

/// Replays a fixed sequence of replies, then reports `PENDING` forever
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Makes every fetch take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Counts a fetch as in flight until it returns or its future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(in_flight: &'a AtomicUsize, max_in_flight: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    type Payload = Prediction;
    type Error = FakeError;

    async fn fetch_status(&self, job_id: &JobId) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight::enter(&self.in_flight, &self.max_in_flight);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(pending);

        reply.map(|mut response| {
            response.task_id = job_id.clone();
            response
        })
    }

    fn is_transient(&self, error: &FakeError) -> bool {
        error.transient
    }
}

pub(crate) fn refund() -> Prediction {
    Prediction {
        label: "refund".to_string(),
        score: 0.92,
    }
}

pub(crate) fn pending() -> Reply {
    Ok(TaskStatusResponse::with_status("", RemoteStatus::Pending))
}

pub(crate) fn started() -> Reply {
    Ok(TaskStatusResponse::with_status("", RemoteStatus::Started))
}

pub(crate) fn retrying() -> Reply {
    Ok(TaskStatusResponse::with_status("", RemoteStatus::Retry))
}

pub(crate) fn success(payload: Prediction) -> Reply {
    Ok(TaskStatusResponse::success("", payload))
}

pub(crate) fn success_without_result() -> Reply {
    Ok(TaskStatusResponse::with_status("", RemoteStatus::Success))
}

pub(crate) fn failure(message: Option<&str>) -> Reply {
    Ok(TaskStatusResponse::failure("", message.map(str::to_string)))
}

pub(crate) fn unknown_status(status: &str) -> Reply {
    Ok(TaskStatusResponse::with_status("", RemoteStatus::from(status)))
}

pub(crate) fn unavailable() -> Reply {
    Err(FakeError {
        transient: true,
        message: "API error (status 503): Service Unavailable".to_string(),
    })
}

pub(crate) fn broken(message: &str) -> Reply {
    Err(FakeError {
        transient: false,
        message: message.to_string(),
    })
}
