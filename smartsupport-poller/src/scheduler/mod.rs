//! Scheduler layer for the poller
//!
//! This layer owns the poll loop: pacing status fetches, classifying what
//! comes back, and deciding when a task has reached its final outcome.

mod handle;
pub mod poller;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use handle::PollHandle;
pub use poller::TaskPoller;
pub use state::{PollOutcome, PollState};
