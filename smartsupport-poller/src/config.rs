//! Poll configuration
//!
//! Defines the knobs of a single poll: how often the status is fetched and
//! how many fetches are allowed before giving up.

use std::time::Duration;

use crate::error::{PollError, Result};

/// Default spacing between two status fetches
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Default ceiling on counted status fetches
pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;

/// Default allowance for silently retried transient faults
pub const DEFAULT_MAX_TRANSIENT_RETRIES: u32 = 30;

/// Poll options
///
/// `max_attempts` counts every fetch that produced a status and every
/// non-transient fetch error. Transient faults (the backend warming up,
/// gateway errors) draw from the separate `max_transient_retries`
/// allowance, so a slow cold start cannot cause a spurious timeout but a
/// backend that never comes back still ends the poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between two consecutive fetches
    pub interval: Duration,

    /// Hard ceiling on counted fetches
    pub max_attempts: u32,

    /// Transient faults tolerated before the poll fails
    pub max_transient_retries: u32,
}

impl PollOptions {
    /// Creates options with the given interval and attempt ceiling
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            max_transient_retries: DEFAULT_MAX_TRANSIENT_RETRIES,
        }
    }

    /// Creates options from environment variables
    ///
    /// Recognized environment variables, all optional:
    /// - POLL_INTERVAL_MS (default: 2000)
    /// - POLL_MAX_ATTEMPTS (default: 15)
    /// - POLL_MAX_TRANSIENT_RETRIES (default: 30)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let interval = lookup("POLL_INTERVAL_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INTERVAL);

        let max_attempts = lookup("POLL_MAX_ATTEMPTS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);

        let max_transient_retries = lookup("POLL_MAX_TRANSIENT_RETRIES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TRANSIENT_RETRIES);

        Self {
            interval,
            max_attempts,
            max_transient_retries,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_transient_retries(mut self, max_transient_retries: u32) -> Self {
        self.max_transient_retries = max_transient_retries;
        self
    }

    /// Upper bound on how long a poll can wait between fetches in total
    pub fn nominal_budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }

    /// Validates the options
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(PollError::InvalidOptions(
                "interval must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(PollError::InvalidOptions(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}
