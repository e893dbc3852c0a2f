use std::time::Duration;

use stratus_core::{Error, Result};

/// Polling cadence and overall deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterConfig {
    /// Sleep before the second poll.
    pub initial_interval: Duration,
    /// Upper bound for any single sleep.
    pub max_interval: Duration,
    /// Total time allowed from the first poll.
    pub max_wait: Duration,
}

impl WaiterConfig {
    pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1200);

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    pub fn with_initial_interval(mut self, initial_interval: Duration) -> Self {
        self.initial_interval = initial_interval;
        self
    }

    /// Both intervals must be non-zero, or polling would never pause.
    pub fn validate(&self) -> Result<()> {
        if self.initial_interval.is_zero() {
            return Err(Error::InvalidInput(
                "waiter initial interval must be greater than zero".to_string(),
            ));
        }
        if self.max_interval.is_zero() {
            return Err(Error::InvalidInput(
                "waiter max interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The first sleep, never above `max_interval`.
    pub(crate) fn first_interval(&self) -> Duration {
        self.initial_interval.min(self.max_interval)
    }

    /// Doubles `current`, capped at `max_interval`.
    pub(crate) fn next_interval(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_interval)
    }
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            initial_interval: Self::DEFAULT_INITIAL_INTERVAL,
            max_interval: Self::DEFAULT_MAX_INTERVAL,
            max_wait: Self::DEFAULT_MAX_WAIT,
        }
    }
}
