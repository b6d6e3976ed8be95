//! # Scheduler and per-call configuration.
//!
//! [`SchedulerConfig`] sets the scheduler-wide knobs (admission limit, event
//! bus capacity); [`CallOptions`] sets the knobs of one scheduled operation
//! (attempt timeout, retry budget, retry delay).
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use redial::{CallOptions, SchedulerConfig};
//!
//! let mut cfg = SchedulerConfig::default();
//! cfg.limit = 4;
//!
//! let mut opts = CallOptions::default();
//! opts.timeout = Duration::from_secs(5);
//! opts.max_retries = 2;
//!
//! assert_eq!(cfg.limit, 4);
//! assert_eq!(opts.retry_delay, Duration::from_millis(100));
//! ```

use std::time::Duration;

/// Scheduler-wide configuration.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Maximum number of concurrently in-flight underlying attempts.
    pub limit: usize,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for SchedulerConfig {
    /// Provides a default configuration:
    /// - `limit = 25`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            limit: 25,
            bus_capacity: 1024,
        }
    }
}

/// Per-scheduled-operation configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallOptions {
    /// Deadline for each underlying attempt (0 = no deadline).
    pub timeout: Duration,
    /// How many retries a single invocation may consume.
    pub max_retries: u32,
    /// Delay between a retryable failure (or timeout) and the next attempt.
    pub retry_delay: Duration,
}

impl Default for CallOptions {
    /// Provides the default options:
    /// - `timeout = 60s`
    /// - `max_retries = 0`
    /// - `retry_delay = 100ms`
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 0,
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl CallOptions {
    /// Sets the per-attempt timeout.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before each retry.
    #[inline]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.limit, 25);
        assert_eq!(cfg.bus_capacity, 1024);

        let opts = CallOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(60));
        assert_eq!(opts.max_retries, 0);
        assert_eq!(opts.retry_delay, Duration::from_millis(100));
    }

    #[test]
    fn builders_override_fields() {
        let opts = CallOptions::default()
            .with_timeout(Duration::from_millis(50))
            .with_max_retries(3)
            .with_retry_delay(Duration::from_millis(10));
        assert_eq!(opts.timeout, Duration::from_millis(50));
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.retry_delay, Duration::from_millis(10));
    }
}
