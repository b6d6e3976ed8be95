//! # Runtime events emitted by attempt controllers.
//!
//! [`EventKind`] classifies event types across the lifecycle of one logical
//! invocation: per-attempt events (started, failed, timed out), the backoff
//! between attempts, and the final settlement (resolved or rejected).
//!
//! The [`Event`] struct carries metadata such as timestamps, the scheduled
//! operation's name, attempt numbers, reasons, and delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use redial::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_call("find-by-id")
//!     .with_reason("upstream unavailable")
//!     .with_attempt(2);
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.call.as_deref(), Some("find-by-id"));
//! assert_eq!(ev.attempt, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An underlying attempt is being dispatched.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: attempt number (1-based, per invocation)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AttemptStarted,

    /// The underlying attempt reported a failure.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: attempt number
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AttemptFailed,

    /// The attempt deadline elapsed before any callback fired.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: attempt number
    /// - `timeout_ms`: configured attempt timeout (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimeoutHit,

    /// A retry was scheduled after a retryable failure or timeout.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: the attempt that just failed
    /// - `delay_ms`: delay before the next attempt (ms)
    /// - `reason`: last failure message (absent for timeout-driven retries)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    BackoffScheduled,

    /// The invocation settled successfully.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: the attempt that succeeded
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CallResolved,

    /// The invocation settled with an error.
    ///
    /// Sets:
    /// - `call`: scheduled operation name
    /// - `attempt`: the last attempt number
    /// - `reason`: final error message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CallRejected,
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the scheduled operation, if applicable.
    pub call: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Attempt timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Backoff delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, timeout details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            call: None,
            attempt: None,
            timeout_ms: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches the scheduled operation's name.
    #[inline]
    pub fn with_call(mut self, call: impl Into<Arc<str>>) -> Self {
        self.call = Some(call.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
