//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [attempt] call=find-by-id attempt=1
//! [failed] call=find-by-id err="upstream unavailable" attempt=1
//! [backoff] call=find-by-id delay_ms=100 after_attempt=1 err="upstream unavailable"
//! [timeout] call=find-by-id timeout_ms=50 attempt=2
//! [resolved] call=find-by-id attempt=3
//! [rejected] call=find-by-id err="timeout: 50ms" attempt=2
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::AttemptStarted => {
                if let (Some(call), Some(att)) = (&e.call, e.attempt) {
                    println!("[attempt] call={call} attempt={att}");
                }
            }
            EventKind::AttemptFailed => {
                println!(
                    "[failed] call={:?} err={:?} attempt={:?}",
                    e.call, e.reason, e.attempt
                );
            }
            EventKind::TimeoutHit => {
                println!(
                    "[timeout] call={:?} timeout_ms={:?} attempt={:?}",
                    e.call, e.timeout_ms, e.attempt
                );
            }
            EventKind::BackoffScheduled => {
                println!(
                    "[backoff] call={:?} delay_ms={:?} after_attempt={:?} err={:?}",
                    e.call, e.delay_ms, e.attempt, e.reason
                );
            }
            EventKind::CallResolved => {
                println!("[resolved] call={:?} attempt={:?}", e.call, e.attempt);
            }
            EventKind::CallRejected => {
                println!(
                    "[rejected] call={:?} err={:?} attempt={:?}",
                    e.call, e.reason, e.attempt
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
