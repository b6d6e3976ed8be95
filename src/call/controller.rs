//! # Per-invocation attempt loop.
//!
//! Drives one logical invocation to exactly one settlement: wait for
//! admission, dispatch an underlying attempt under a deadline, classify the
//! outcome, and either settle or back off and re-dispatch while the retry
//! budget lasts.
//!
//! # High-level flow:
//!
//! ```text
//!   gate.admit() ──► dispatch attempt ──► await callback ⊓ deadline
//!                         ▲                      │
//!                         │ retry_delay          ├─ resolved ─► Ok
//!                         └──── retryable? ◄─────┤
//!                                                └─ terminal / exhausted ─► Err
//! ```
//!
//! - No deadline runs while waiting for admission; that wait is unbounded
//!   by design.
//! - Attempts of one invocation are strictly sequential: the previous
//!   attempt's completion receiver is dropped before the next dispatch, so
//!   a late settlement of a superseded attempt is discarded.
//! - A synchronous dispatch failure settles immediately and bypasses retry.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;

use crate::call::completion::{Completion, Settlement};
use crate::call::op::CallbackOp;
use crate::classify::{Disposition, classify, normalize};
use crate::config::CallOptions;
use crate::delay::delay;
use crate::error::{CallError, RawFailure};
use crate::events::{Bus, Event, EventKind};
use crate::gate::AdmissionGate;

/// What one underlying attempt produced, dispatch failures aside.
enum AttemptOutcome<T> {
    Resolved(T),
    Failed(RawFailure),
    TimedOut,
}

/// Runs one logical invocation of `op` to a single settlement.
pub(crate) async fn run_call<O: CallbackOp>(
    op: &O,
    args: O::Args,
    opts: &CallOptions,
    gate: &AdmissionGate,
    bus: &Bus,
) -> Result<O::Output, CallError> {
    let _permit = gate.admit().await;

    let mut retries_left = opts.max_retries;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        bus.publish(
            Event::new(EventKind::AttemptStarted)
                .with_call(op.name())
                .with_attempt(attempt),
        );

        let outcome = match run_attempt(op, args.clone(), opts.timeout).await {
            Ok(outcome) => outcome,
            Err(failure) => {
                let err = CallError::Dispatch { failure };
                publish_rejected(bus, op.name(), attempt, &err);
                return Err(err);
            }
        };

        let mut retry_reason: Option<String> = None;
        match outcome {
            AttemptOutcome::Resolved(value) => {
                bus.publish(
                    Event::new(EventKind::CallResolved)
                        .with_call(op.name())
                        .with_attempt(attempt),
                );
                return Ok(value);
            }
            AttemptOutcome::TimedOut => {
                bus.publish(
                    Event::new(EventKind::TimeoutHit)
                        .with_call(op.name())
                        .with_attempt(attempt)
                        .with_timeout(opts.timeout),
                );
                if retries_left == 0 {
                    let err = CallError::Timeout {
                        timeout: opts.timeout,
                    };
                    publish_rejected(bus, op.name(), attempt, &err);
                    return Err(err);
                }
                retries_left -= 1;
            }
            AttemptOutcome::Failed(failure) => {
                bus.publish(
                    Event::new(EventKind::AttemptFailed)
                        .with_call(op.name())
                        .with_attempt(attempt)
                        .with_reason(failure.message.clone()),
                );
                let terminal = classify(&failure) == Disposition::Terminal;
                if terminal || retries_left == 0 {
                    let err = CallError::Service(normalize(failure));
                    publish_rejected(bus, op.name(), attempt, &err);
                    return Err(err);
                }
                retries_left -= 1;
                retry_reason = Some(failure.message);
            }
        }

        let backoff = Event::new(EventKind::BackoffScheduled)
            .with_call(op.name())
            .with_attempt(attempt)
            .with_delay(opts.retry_delay);
        bus.publish(match retry_reason {
            Some(reason) => backoff.with_reason(reason),
            None => backoff,
        });

        delay(opts.retry_delay, ()).await;
    }
}

/// Dispatches a single underlying attempt and awaits it under the deadline.
///
/// `Err` means the dispatch itself failed synchronously. A `timeout` of zero
/// disables the deadline.
async fn run_attempt<O: CallbackOp>(
    op: &O,
    args: O::Args,
    timeout: Duration,
) -> Result<AttemptOutcome<O::Output>, RawFailure> {
    let (done, rx) = Completion::channel();
    op.dispatch(args, done)?;

    if timeout > Duration::ZERO {
        match time::timeout(timeout, rx).await {
            Ok(settled) => Ok(settled_outcome(settled)),
            Err(_elapsed) => Ok(AttemptOutcome::TimedOut),
        }
    } else {
        Ok(settled_outcome(rx.await))
    }
}

fn settled_outcome<T>(
    settled: Result<Settlement<T>, oneshot::error::RecvError>,
) -> AttemptOutcome<T> {
    match settled {
        Ok(Ok(value)) => AttemptOutcome::Resolved(value),
        Ok(Err(failure)) => AttemptOutcome::Failed(failure),
        // The operation dropped every clone of its completion handle
        // without settling; classified as a transport-level failure.
        Err(_) => AttemptOutcome::Failed(RawFailure::transport(
            "completion handle dropped without settling",
        )),
    }
}

/// Publishes a `CallRejected` event with the final error.
fn publish_rejected(bus: &Bus, name: &str, attempt: u32, err: &CallError) {
    bus.publish(
        Event::new(EventKind::CallRejected)
            .with_call(name)
            .with_attempt(attempt)
            .with_reason(err.as_message()),
    );
}
