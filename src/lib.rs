//! # redial
//!
//! **Redial** is a bounded-concurrency, timeout-aware, retrying call
//! scheduler for Rust.
//!
//! It adapts remote operations that report completion through a single
//! callback carrying either an error or a result into uniform
//! future-returning operations, while capping process-wide concurrency,
//! enforcing per-attempt deadlines, and retrying transient failures.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     caller ──call(args)──► ScheduledCall ─────────────┐
//!     caller ──call(args)──► ScheduledCall (clone) ─────┤
//!                                                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler (composition root)                                     │
//! │  - AdmissionGate (bounds in-flight attempts, default limit 25)    │
//! │  - Bus (broadcast events)                                         │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼  per invocation
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  attempt loop                                                     │
//! │  - wait for admission (unbounded, no deadline)                    │
//! │  - dispatch CallbackOp with a Completion handle                   │
//! │  - await callback under the attempt deadline                      │
//! │  - classify failures: terminal settles, retryable consumes budget │
//! │  - back off retry_delay between attempts                          │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publishes: AttemptStarted / AttemptFailed / TimeoutHit /
//!        │            BackoffScheduled / CallResolved / CallRejected
//!        ▼
//!     Bus ──► attach_subscriber ──► Subscribe impls (e.g. the LogWriter)
//! ```
//!
//! ### Lifecycle of one invocation
//! ```text
//! ScheduledCall::call(args)
//!
//! ├─► gate.admit().await          (unbounded wait for capacity)
//! ├─► loop {
//! │     ├─► dispatch(args, Completion)
//! │     │     └─ Err ──► settle Err(Dispatch), never retried
//! │     ├─► await callback, bounded by `timeout` (0 = no deadline)
//! │     │     ├─ resolved ─────────► settle Ok(result)
//! │     │     ├─ rejected, terminal ► settle Err(Service(normalized))
//! │     │     ├─ rejected, retryable:
//! │     │     │     ├─ budget left ─► sleep(retry_delay), continue
//! │     │     │     └─ exhausted ──► settle Err(Service(normalized))
//! │     │     └─ deadline elapsed:
//! │     │           ├─ budget left ─► sleep(retry_delay), continue
//! │     │           └─ exhausted ──► settle Err(Timeout)
//! │   }
//! └─► permit released exactly once when the call future ends
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                      |
//! |--------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Scheduling**     | Adapt callback-style operations into future-returning calls. | [`Scheduler`], [`ScheduledCall`]        |
//! | **Operations**     | Define operations as types or closures.                      | [`CallbackOp`], [`CallFn`], [`CallRef`] |
//! | **Admission**      | Bound in-flight attempts with an explicit gate.              | [`AdmissionGate`], [`AdmissionPermit`]  |
//! | **Classification** | Terminal vs. retryable failures, body normalization.         | [`classify`], [`normalize`]             |
//! | **Errors**         | Typed errors with stable labels.                             | [`CallError`], [`ServiceError`]         |
//! | **Events**         | Hook into invocation lifecycle events.                       | [`Subscribe`], [`Event`], [`Bus`]       |
//! | **Configuration**  | Centralize scheduler and per-call settings.                  | [`SchedulerConfig`], [`CallOptions`]    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Retries and side effects
//! A superseded attempt is **not cancelled**: when the deadline arms a retry,
//! the previous attempt keeps running against the remote system and its
//! eventual settlement is silently discarded. Under retry, a non-idempotent
//! operation may therefore take effect more than once per logical
//! invocation. Schedule retries (`max_retries > 0`) only for operations that
//! are idempotent, or accept the duplicate-side-effect risk.
//!
//! There is also no fairness guarantee among calls waiting for admission;
//! under sustained saturation a waiter may starve.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use redial::{CallFn, CallOptions, RawFailure, Scheduler, SchedulerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::new(SchedulerConfig::default());
//!
//!     // A callback-style operation: settles its Completion handle once.
//!     let op = CallFn::new("greet", |name: String, done| {
//!         if name.is_empty() {
//!             done.reject(RawFailure::new("empty name").with_status(400));
//!         } else {
//!             done.resolve(format!("hello, {name}"));
//!         }
//!         Ok(())
//!     });
//!
//!     let greet = scheduler.schedule(
//!         op,
//!         CallOptions::default()
//!             .with_timeout(Duration::from_secs(5))
//!             .with_max_retries(2),
//!     );
//!
//!     let greeting = greet.call("world".to_string()).await?;
//!     assert_eq!(greeting, "hello, world");
//!
//!     let err = greet.call(String::new()).await.unwrap_err();
//!     assert_eq!(err.status(), Some(400)); // terminal: no retries consumed
//!     Ok(())
//! }
//! ```

mod call;
mod classify;
mod config;
mod delay;
mod error;
mod events;
mod gate;
mod scheduler;
mod subscribers;

// ---- Public re-exports ----

pub use call::{CallFn, CallRef, CallbackOp, Completion};
pub use classify::{Disposition, TERMINAL_STATUSES, classify, normalize};
pub use config::{CallOptions, SchedulerConfig};
pub use delay::delay;
pub use error::{CallError, NormalizedError, RawFailure, ServiceError};
pub use events::{Bus, Event, EventKind};
pub use gate::{AdmissionGate, AdmissionPermit};
pub use scheduler::{ScheduledCall, Scheduler};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
