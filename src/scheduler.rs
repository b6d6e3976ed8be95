//! # Composition root: adapting operations into scheduled calls.
//!
//! [`Scheduler`] owns the shared [`AdmissionGate`] and the event [`Bus`].
//! [`Scheduler::schedule`] adapts a callback-style [`CallbackOp`] into a
//! [`ScheduledCall`], whose [`call`](ScheduledCall::call) method takes the
//! operation's natural arguments and returns a future of the result.
//!
//! A `ScheduledCall` is cheap to clone and may be invoked many times
//! concurrently; every invocation gets its own attempt bookkeeping and
//! competes independently for gate capacity.
//!
//! ```text
//!   Scheduler ──schedule(op, opts)──► ScheduledCall
//!       │                                 │ call(args)  (many, concurrent)
//!       ├─ AdmissionGate (shared) ◄───────┤
//!       └─ Bus (shared)          ◄────────┘
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::call::controller::run_call;
use crate::call::CallbackOp;
use crate::config::{CallOptions, SchedulerConfig};
use crate::error::CallError;
use crate::events::Bus;
use crate::gate::AdmissionGate;
use crate::subscribers::Subscribe;

/// Owns the admission gate and event bus shared by every scheduled call.
#[derive(Clone, Debug)]
pub struct Scheduler {
    gate: Arc<AdmissionGate>,
    bus: Bus,
}

impl Scheduler {
    /// Creates a scheduler from the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            gate: Arc::new(AdmissionGate::new(config.limit)),
            bus: Bus::new(config.bus_capacity),
        }
    }

    /// Creates a scheduler sharing an existing gate.
    ///
    /// Use this when several schedulers must compete for the same capacity.
    pub fn with_gate(gate: Arc<AdmissionGate>, bus_capacity: usize) -> Self {
        Self {
            gate,
            bus: Bus::new(bus_capacity),
        }
    }

    /// Adapts `op` into a future-returning scheduled call.
    pub fn schedule<O: CallbackOp>(&self, op: O, opts: CallOptions) -> ScheduledCall<O> {
        ScheduledCall {
            op: Arc::new(op),
            opts,
            gate: self.gate.clone(),
            bus: self.bus.clone(),
        }
    }

    /// The shared admission gate.
    pub fn gate(&self) -> &Arc<AdmissionGate> {
        &self.gate
    }

    /// The shared event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Spawns a forwarding loop that feeds bus events to `subscriber`.
    ///
    /// The loop ends when the scheduler (and every `ScheduledCall` cloned
    /// from it) is dropped. Lagged events are skipped, matching the bus's
    /// broadcast semantics.
    pub fn attach_subscriber(&self, subscriber: Arc<dyn Subscribe>) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => subscriber.on_event(&ev).await,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// A callback-style operation adapted to return futures.
///
/// Obtained from [`Scheduler::schedule`]. Each [`call`](ScheduledCall::call)
/// is one logical invocation: it waits for admission, runs underlying
/// attempts under the configured deadline and retry budget, and settles
/// exactly once.
#[derive(Debug)]
pub struct ScheduledCall<O: CallbackOp> {
    op: Arc<O>,
    opts: CallOptions,
    gate: Arc<AdmissionGate>,
    bus: Bus,
}

impl<O: CallbackOp> Clone for ScheduledCall<O> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
            opts: self.opts,
            gate: Arc::clone(&self.gate),
            bus: self.bus.clone(),
        }
    }
}

impl<O: CallbackOp> ScheduledCall<O> {
    /// Invokes the operation with its natural arguments.
    ///
    /// Resolves with the operation's result, or rejects with a single
    /// [`CallError`] once retries are exhausted or the failure is terminal.
    pub async fn call(&self, args: O::Args) -> Result<O::Output, CallError> {
        run_call(self.op.as_ref(), args, &self.opts, &self.gate, &self.bus).await
    }

    /// The options this call was scheduled with.
    pub fn options(&self) -> &CallOptions {
        &self.opts
    }

    /// The underlying operation's name.
    pub fn name(&self) -> &str {
        self.op.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{CallFn, Completion};
    use crate::error::RawFailure;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn admission_bound_defers_excess_calls() {
        let scheduler = Scheduler::new(SchedulerConfig {
            limit: 1,
            bus_capacity: 64,
        });
        let dispatches = Arc::new(AtomicU32::new(0));
        let release = Arc::new(Notify::new());

        let op = CallFn::new("blocks-until-released", {
            let dispatches = dispatches.clone();
            let release = release.clone();
            move |_: (), done: Completion<u32>| {
                dispatches.fetch_add(1, Ordering::SeqCst);
                let release = release.clone();
                tokio::spawn(async move {
                    release.notified().await;
                    done.resolve(1);
                });
                Ok(())
            }
        });
        // No deadline: the operation is released manually.
        let call = scheduler.schedule(op, CallOptions::default().with_timeout(Duration::ZERO));

        let first = tokio::spawn({
            let call = call.clone();
            async move { call.call(()).await }
        });
        let second = tokio::spawn({
            let call = call.clone();
            async move { call.call(()).await }
        });

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        // Only one dispatch until the first call settles.
        assert_eq!(dispatches.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.gate().in_flight(), 1);

        release.notify_waiters();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(dispatches.load(Ordering::SeqCst), 2);

        release.notify_waiters();
        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert_eq!(second.await.unwrap().unwrap(), 1);
        assert_eq!(scheduler.gate().in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_invocations_settle_independently() {
        let scheduler = Scheduler::default();
        let op = CallFn::new("status-echo", |status: u16, done: Completion<u16>| {
            if status == 0 {
                done.resolve(0);
            } else {
                done.reject(RawFailure::new("failed").with_status(status));
            }
            Ok(())
        });
        let call = scheduler.schedule(op, CallOptions::default());

        let (ok, not_found, flaky) = tokio::join!(call.call(0), call.call(404), call.call(503));
        assert_eq!(ok.unwrap(), 0);
        assert_eq!(not_found.unwrap_err().status(), Some(404));
        assert_eq!(flaky.unwrap_err().status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn saturating_the_gate_settles_every_call() {
        let scheduler = Scheduler::new(SchedulerConfig {
            limit: 3,
            bus_capacity: 256,
        });
        let peak = Arc::new(AtomicU32::new(0));

        let op = CallFn::new("bursty", {
            let gate = scheduler.gate().clone();
            let peak = peak.clone();
            move |id: u32, done: Completion<u32>| {
                peak.fetch_max(gate.in_flight() as u32, Ordering::SeqCst);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    done.resolve(id);
                });
                Ok(())
            }
        });
        let call = scheduler.schedule(op, CallOptions::default());

        let results =
            futures::future::join_all((0..12).map(|id| call.call(id))).await;
        for (id, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), id as u32);
        }
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(scheduler.gate().in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_call_exposes_name_and_options() {
        let scheduler = Scheduler::default();
        let op = CallFn::new("named", |_: (), done: Completion<()>| {
            done.resolve(());
            Ok(())
        });
        let opts = CallOptions::default().with_max_retries(3);
        let call = scheduler.schedule(op, opts);
        assert_eq!(call.name(), "named");
        assert_eq!(call.options().max_retries, 3);
        call.call(()).await.unwrap();
    }

    #[tokio::test]
    async fn attached_subscriber_receives_events() {
        use crate::events::EventKind;

        struct Recorder(std::sync::Mutex<Vec<EventKind>>);

        #[async_trait::async_trait]
        impl Subscribe for Recorder {
            async fn on_event(&self, event: &crate::events::Event) {
                self.0.lock().unwrap().push(event.kind);
            }
        }

        let scheduler = Scheduler::default();
        let recorder = Arc::new(Recorder(std::sync::Mutex::new(Vec::new())));
        let forwarder = scheduler.attach_subscriber(recorder.clone());

        let op = CallFn::new("observed", |_: (), done: Completion<()>| {
            done.resolve(());
            Ok(())
        });
        let call = scheduler.schedule(op, CallOptions::default());
        call.call(()).await.unwrap();

        // Dropping every bus sender ends the forwarding loop.
        drop(call);
        drop(scheduler);
        forwarder.await.unwrap();

        let kinds = recorder.0.lock().unwrap();
        assert_eq!(
            *kinds,
            vec![EventKind::AttemptStarted, EventKind::CallResolved]
        );
    }

    #[tokio::test]
    async fn shared_gate_spans_schedulers() {
        let gate = Arc::new(AdmissionGate::new(1));
        let a = Scheduler::with_gate(gate.clone(), 16);
        let b = Scheduler::with_gate(gate.clone(), 16);

        let held = gate.admit().await;
        let op = CallFn::new("quick", |_: (), done: Completion<()>| {
            done.resolve(());
            Ok(())
        });
        let call_a = a.schedule(op, CallOptions::default().with_timeout(Duration::ZERO));

        let pending = tokio::spawn({
            let call_a = call_a.clone();
            async move { call_a.call(()).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(b.gate().in_flight(), 1);

        drop(held);
        pending.await.unwrap().unwrap();
    }
}
