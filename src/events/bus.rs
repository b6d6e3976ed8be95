//! # Event bus connecting attempt controllers to subscribers.
//!
//! Every invocation running on a scheduler publishes its lifecycle events
//! here; [`Bus`] fans them out over [`tokio::sync::broadcast`] so attaching
//! an observer never slows a call down. Publishing is fire-and-forget: a
//! call settles at the same pace whether zero or ten subscribers listen.
//!
//! The channel is bounded. A subscriber that cannot keep up falls behind the
//! ring buffer and observes `RecvError::Lagged(n)` on its next receive,
//! after which it resumes with the newest events; nothing is buffered
//! beyond the configured capacity and nothing is persisted.

use tokio::sync::broadcast;

use super::event::Event;

/// Fan-out channel for invocation lifecycle events.
///
/// One `Bus` is shared by a scheduler and every
/// [`ScheduledCall`](crate::ScheduledCall) cloned from it. Controllers
/// publish concurrently;
/// each receiver sees its own clone of every event it kept up with.
///
/// Cloning is cheap (the sender is `Arc`-backed), and dropping the last
/// clone closes the channel, which is how attached subscriber loops learn
/// the scheduler is gone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus whose ring buffer holds `capacity` events.
    ///
    /// The buffer is shared by all receivers, not allocated per subscriber.
    /// A capacity of zero is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event without blocking.
    ///
    /// With no active receivers the event simply vanishes; controllers do
    /// not care whether anyone is listening.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Opens an independent receiver for events published from now on.
    ///
    /// Events sent before the subscription are not replayed; a receiver
    /// that lags past the ring buffer skips the overwritten events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
