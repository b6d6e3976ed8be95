//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers
//! into the scheduler. Each subscriber is driven by its own forwarding loop
//! spawned via [`Scheduler::attach_subscriber`](crate::Scheduler::attach_subscriber),
//! fed from the broadcast bus.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) — they do not block the
//!   publisher, but a slow subscriber can lag behind the bus and skip
//!   events (broadcast semantics).

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated forwarding task. Implementations
/// should avoid blocking the async runtime (prefer async I/O and
/// cooperative waits).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use redial::{Event, Subscribe};
///
/// struct Audit;
///
/// #[async_trait]
/// impl Subscribe for Audit {
///     async fn on_event(&self, _event: &Event) {
///         // write audit record...
///     }
///
///     fn name(&self) -> &'static str { "audit" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
