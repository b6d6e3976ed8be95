//! # Single-assignment completion slot.
//!
//! [`Completion`] adapts a callback-style operation to a future: the
//! dispatcher hands the operation a cloneable `Completion` handle and awaits
//! the paired receiver. The slot settles at most once — the first
//! [`resolve`](Completion::resolve) or [`reject`](Completion::reject) wins,
//! every later call is discarded.
//!
//! The receiver side may be dropped before the operation settles (that is
//! how a superseding retry or a final timeout disarms a stale attempt). A
//! settlement arriving after the drop is discarded the same way a second
//! settlement is: the operation keeps running, its result goes nowhere.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::error::RawFailure;

/// What one underlying attempt reports back.
pub(crate) type Settlement<T> = Result<T, RawFailure>;

/// Completion handle passed to a [`CallbackOp`](crate::CallbackOp) dispatch.
///
/// Cloneable so the operation may move it across tasks or callbacks; all
/// clones share the same single-assignment slot.
#[derive(Debug)]
pub struct Completion<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Settlement<T>>>>>,
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Send> Completion<T> {
    /// Creates a completion handle and the receiver an attempt awaits.
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Settlement<T>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Settles the attempt successfully with `value`.
    ///
    /// Returns `true` iff this settlement was accepted (first settlement and
    /// the attempt is still listening).
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles the attempt with a failure.
    ///
    /// Returns `true` iff this settlement was accepted.
    pub fn reject(&self, failure: RawFailure) -> bool {
        self.settle(Err(failure))
    }

    /// Whether the slot has already been taken by a settlement.
    pub fn is_settled(&self) -> bool {
        match self.slot.lock() {
            Ok(guard) => guard.is_none(),
            Err(_) => true,
        }
    }

    fn settle(&self, settlement: Settlement<T>) -> bool {
        let tx = match self.slot.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        match tx {
            // send fails when the receiver was dropped: a stale attempt's
            // late result is silently discarded.
            Some(tx) => tx.send(settlement).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_settlement_wins() {
        let (done, rx) = Completion::channel();
        assert!(!done.is_settled());
        assert!(done.resolve(1u32));
        assert!(done.is_settled());
        assert!(!done.resolve(2));
        assert!(!done.reject(RawFailure::new("late")));
        assert_eq!(rx.await.unwrap(), Ok(1));
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let (done, rx) = Completion::channel();
        let other = done.clone();
        assert!(other.reject(RawFailure::new("boom").with_status(500)));
        assert!(!done.resolve(1u32));
        let settled = rx.await.unwrap();
        assert_eq!(settled.unwrap_err().status, Some(500));
    }

    #[tokio::test]
    async fn settlement_after_receiver_drop_is_discarded() {
        let (done, rx) = Completion::<u32>::channel();
        drop(rx);
        assert!(!done.resolve(1));
        assert!(done.is_settled());
    }
}
