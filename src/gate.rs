//! # Admission gate bounding in-flight attempts.
//!
//! [`AdmissionGate`] caps how many underlying attempts may be active at once
//! across every call sharing the gate. It wraps [`tokio::sync::Semaphore`]:
//! waiting for capacity parks the caller on the semaphore's wait queue
//! rather than polling, and the wait is unbounded — no deadline applies
//! while a call waits for capacity.
//!
//! ## Rules
//! - [`admit`](AdmissionGate::admit) suspends until capacity is available.
//! - [`try_admit`](AdmissionGate::try_admit) never suspends; `None` means
//!   the gate is full.
//! - Release is tied to dropping the [`AdmissionPermit`], so it happens
//!   exactly once per granted admission.
//! - Grant order among waiters is unspecified; under sustained saturation a
//!   waiter may starve.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Bounds the number of concurrently admitted attempts.
///
/// Construct one per scheduler (or share one across schedulers that must
/// compete for the same capacity) and pass it by reference; there is no
/// ambient global gate.
#[derive(Debug)]
pub struct AdmissionGate {
    sem: Arc<Semaphore>,
    limit: usize,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `limit` concurrent attempts.
    ///
    /// The minimum limit is 1 (clamped).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            sem: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Waits until capacity is available and admits the caller.
    ///
    /// The wait is unbounded by design; callers that need a deadline must
    /// impose it themselves.
    pub async fn admit(&self) -> AdmissionPermit {
        match self.sem.clone().acquire_owned().await {
            Ok(permit) => AdmissionPermit { _permit: permit },
            // The semaphore is owned by the gate and never closed.
            Err(_) => unreachable!("admission semaphore closed"),
        }
    }

    /// Admits the caller iff capacity is available right now.
    pub fn try_admit(&self) -> Option<AdmissionPermit> {
        match self.sem.clone().try_acquire_owned() {
            Ok(permit) => Some(AdmissionPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) => None,
            Err(TryAcquireError::Closed) => unreachable!("admission semaphore closed"),
        }
    }

    /// The configured concurrency limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many admissions are currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.limit - self.sem.available_permits()
    }
}

impl Default for AdmissionGate {
    /// A gate with the default limit of 25.
    fn default() -> Self {
        Self::new(25)
    }
}

/// Proof of admission; dropping it releases the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_one() {
        assert_eq!(AdmissionGate::new(0).limit(), 1);
        assert_eq!(AdmissionGate::new(25).limit(), 25);
    }

    #[tokio::test]
    async fn try_admit_respects_limit() {
        let gate = AdmissionGate::new(2);
        let a = gate.try_admit();
        let b = gate.try_admit();
        assert!(a.is_some());
        assert!(b.is_some());
        assert_eq!(gate.in_flight(), 2);
        assert!(gate.try_admit().is_none());

        drop(a);
        assert_eq!(gate.in_flight(), 1);
        assert!(gate.try_admit().is_some());
        drop(b);
    }

    #[tokio::test]
    async fn admit_waits_for_release() {
        let gate = Arc::new(AdmissionGate::new(1));
        let held = gate.admit().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.admit().await;
            })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        assert_eq!(gate.in_flight(), 1);

        drop(held);
        waiter.await.unwrap();
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn default_gate_admits_twenty_five() {
        let gate = AdmissionGate::default();
        assert_eq!(gate.limit(), 25);
        let permits: Vec<_> = (0..25).filter_map(|_| gate.try_admit()).collect();
        assert_eq!(permits.len(), 25);
        assert!(gate.try_admit().is_none());
    }
}
