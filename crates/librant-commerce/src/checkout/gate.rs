//! Single in-flight checkout guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "order in flight" flag.
///
/// Clones share the flag, so every submit handler wired to the same gate sees
/// the same state. A single `CheckoutOrchestrator` already serializes its own
/// submissions through `&mut self`; the gate matters when several
/// orchestrators are given one gate through `with_gate`.
#[derive(Debug, Clone, Default)]
pub struct SubmitGate {
    in_flight: Arc<AtomicBool>,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. `None` if a submission is already running.
    pub fn try_acquire(&self) -> Option<SubmitGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped, including when the owning future is abandoned.
#[derive(Debug)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let gate = SubmitGate::new();
        let shared = gate.clone();

        let guard = gate.try_acquire().unwrap();
        assert!(shared.is_in_flight());
        assert!(shared.try_acquire().is_none());

        drop(guard);
        assert!(!gate.is_in_flight());
        assert!(shared.try_acquire().is_some());
    }
}
