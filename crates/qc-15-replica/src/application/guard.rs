//! Single-slot reentrancy guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::ReplicaError;

/// Guard allowing at most one delivery in flight per Replica.
///
/// Entering never blocks: a second caller fails with
/// [`ReplicaError::Reentrant`] while the first still holds the slot.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    /// Create an open guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the guard; it reopens when the returned slot is dropped.
    pub fn enter(&self) -> Result<GuardSlot, ReplicaError> {
        self.entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReplicaError::Reentrant)?;
        Ok(GuardSlot {
            entered: Arc::clone(&self.entered),
        })
    }

    /// Whether a delivery is in flight.
    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Held for the duration of one delivery.
///
/// Owns its flag, so it can move into the task that runs the delivery.
#[derive(Debug)]
pub struct GuardSlot {
    entered: Arc<AtomicBool>,
}

impl Drop for GuardSlot {
    fn drop(&mut self) {
        self.entered.store(false, Ordering::Release);
    }
}
