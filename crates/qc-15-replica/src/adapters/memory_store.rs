//! In-Memory Replica Store
//!
//! Implements `ReplicaStore` with parking_lot-guarded maps. Used by tests and
//! by nodes that rebuild Replica state from the remote chain on startup.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{
    invariant_status_transition, Checkpoint, DispatchOutcome, Hash, MessageStatus, ReplicaResult,
};
use crate::ports::outbound::ReplicaStore;

#[derive(Debug, Default)]
struct Ledger {
    roots: HashMap<Hash, u32>,
    latest: Option<Checkpoint>,
}

/// In-memory checkpoint ledger and status register.
#[derive(Debug, Default)]
pub struct InMemoryReplicaStore {
    ledger: RwLock<Ledger>,
    statuses: RwLock<HashMap<Hash, MessageStatus>>,
    outcomes: RwLock<HashMap<Hash, DispatchOutcome>>,
}

impl InMemoryReplicaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted roots.
    pub fn root_count(&self) -> usize {
        self.ledger.read().roots.len()
    }

    /// Number of messages with a non-`Unseen` status.
    pub fn message_count(&self) -> usize {
        self.statuses.read().len()
    }
}

impl ReplicaStore for InMemoryReplicaStore {
    fn latest_checkpoint(&self) -> ReplicaResult<Option<Checkpoint>> {
        Ok(self.ledger.read().latest)
    }

    fn checkpoint_index(&self, root: &Hash) -> ReplicaResult<Option<u32>> {
        Ok(self.ledger.read().roots.get(root).copied())
    }

    fn put_checkpoint(&self, checkpoint: &Checkpoint) -> ReplicaResult<()> {
        // One lock for both fields so readers never see a root without its frontier.
        let mut ledger = self.ledger.write();
        ledger.roots.insert(checkpoint.root, checkpoint.index);
        ledger.latest = Some(*checkpoint);
        debug!(index = checkpoint.index, "[qc-15] Checkpoint stored");
        Ok(())
    }

    fn message_status(&self, leaf: &Hash) -> ReplicaResult<MessageStatus> {
        Ok(self
            .statuses
            .read()
            .get(leaf)
            .copied()
            .unwrap_or_default())
    }

    fn put_message_status(&self, leaf: &Hash, status: MessageStatus) -> ReplicaResult<()> {
        let mut statuses = self.statuses.write();
        let current = statuses.get(leaf).copied().unwrap_or_default();
        invariant_status_transition(leaf, current, status)?;
        statuses.insert(*leaf, status);
        Ok(())
    }

    fn put_dispatch_outcome(&self, outcome: &DispatchOutcome) -> ReplicaResult<()> {
        self.outcomes
            .write()
            .insert(outcome.message_hash, outcome.clone());
        Ok(())
    }

    fn dispatch_outcome(&self, leaf: &Hash) -> ReplicaResult<Option<DispatchOutcome>> {
        Ok(self.outcomes.read().get(leaf).cloned())
    }
}
