//! # Outbound Ports
//!
//! Traits for the Replica's external collaborators: the updater authority,
//! message recipients and durable storage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Address, Checkpoint, DispatchOutcome, GasMeter, HandleError, Hash, MessageStatus,
    ReplicaResult,
};

/// Updater authority - outbound port.
///
/// Decides whether `signature` is the current updater's commitment to
/// `(remote_domain, root, index)`. Swappable for threshold schemes without
/// touching the Replica state machine.
pub trait UpdaterAuthority: Send + Sync {
    /// Verify a checkpoint signature.
    fn verify_checkpoint(&self, remote_domain: u32, root: &Hash, index: u32, signature: &[u8])
        -> bool;
}

/// Message recipient - outbound port.
///
/// Arbitrary external code. It must charge its work to `gas`; running out
/// surfaces as [`HandleError::OutOfGas`].
#[async_trait]
pub trait MessageRecipient: Send + Sync {
    /// Handle a delivered message, returning opaque data.
    async fn handle(
        &self,
        gas: &mut GasMeter,
        origin: u32,
        sender: Address,
        body: &[u8],
    ) -> Result<Vec<u8>, HandleError>;
}

/// Resolves recipient addresses to handlers - outbound port.
pub trait RecipientRegistry: Send + Sync {
    /// Look up the handler deployed at `address`.
    fn recipient(&self, address: &Address) -> Option<Arc<dyn MessageRecipient>>;
}

/// Durable checkpoint ledger and status register - outbound port.
///
/// Shared with the task that records each delivery, hence `'static`.
pub trait ReplicaStore: Send + Sync + 'static {
    /// Highest accepted checkpoint.
    fn latest_checkpoint(&self) -> ReplicaResult<Option<Checkpoint>>;

    /// Index a root was accepted at, if ever.
    fn checkpoint_index(&self, root: &Hash) -> ReplicaResult<Option<u32>>;

    /// Record `root -> index` and advance the frontier, atomically.
    fn put_checkpoint(&self, checkpoint: &Checkpoint) -> ReplicaResult<()>;

    /// Status of a message; `Unseen` if never written.
    fn message_status(&self, leaf: &Hash) -> ReplicaResult<MessageStatus>;

    /// Advance the status of a message.
    ///
    /// Fails with [`crate::domain::ReplicaError::IllegalTransition`] unless the
    /// write moves exactly one step forward.
    fn put_message_status(&self, leaf: &Hash, status: MessageStatus) -> ReplicaResult<()>;

    /// Record the outcome of a dispatch.
    fn put_dispatch_outcome(&self, outcome: &DispatchOutcome) -> ReplicaResult<()>;

    /// Recorded outcome for a message, if it was dispatched.
    fn dispatch_outcome(&self, leaf: &Hash) -> ReplicaResult<Option<DispatchOutcome>>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock updater authority for testing.
#[derive(Clone, Debug, Default)]
pub struct MockUpdaterAuthority {
    /// Should verification fail?
    pub should_fail: bool,
}

impl MockUpdaterAuthority {
    /// Authority that accepts every signature.
    pub fn accepting() -> Self {
        Self { should_fail: false }
    }

    /// Authority that rejects every signature.
    pub fn rejecting() -> Self {
        Self { should_fail: true }
    }
}

impl UpdaterAuthority for MockUpdaterAuthority {
    fn verify_checkpoint(
        &self,
        _remote_domain: u32,
        _root: &Hash,
        _index: u32,
        _signature: &[u8],
    ) -> bool {
        !self.should_fail
    }
}
