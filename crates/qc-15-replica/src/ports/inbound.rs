//! # Inbound Ports
//!
//! API trait defining what the Replica can do.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{
    Checkpoint, DispatchOutcome, GasMeter, Hash, MessageStatus, ReplicaResult,
};
use crate::events::ReplicaEvent;

/// Replica API - inbound port.
#[async_trait]
pub trait ReplicaApi: Send + Sync {
    /// Accept a signed commitment `(root, index)` from the remote updater.
    fn checkpoint(&self, root: Hash, index: u32, signature: &[u8]) -> ReplicaResult<()>;

    /// Prove `leaf` is in an accepted root.
    ///
    /// `Ok(false)` means the proof does not match any accepted root yet.
    fn prove(&self, leaf: Hash, proof: &[Hash], index: u32) -> ReplicaResult<bool>;

    /// Dispatch a proven message, funded from `gas`.
    ///
    /// Returns the recipient's success flag. The call itself succeeds whenever
    /// the preconditions hold.
    async fn process(&self, message: &[u8], gas: &mut GasMeter) -> ReplicaResult<bool>;

    /// `prove` followed by `process`.
    async fn prove_and_process(
        &self,
        message: &[u8],
        proof: &[Hash],
        index: u32,
        gas: &mut GasMeter,
    ) -> ReplicaResult<bool>;

    /// Whether `root` was ever accepted.
    fn acceptable_root(&self, root: &Hash) -> ReplicaResult<bool>;

    /// Highest accepted checkpoint.
    fn latest_checkpoint(&self) -> ReplicaResult<Option<Checkpoint>>;

    /// Index `root` was accepted at.
    fn checkpoint_index(&self, root: &Hash) -> ReplicaResult<Option<u32>>;

    /// Status of a message.
    fn message_status(&self, leaf: &Hash) -> ReplicaResult<MessageStatus>;

    /// Recorded outcome of a processed message.
    fn dispatch_outcome(&self, leaf: &Hash) -> ReplicaResult<Option<DispatchOutcome>>;

    /// Stream of checkpoint and dispatch events.
    fn subscribe(&self) -> broadcast::Receiver<ReplicaEvent>;
}
